//! Application state wiring all services together.
//!
//! AppState holds the concrete service instance used by both CLI and REST
//! API. The service is generic over repository and gate traits, but
//! AppState pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use skillsheet_core::authz::CapabilityGate;
use skillsheet_core::evaluation::EvaluationService;
use skillsheet_infra::config::{load_config, resolve_data_dir};
use skillsheet_infra::sqlite::course::SqliteCourseRepository;
use skillsheet_infra::sqlite::evaluation::SqliteEvaluationRepository;
use skillsheet_infra::sqlite::grading::SqliteGradingRepository;
use skillsheet_infra::sqlite::pool::DatabasePool;
use skillsheet_types::config::AppConfig;

/// Concrete type alias for the service generics pinned to infra
/// implementations.
pub type ConcreteEvaluationService = EvaluationService<
    SqliteCourseRepository,
    SqliteEvaluationRepository,
    SqliteGradingRepository,
    CapabilityGate,
>;

/// Shared application state.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub evaluation_service: Arc<ConcreteEvaluationService>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("skillsheet.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_config(&data_dir).await;

        // Wire the evaluation service
        let evaluation_service = EvaluationService::new(
            SqliteCourseRepository::new(db_pool.clone()),
            SqliteEvaluationRepository::new(db_pool.clone()),
            SqliteGradingRepository::new(db_pool.clone()),
            CapabilityGate,
            config.clone(),
        );

        Ok(Self {
            evaluation_service: Arc::new(evaluation_service),
            config,
            data_dir,
            db_pool,
        })
    }
}
