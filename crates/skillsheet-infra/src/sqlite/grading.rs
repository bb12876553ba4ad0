//! SQLite grading repository: skill scales, overall results, result types.
//!
//! Pure reads; results are written by external result management.

use skillsheet_core::evaluation::repository::GradingRepository;
use skillsheet_types::error::RepositoryError;
use skillsheet_types::ids::{EnrollmentId, ResultTypeId, SkillScaleId};
use skillsheet_types::result::{ResultRecord, ResultType};
use skillsheet_types::skill::SkillScale;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `GradingRepository`.
pub struct SqliteGradingRepository {
    pool: DatabasePool,
}

impl SqliteGradingRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl GradingRepository for SqliteGradingRepository {
    async fn list_scales(&self) -> Result<Vec<SkillScale>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, value FROM skill_scales ORDER BY value ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut scales = Vec::with_capacity(rows.len());
        for row in &rows {
            scales.push(SkillScale {
                id: SkillScaleId(
                    row.try_get("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                ),
                name: row
                    .try_get("name")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                value: row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
            });
        }

        Ok(scales)
    }

    async fn get_result(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Option<ResultRecord>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT r.enrollment_id, r.result_type_id, rt.name AS result_type_name
               FROM results r
               JOIN result_types rt ON rt.id = r.result_type_id
               WHERE r.enrollment_id = ?"#,
        )
        .bind(enrollment_id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let record = ResultRecord {
                    enrollment_id: EnrollmentId(
                        row.try_get("enrollment_id")
                            .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    ),
                    result_type: ResultType {
                        id: ResultTypeId(
                            row.try_get("result_type_id")
                                .map_err(|e| RepositoryError::Query(e.to_string()))?,
                        ),
                        name: row
                            .try_get("result_type_name")
                            .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    },
                };
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn list_result_types(&self) -> Result<Vec<ResultType>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM result_types ORDER BY id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut result_types = Vec::with_capacity(rows.len());
        for row in &rows {
            result_types.push(ResultType {
                id: ResultTypeId(
                    row.try_get("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                ),
                name: row
                    .try_get("name")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
            });
        }

        Ok(result_types)
    }
}
