//! SQLite skill-evaluation repository implementation.
//!
//! The upsert is a single `INSERT .. ON CONFLICT DO UPDATE` against the
//! unique (enrollment_id, skill_id) index, so concurrent writes to the same
//! key can neither duplicate the row nor lose the later update.

use skillsheet_core::evaluation::repository::EvaluationRepository;
use skillsheet_types::error::RepositoryError;
use skillsheet_types::ids::{EnrollmentId, SkillId, SkillScaleId};
use skillsheet_types::skill::SkillEvaluation;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `EvaluationRepository`.
pub struct SqliteEvaluationRepository {
    pool: DatabasePool,
}

impl SqliteEvaluationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn evaluation_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SkillEvaluation, sqlx::Error> {
    Ok(SkillEvaluation {
        enrollment_id: EnrollmentId(row.try_get("enrollment_id")?),
        skill_id: SkillId(row.try_get("skill_id")?),
        skill_scale_id: SkillScaleId(row.try_get("skill_scale_id")?),
    })
}

impl EvaluationRepository for SqliteEvaluationRepository {
    async fn list_for_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> Result<Vec<SkillEvaluation>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT enrollment_id, skill_id, skill_scale_id
               FROM skill_evaluations
               WHERE enrollment_id = ?
               ORDER BY id"#,
        )
        .bind(enrollment_id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut evaluations = Vec::with_capacity(rows.len());
        for row in &rows {
            evaluations
                .push(evaluation_from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?);
        }

        Ok(evaluations)
    }

    async fn upsert(
        &self,
        enrollment_id: EnrollmentId,
        skill_id: SkillId,
        scale_id: SkillScaleId,
    ) -> Result<SkillScaleId, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO skill_evaluations (enrollment_id, skill_id, skill_scale_id)
               VALUES (?, ?, ?)
               ON CONFLICT(enrollment_id, skill_id)
               DO UPDATE SET skill_scale_id = excluded.skill_scale_id"#,
        )
        .bind(enrollment_id.0)
        .bind(skill_id.0)
        .bind(scale_id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Read back what was persisted rather than echoing the input.
        let row = sqlx::query(
            "SELECT skill_scale_id FROM skill_evaluations WHERE enrollment_id = ? AND skill_id = ?",
        )
        .bind(enrollment_id.0)
        .bind(skill_id.0)
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let stored: i64 = row
            .try_get("skill_scale_id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(SkillScaleId(stored))
    }
}
