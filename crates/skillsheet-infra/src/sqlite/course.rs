//! SQLite course repository implementation.
//!
//! Implements `CourseRepository` from `skillsheet-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, relations
//! joined or batch-loaded instead of per-row lookups.

use std::collections::HashMap;

use skillsheet_core::evaluation::repository::CourseRepository;
use skillsheet_types::course::{Course, Enrollment, EnrollmentWithEvaluations, EvaluationType};
use skillsheet_types::error::RepositoryError;
use skillsheet_types::ids::{
    CourseId, EnrollmentId, EvaluationTypeId, SkillId, SkillScaleId, SkillTypeId,
};
use skillsheet_types::skill::{Skill, SkillEvaluation};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CourseRepository`.
pub struct SqliteCourseRepository {
    pool: DatabasePool,
}

impl SqliteCourseRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct CourseRow {
    id: i64,
    name: String,
    evaluation_type_id: Option<i64>,
    evaluation_type_name: Option<String>,
}

impl CourseRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            evaluation_type_id: row.try_get("evaluation_type_id")?,
            evaluation_type_name: row.try_get("evaluation_type_name")?,
        })
    }

    fn into_course(self) -> Course {
        let evaluation_type = match (self.evaluation_type_id, self.evaluation_type_name) {
            (Some(id), Some(name)) => Some(EvaluationType {
                id: EvaluationTypeId(id),
                name,
            }),
            _ => None,
        };
        Course {
            id: CourseId(self.id),
            name: self.name,
            evaluation_type,
        }
    }
}

struct SkillRow {
    id: i64,
    course_id: i64,
    skill_type_id: i64,
    skill_type_name: String,
    name: String,
}

impl SkillRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            course_id: row.try_get("course_id")?,
            skill_type_id: row.try_get("skill_type_id")?,
            skill_type_name: row.try_get("skill_type_name")?,
            name: row.try_get("name")?,
        })
    }

    fn into_skill(self) -> Skill {
        Skill {
            id: SkillId(self.id),
            course_id: CourseId(self.course_id),
            skill_type_id: SkillTypeId(self.skill_type_id),
            skill_type_name: self.skill_type_name,
            name: self.name,
        }
    }
}

struct EnrollmentRow {
    id: i64,
    course_id: i64,
    student_name: String,
}

impl EnrollmentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            course_id: row.try_get("course_id")?,
            student_name: row.try_get("student_name")?,
        })
    }

    fn into_enrollment(self) -> Enrollment {
        Enrollment {
            id: EnrollmentId(self.id),
            course_id: CourseId(self.course_id),
            student_name: self.student_name,
        }
    }
}

fn evaluation_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<SkillEvaluation, sqlx::Error> {
    Ok(SkillEvaluation {
        enrollment_id: EnrollmentId(row.try_get("enrollment_id")?),
        skill_id: SkillId(row.try_get("skill_id")?),
        skill_scale_id: SkillScaleId(row.try_get("skill_scale_id")?),
    })
}

// ---------------------------------------------------------------------------
// CourseRepository implementation
// ---------------------------------------------------------------------------

impl CourseRepository for SqliteCourseRepository {
    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT c.id, c.name, c.evaluation_type_id, et.name AS evaluation_type_name
               FROM courses c
               LEFT JOIN evaluation_types et ON et.id = c.evaluation_type_id
               WHERE c.id = ?"#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let course_row =
                    CourseRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(course_row.into_course()))
            }
            None => Ok(None),
        }
    }

    async fn list_skills(&self, course_id: CourseId) -> Result<Vec<Skill>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT s.id, s.course_id, s.skill_type_id, st.name AS skill_type_name, s.name
               FROM skills s
               JOIN skill_types st ON st.id = s.skill_type_id
               WHERE s.course_id = ?
               ORDER BY s.id"#,
        )
        .bind(course_id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut skills = Vec::with_capacity(rows.len());
        for row in &rows {
            let skill_row =
                SkillRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            skills.push(skill_row.into_skill());
        }

        Ok(skills)
    }

    async fn get_enrollment(&self, id: EnrollmentId) -> Result<Option<Enrollment>, RepositoryError> {
        let row = sqlx::query("SELECT id, course_id, student_name FROM enrollments WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let enrollment_row = EnrollmentRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(enrollment_row.into_enrollment()))
            }
            None => Ok(None),
        }
    }

    async fn list_enrollments_with_evaluations(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<EnrollmentWithEvaluations>, RepositoryError> {
        let enrollment_rows = sqlx::query(
            "SELECT id, course_id, student_name FROM enrollments WHERE course_id = ? ORDER BY id",
        )
        .bind(course_id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Batch-load all evaluations of the course, then bucket per
        // enrollment in memory.
        let evaluation_rows = sqlx::query(
            r#"SELECT se.enrollment_id, se.skill_id, se.skill_scale_id
               FROM skill_evaluations se
               JOIN enrollments e ON e.id = se.enrollment_id
               WHERE e.course_id = ?
               ORDER BY se.id"#,
        )
        .bind(course_id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut by_enrollment: HashMap<EnrollmentId, Vec<SkillEvaluation>> = HashMap::new();
        for row in &evaluation_rows {
            let evaluation =
                evaluation_from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            by_enrollment
                .entry(evaluation.enrollment_id)
                .or_default()
                .push(evaluation);
        }

        let mut enrollments = Vec::with_capacity(enrollment_rows.len());
        for row in &enrollment_rows {
            let enrollment = EnrollmentRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_enrollment();
            let evaluations = by_enrollment.remove(&enrollment.id).unwrap_or_default();
            enrollments.push(EnrollmentWithEvaluations {
                enrollment,
                evaluations,
            });
        }

        Ok(enrollments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testutil::*;

    #[tokio::test]
    async fn test_get_course_preloads_evaluation_type() {
        let pool = test_pool().await;
        let repo = SqliteCourseRepository::new(pool.clone());

        seed_evaluation_type(&pool, 1, "grades").await;
        seed_course(&pool, 3, "Woodworking", Some(1)).await;

        let course = repo.get_course(CourseId(3)).await.unwrap().unwrap();
        assert_eq!(course.name, "Woodworking");
        let evaluation_type = course.evaluation_type.unwrap();
        assert_eq!(evaluation_type.id, EvaluationTypeId(1));
        assert_eq!(evaluation_type.name, "grades");
    }

    #[tokio::test]
    async fn test_get_course_without_evaluation_type() {
        let pool = test_pool().await;
        let repo = SqliteCourseRepository::new(pool.clone());

        seed_course(&pool, 3, "Metalwork", None).await;

        let course = repo.get_course(CourseId(3)).await.unwrap().unwrap();
        assert!(course.evaluation_type.is_none());
    }

    #[tokio::test]
    async fn test_get_course_missing_returns_none() {
        let pool = test_pool().await;
        let repo = SqliteCourseRepository::new(pool.clone());

        assert!(repo.get_course(CourseId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_skills_joins_type_name_in_id_order() {
        let pool = test_pool().await;
        let repo = SqliteCourseRepository::new(pool.clone());

        seed_course(&pool, 1, "Woodworking", None).await;
        seed_skill_type(&pool, 1, "handwork").await;
        seed_skill_type(&pool, 2, "theory").await;
        seed_skill(&pool, 10, 1, 2, "materials").await;
        seed_skill(&pool, 11, 1, 1, "sawing").await;
        seed_skill(&pool, 12, 1, 1, "planing").await;

        // Skill of another course must not leak in.
        seed_course(&pool, 2, "Other", None).await;
        seed_skill(&pool, 20, 2, 1, "other").await;

        let skills = repo.list_skills(CourseId(1)).await.unwrap();
        let ids: Vec<i64> = skills.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert_eq!(skills[0].skill_type_name, "theory");
        assert_eq!(skills[1].skill_type_name, "handwork");
    }

    #[tokio::test]
    async fn test_get_enrollment() {
        let pool = test_pool().await;
        let repo = SqliteCourseRepository::new(pool.clone());

        seed_course(&pool, 1, "Woodworking", None).await;
        seed_enrollment(&pool, 42, 1, "Jonas").await;

        let enrollment = repo.get_enrollment(EnrollmentId(42)).await.unwrap().unwrap();
        assert_eq!(enrollment.course_id, CourseId(1));
        assert_eq!(enrollment.student_name, "Jonas");

        assert!(repo.get_enrollment(EnrollmentId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_enrollments_with_evaluations_buckets_per_enrollment() {
        let pool = test_pool().await;
        let repo = SqliteCourseRepository::new(pool.clone());

        seed_course(&pool, 1, "Woodworking", None).await;
        seed_skill_type(&pool, 1, "handwork").await;
        seed_skill(&pool, 10, 1, 1, "sawing").await;
        seed_skill(&pool, 11, 1, 1, "planing").await;
        seed_scale(&pool, 3, "practiced", 3).await;
        seed_enrollment(&pool, 42, 1, "Jonas").await;
        seed_enrollment(&pool, 43, 1, "Mara").await;

        sqlx::query(
            "INSERT INTO skill_evaluations (enrollment_id, skill_id, skill_scale_id) VALUES (42, 10, 3), (42, 11, 3)",
        )
        .execute(&pool.writer)
        .await
        .unwrap();

        let enrollments = repo
            .list_enrollments_with_evaluations(CourseId(1))
            .await
            .unwrap();

        assert_eq!(enrollments.len(), 2);
        assert_eq!(enrollments[0].enrollment.id, EnrollmentId(42));
        assert_eq!(enrollments[0].evaluations.len(), 2);
        assert_eq!(enrollments[1].enrollment.id, EnrollmentId(43));
        assert!(enrollments[1].evaluations.is_empty());
    }
}
