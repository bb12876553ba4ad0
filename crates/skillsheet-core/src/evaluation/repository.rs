//! Repository trait definitions for the evaluation service.
//!
//! Implementations live in skillsheet-infra (e.g. `SqliteCourseRepository`).
//! Uses native async fn in traits (RPITIT).

use skillsheet_types::course::{Course, Enrollment, EnrollmentWithEvaluations};
use skillsheet_types::error::RepositoryError;
use skillsheet_types::ids::{CourseId, EnrollmentId, SkillId, SkillScaleId};
use skillsheet_types::result::{ResultRecord, ResultType};
use skillsheet_types::skill::{Skill, SkillEvaluation, SkillScale};

/// Read model for courses, their skills, and their enrollments.
pub trait CourseRepository: Send + Sync {
    /// Get a course by id with its evaluation-type relation pre-loaded.
    fn get_course(
        &self,
        id: CourseId,
    ) -> impl std::future::Future<Output = Result<Option<Course>, RepositoryError>> + Send;

    /// All skills of a course in natural retrieval order, with the
    /// skill-type name joined in.
    fn list_skills(
        &self,
        course_id: CourseId,
    ) -> impl std::future::Future<Output = Result<Vec<Skill>, RepositoryError>> + Send;

    /// Get an enrollment by id.
    fn get_enrollment(
        &self,
        id: EnrollmentId,
    ) -> impl std::future::Future<Output = Result<Option<Enrollment>, RepositoryError>> + Send;

    /// Every enrollment of a course, each with its skill-evaluation
    /// records pre-loaded (no per-row round trips).
    fn list_enrollments_with_evaluations(
        &self,
        course_id: CourseId,
    ) -> impl std::future::Future<Output = Result<Vec<EnrollmentWithEvaluations>, RepositoryError>> + Send;
}

/// Persistence for skill-evaluation records.
pub trait EvaluationRepository: Send + Sync {
    /// All evaluation records of one enrollment.
    fn list_for_enrollment(
        &self,
        enrollment_id: EnrollmentId,
    ) -> impl std::future::Future<Output = Result<Vec<SkillEvaluation>, RepositoryError>> + Send;

    /// Atomically insert or update the evaluation keyed by
    /// (enrollment, skill), setting its scale reference unconditionally.
    /// Returns the persisted scale id.
    fn upsert(
        &self,
        enrollment_id: EnrollmentId,
        skill_id: SkillId,
        scale_id: SkillScaleId,
    ) -> impl std::future::Future<Output = Result<SkillScaleId, RepositoryError>> + Send;
}

/// Read model for scales and overall results.
pub trait GradingRepository: Send + Sync {
    /// All skill scales, sorted ascending by `value`.
    fn list_scales(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SkillScale>, RepositoryError>> + Send;

    /// The enrollment's overall result, if any, with its result type
    /// pre-loaded.
    fn get_result(
        &self,
        enrollment_id: EnrollmentId,
    ) -> impl std::future::Future<Output = Result<Option<ResultRecord>, RepositoryError>> + Send;

    /// All result types.
    fn list_result_types(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ResultType>, RepositoryError>> + Send;
}
