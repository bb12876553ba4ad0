use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, EnrollmentId, EvaluationTypeId};
use crate::skill::SkillEvaluation;

/// Evaluation configuration attached to a course (e.g. "grades",
/// "pass/fail"). Managed by course administration; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationType {
    pub id: EvaluationTypeId,
    pub name: String,
}

/// A course, with its evaluation-type relation pre-loaded when fetched.
///
/// Courses own skills and enrollments; both collections are fetched through
/// the repository rather than embedded here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub evaluation_type: Option<EvaluationType>,
}

/// A student's registration in a specific course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub course_id: CourseId,
    pub student_name: String,
}

/// An enrollment with its skill-evaluation records pre-loaded, so the
/// presentation layer can cross-reference skills without further queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentWithEvaluations {
    pub enrollment: Enrollment,
    pub evaluations: Vec<SkillEvaluation>,
}
