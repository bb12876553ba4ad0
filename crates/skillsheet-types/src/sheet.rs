use serde::{Deserialize, Serialize};

use crate::course::{Course, Enrollment, EnrollmentWithEvaluations};
use crate::result::{ResultRecord, ResultType};
use crate::skill::{AnnotatedSkillGroup, SkillGroup, SkillScale};

/// Data bundle for the course-wide skills overview: the course, its skills
/// grouped by skill type, and every enrollment with evaluations pre-loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSkillOverview {
    pub course: Course,
    pub skill_groups: Vec<SkillGroup>,
    pub enrollments: Vec<EnrollmentWithEvaluations>,
}

/// Data bundle for one student's skill sheet.
///
/// `scales` is sorted ascending by value -- the contract the presentation
/// layer relies on for rendering scale options low-to-high. `writeaccess`
/// tells the client whether the overall result may be edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSkillSheet {
    pub enrollment: Enrollment,
    pub skill_groups: Vec<AnnotatedSkillGroup>,
    pub scales: Vec<SkillScale>,
    pub result: Option<ResultRecord>,
    pub result_types: Vec<ResultType>,
    pub writeaccess: bool,
}
