use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, EnrollmentId, SkillId, SkillScaleId, SkillTypeId};

/// A gradable competency defined within a course.
///
/// The skill-type name is joined in at retrieval time so grouping and
/// annotation never need a per-row lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub course_id: CourseId,
    pub skill_type_id: SkillTypeId,
    pub skill_type_name: String,
    pub name: String,
}

/// An ordered achievement level assignable to a skill evaluation
/// (e.g. "not yet" .. "proficient"). `value` defines the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScale {
    pub id: SkillScaleId,
    pub name: String,
    pub value: i64,
}

/// The recorded scale value for one student's one skill.
///
/// At most one record exists per (enrollment, skill) pair; the scale
/// reference is overwritten on re-evaluation, never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEvaluation {
    pub enrollment_id: EnrollmentId,
    pub skill_id: SkillId,
    pub skill_scale_id: SkillScaleId,
}

/// Request payload for recording one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub enrollment_id: EnrollmentId,
    pub skill_id: SkillId,
    pub skill_scale_id: SkillScaleId,
}

/// A skill annotated with one student's evaluation status.
///
/// Built fresh during sheet assembly instead of mutating `Skill`. `status`
/// is `None` when the student has no evaluation for this skill -- never a
/// zero or default scale id, since those are legal scale identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedSkill {
    pub id: SkillId,
    pub name: String,
    pub skill_type_id: SkillTypeId,
    pub skill_type_name: String,
    pub status: Option<SkillScaleId>,
}

/// Skills of one skill type, in original retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub skill_type_id: SkillTypeId,
    pub skill_type_name: String,
    pub skills: Vec<Skill>,
}

/// Annotated skills of one skill type, in original retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedSkillGroup {
    pub skill_type_id: SkillTypeId,
    pub skill_type_name: String,
    pub skills: Vec<AnnotatedSkill>,
}
