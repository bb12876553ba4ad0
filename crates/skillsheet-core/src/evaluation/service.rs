//! Evaluation service carrying the three skill-evaluation operations.
//!
//! Generic over the repository traits and the gate to maintain clean
//! architecture (skillsheet-core never depends on skillsheet-infra). Every
//! operation takes the acting user explicitly and checks the gate before
//! returning any data; denial, missing entities, and storage failures all
//! abort the request.

use std::collections::HashMap;

use skillsheet_types::config::AppConfig;
use skillsheet_types::error::EvaluationError;
use skillsheet_types::ids::{CourseId, EnrollmentId, SkillId, SkillScaleId};
use skillsheet_types::sheet::{CourseSkillOverview, StudentSkillSheet};
use skillsheet_types::skill::{
    AnnotatedSkill, AnnotatedSkillGroup, EvaluationRequest, Skill, SkillGroup,
};
use skillsheet_types::user::User;
use tracing::info;

use crate::authz::{Action, Gate};
use crate::evaluation::repository::{CourseRepository, EvaluationRepository, GradingRepository};

/// Orchestrates skill-evaluation reads and the evaluation upsert.
pub struct EvaluationService<C, E, R, G>
where
    C: CourseRepository,
    E: EvaluationRepository,
    R: GradingRepository,
    G: Gate,
{
    courses: C,
    evaluations: E,
    grading: R,
    gate: G,
    config: AppConfig,
}

impl<C, E, R, G> EvaluationService<C, E, R, G>
where
    C: CourseRepository,
    E: EvaluationRepository,
    R: GradingRepository,
    G: Gate,
{
    pub fn new(courses: C, evaluations: E, grading: R, gate: G, config: AppConfig) -> Self {
        Self {
            courses,
            evaluations,
            grading,
            gate,
            config,
        }
    }

    /// Skills overview for all students in a course: skills grouped by
    /// skill type plus every enrollment with its evaluations pre-loaded.
    ///
    /// Pure read; requires view access to the course.
    pub async fn course_overview(
        &self,
        user: &User,
        course_id: CourseId,
    ) -> Result<CourseSkillOverview, EvaluationError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(EvaluationError::CourseNotFound)?;

        if self.gate.denies(user, Action::ViewCourse(&course)) {
            return Err(EvaluationError::Forbidden);
        }

        let skills = self.courses.list_skills(course.id).await?;
        let skill_groups = group_skills(skills);
        let enrollments = self
            .courses
            .list_enrollments_with_evaluations(course.id)
            .await?;

        Ok(CourseSkillOverview {
            course,
            skill_groups,
            enrollments,
        })
    }

    /// Record a scale value for one (enrollment, skill) pair.
    ///
    /// Strict lookup on the enrollment, view access to its parent course,
    /// then an atomic insert-or-update keyed by (enrollment, skill). The
    /// scale reference is overwritten unconditionally whether the record is
    /// new or existing. Returns the persisted scale id.
    pub async fn record_evaluation(
        &self,
        user: &User,
        request: EvaluationRequest,
    ) -> Result<SkillScaleId, EvaluationError> {
        let enrollment = self
            .courses
            .get_enrollment(request.enrollment_id)
            .await?
            .ok_or(EvaluationError::EnrollmentNotFound)?;

        let course = self
            .courses
            .get_course(enrollment.course_id)
            .await?
            .ok_or(EvaluationError::CourseNotFound)?;

        if self.gate.denies(user, Action::ViewCourse(&course)) {
            return Err(EvaluationError::Forbidden);
        }

        let stored = self
            .evaluations
            .upsert(enrollment.id, request.skill_id, request.skill_scale_id)
            .await?;

        info!(
            enrollment_id = %enrollment.id,
            skill_id = %request.skill_id,
            skill_scale_id = %stored,
            "skill evaluation recorded"
        );

        Ok(stored)
    }

    /// Assemble one student's skill sheet: every course skill annotated
    /// with the student's evaluation status (or `None`), grouped by skill
    /// type, plus ordered scales, the optional overall result, all result
    /// types, and the writeaccess flag.
    pub async fn student_sheet(
        &self,
        user: &User,
        enrollment_id: EnrollmentId,
    ) -> Result<StudentSkillSheet, EvaluationError> {
        let enrollment = self
            .courses
            .get_enrollment(enrollment_id)
            .await?
            .ok_or(EvaluationError::EnrollmentNotFound)?;

        if self.gate.denies(user, Action::ViewEnrollment(&enrollment)) {
            return Err(EvaluationError::Forbidden);
        }

        let evaluations = self.evaluations.list_for_enrollment(enrollment.id).await?;
        let status_by_skill: HashMap<SkillId, SkillScaleId> = evaluations
            .iter()
            .map(|e| (e.skill_id, e.skill_scale_id))
            .collect();

        let course = self
            .courses
            .get_course(enrollment.course_id)
            .await?
            .ok_or(EvaluationError::CourseNotFound)?;

        let annotated = self
            .courses
            .list_skills(course.id)
            .await?
            .into_iter()
            .map(|skill| AnnotatedSkill {
                status: status_by_skill.get(&skill.id).copied(),
                id: skill.id,
                name: skill.name,
                skill_type_id: skill.skill_type_id,
                skill_type_name: skill.skill_type_name,
            })
            .collect();
        let skill_groups = group_annotated_skills(annotated);

        let result = self.grading.get_result(enrollment.id).await?;
        let result_types = self.grading.list_result_types().await?;
        let scales = self.grading.list_scales().await?;

        let writeaccess = self.config.teachers_can_edit_result
            || self.gate.allows(user, Action::EditEnrollments);

        Ok(StudentSkillSheet {
            enrollment,
            skill_groups,
            scales,
            result,
            result_types,
            writeaccess,
        })
    }
}

/// Group skills by skill type, one group per distinct type id in order of
/// first appearance, each preserving the skills' retrieval order.
fn group_skills(skills: Vec<Skill>) -> Vec<SkillGroup> {
    let mut groups: Vec<SkillGroup> = Vec::new();
    for skill in skills {
        match groups
            .iter_mut()
            .find(|g| g.skill_type_id == skill.skill_type_id)
        {
            Some(group) => group.skills.push(skill),
            None => groups.push(SkillGroup {
                skill_type_id: skill.skill_type_id,
                skill_type_name: skill.skill_type_name.clone(),
                skills: vec![skill],
            }),
        }
    }
    groups
}

/// Same grouping for annotated skills.
fn group_annotated_skills(skills: Vec<AnnotatedSkill>) -> Vec<AnnotatedSkillGroup> {
    let mut groups: Vec<AnnotatedSkillGroup> = Vec::new();
    for skill in skills {
        match groups
            .iter_mut()
            .find(|g| g.skill_type_id == skill.skill_type_id)
        {
            Some(group) => group.skills.push(skill),
            None => groups.push(AnnotatedSkillGroup {
                skill_type_id: skill.skill_type_id,
                skill_type_name: skill.skill_type_name.clone(),
                skills: vec![skill],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::CapabilityGate;
    use skillsheet_types::course::{Course, Enrollment, EnrollmentWithEvaluations};
    use skillsheet_types::error::RepositoryError;
    use skillsheet_types::ids::{ResultTypeId, SkillTypeId, UserId};
    use skillsheet_types::result::{ResultRecord, ResultType};
    use skillsheet_types::skill::{SkillEvaluation, SkillScale};
    use skillsheet_types::user::UserRole;
    use std::collections::HashSet;
    use std::sync::Mutex;

    // --- In-memory fakes ---

    struct FakeCourseRepo {
        courses: Vec<Course>,
        skills: Vec<Skill>,
        enrollments: Vec<Enrollment>,
    }

    impl CourseRepository for FakeCourseRepo {
        async fn get_course(&self, id: CourseId) -> Result<Option<Course>, RepositoryError> {
            Ok(self.courses.iter().find(|c| c.id == id).cloned())
        }

        async fn list_skills(&self, course_id: CourseId) -> Result<Vec<Skill>, RepositoryError> {
            Ok(self
                .skills
                .iter()
                .filter(|s| s.course_id == course_id)
                .cloned()
                .collect())
        }

        async fn get_enrollment(
            &self,
            id: EnrollmentId,
        ) -> Result<Option<Enrollment>, RepositoryError> {
            Ok(self.enrollments.iter().find(|e| e.id == id).cloned())
        }

        async fn list_enrollments_with_evaluations(
            &self,
            course_id: CourseId,
        ) -> Result<Vec<EnrollmentWithEvaluations>, RepositoryError> {
            Ok(self
                .enrollments
                .iter()
                .filter(|e| e.course_id == course_id)
                .map(|e| EnrollmentWithEvaluations {
                    enrollment: e.clone(),
                    evaluations: Vec::new(),
                })
                .collect())
        }
    }

    struct FakeEvaluationRepo {
        records: Mutex<HashMap<(EnrollmentId, SkillId), SkillScaleId>>,
    }

    impl FakeEvaluationRepo {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }

        fn with_record(self, enrollment: i64, skill: i64, scale: i64) -> Self {
            self.records.lock().unwrap().insert(
                (EnrollmentId(enrollment), SkillId(skill)),
                SkillScaleId(scale),
            );
            self
        }

        fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    impl EvaluationRepository for FakeEvaluationRepo {
        async fn list_for_enrollment(
            &self,
            enrollment_id: EnrollmentId,
        ) -> Result<Vec<SkillEvaluation>, RepositoryError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|((e, _), _)| *e == enrollment_id)
                .map(|((e, s), scale)| SkillEvaluation {
                    enrollment_id: *e,
                    skill_id: *s,
                    skill_scale_id: *scale,
                })
                .collect())
        }

        async fn upsert(
            &self,
            enrollment_id: EnrollmentId,
            skill_id: SkillId,
            scale_id: SkillScaleId,
        ) -> Result<SkillScaleId, RepositoryError> {
            self.records
                .lock()
                .unwrap()
                .insert((enrollment_id, skill_id), scale_id);
            Ok(scale_id)
        }
    }

    struct FakeGradingRepo {
        scales: Vec<SkillScale>,
        result: Option<ResultRecord>,
        result_types: Vec<ResultType>,
    }

    impl FakeGradingRepo {
        fn empty() -> Self {
            Self {
                scales: Vec::new(),
                result: None,
                result_types: Vec::new(),
            }
        }
    }

    impl GradingRepository for FakeGradingRepo {
        async fn list_scales(&self) -> Result<Vec<SkillScale>, RepositoryError> {
            Ok(self.scales.clone())
        }

        async fn get_result(
            &self,
            enrollment_id: EnrollmentId,
        ) -> Result<Option<ResultRecord>, RepositoryError> {
            Ok(self
                .result
                .clone()
                .filter(|r| r.enrollment_id == enrollment_id))
        }

        async fn list_result_types(&self) -> Result<Vec<ResultType>, RepositoryError> {
            Ok(self.result_types.clone())
        }
    }

    // --- Fixtures ---

    fn course(id: i64) -> Course {
        Course {
            id: CourseId(id),
            name: "Metalwork".to_string(),
            evaluation_type: None,
        }
    }

    fn skill(id: i64, course_id: i64, type_id: i64) -> Skill {
        Skill {
            id: SkillId(id),
            course_id: CourseId(course_id),
            skill_type_id: SkillTypeId(type_id),
            skill_type_name: format!("type-{type_id}"),
            name: format!("skill-{id}"),
        }
    }

    fn enrollment(id: i64, course_id: i64) -> Enrollment {
        Enrollment {
            id: EnrollmentId(id),
            course_id: CourseId(course_id),
            student_name: "Jonas".to_string(),
        }
    }

    fn admin() -> User {
        User {
            id: UserId(1),
            name: "admin".to_string(),
            role: UserRole::Admin,
            capabilities: HashSet::new(),
            course_ids: HashSet::new(),
        }
    }

    fn outsider() -> User {
        User {
            id: UserId(2),
            name: "outsider".to_string(),
            role: UserRole::Teacher,
            capabilities: HashSet::new(),
            course_ids: HashSet::new(),
        }
    }

    fn teacher_of(course_id: i64) -> User {
        User {
            id: UserId(3),
            name: "teacher".to_string(),
            role: UserRole::Teacher,
            capabilities: HashSet::new(),
            course_ids: HashSet::from([CourseId(course_id)]),
        }
    }

    fn service(
        courses: FakeCourseRepo,
        evaluations: FakeEvaluationRepo,
        grading: FakeGradingRepo,
        config: AppConfig,
    ) -> EvaluationService<FakeCourseRepo, FakeEvaluationRepo, FakeGradingRepo, CapabilityGate>
    {
        EvaluationService::new(courses, evaluations, grading, CapabilityGate, config)
    }

    // --- Tests ---

    #[tokio::test]
    async fn overview_groups_skills_by_type_in_first_seen_order() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            // Types interleaved: 2, 1, 2 -- groups must come out as [2, 1].
            skills: vec![skill(10, 1, 2), skill(11, 1, 1), skill(12, 1, 2)],
            enrollments: vec![enrollment(42, 1)],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let overview = svc.course_overview(&admin(), CourseId(1)).await.unwrap();

        let type_ids: Vec<i64> = overview
            .skill_groups
            .iter()
            .map(|g| g.skill_type_id.0)
            .collect();
        assert_eq!(type_ids, vec![2, 1]);

        let group_two = &overview.skill_groups[0];
        let ids: Vec<i64> = group_two.skills.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![10, 12]);

        assert_eq!(overview.enrollments.len(), 1);
        assert_eq!(overview.enrollments[0].enrollment.id, EnrollmentId(42));
    }

    #[tokio::test]
    async fn overview_denied_for_non_course_teacher() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![skill(10, 1, 1)],
            enrollments: vec![],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let err = svc
            .course_overview(&outsider(), CourseId(1))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Forbidden));
    }

    #[tokio::test]
    async fn overview_missing_course_is_not_found() {
        let courses = FakeCourseRepo {
            courses: vec![],
            skills: vec![],
            enrollments: vec![],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let err = svc.course_overview(&admin(), CourseId(5)).await.unwrap_err();
        assert!(matches!(err, EvaluationError::CourseNotFound));
    }

    #[tokio::test]
    async fn record_evaluation_then_overwrite_keeps_one_record() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![skill(10, 1, 1)],
            enrollments: vec![enrollment(42, 1)],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );
        let user = teacher_of(1);

        let request = EvaluationRequest {
            enrollment_id: EnrollmentId(42),
            skill_id: SkillId(10),
            skill_scale_id: SkillScaleId(3),
        };
        let stored = svc.record_evaluation(&user, request.clone()).await.unwrap();
        assert_eq!(stored, SkillScaleId(3));

        let stored = svc
            .record_evaluation(
                &user,
                EvaluationRequest {
                    skill_scale_id: SkillScaleId(5),
                    ..request
                },
            )
            .await
            .unwrap();
        assert_eq!(stored, SkillScaleId(5));
        assert_eq!(svc.evaluations.record_count(), 1);
    }

    #[tokio::test]
    async fn record_evaluation_unknown_enrollment_writes_nothing() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![],
            enrollments: vec![],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let err = svc
            .record_evaluation(
                &admin(),
                EvaluationRequest {
                    enrollment_id: EnrollmentId(99),
                    skill_id: SkillId(10),
                    skill_scale_id: SkillScaleId(3),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EvaluationError::EnrollmentNotFound));
        assert_eq!(svc.evaluations.record_count(), 0);
    }

    #[tokio::test]
    async fn record_evaluation_denied_writes_nothing() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![],
            enrollments: vec![enrollment(42, 1)],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let err = svc
            .record_evaluation(
                &outsider(),
                EvaluationRequest {
                    enrollment_id: EnrollmentId(42),
                    skill_id: SkillId(10),
                    skill_scale_id: SkillScaleId(3),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EvaluationError::Forbidden));
        assert_eq!(svc.evaluations.record_count(), 0);
    }

    #[tokio::test]
    async fn sheet_annotates_unevaluated_skills_with_none() {
        // Enrollment 42 has no evaluations; skills S1,S2 (type 1), S3 (type 2).
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![skill(1, 1, 1), skill(2, 1, 1), skill(3, 1, 2)],
            enrollments: vec![enrollment(42, 1)],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let sheet = svc
            .student_sheet(&teacher_of(1), EnrollmentId(42))
            .await
            .unwrap();

        assert_eq!(sheet.skill_groups.len(), 2);
        assert_eq!(sheet.skill_groups[0].skill_type_id, SkillTypeId(1));
        let first: Vec<i64> = sheet.skill_groups[0].skills.iter().map(|s| s.id.0).collect();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(sheet.skill_groups[1].skill_type_id, SkillTypeId(2));
        assert_eq!(sheet.skill_groups[1].skills[0].id, SkillId(3));
        assert!(sheet
            .skill_groups
            .iter()
            .flat_map(|g| &g.skills)
            .all(|s| s.status.is_none()));
    }

    #[tokio::test]
    async fn sheet_status_reflects_evaluations_including_zero_scale() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![skill(1, 1, 1), skill(2, 1, 1)],
            enrollments: vec![enrollment(42, 1)],
        };
        // Scale id 0 is a legal value and must be distinguishable from "unset".
        let evaluations = FakeEvaluationRepo::new().with_record(42, 1, 0);
        let svc = service(
            courses,
            evaluations,
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let sheet = svc
            .student_sheet(&teacher_of(1), EnrollmentId(42))
            .await
            .unwrap();

        let skills = &sheet.skill_groups[0].skills;
        assert_eq!(skills[0].status, Some(SkillScaleId(0)));
        assert_eq!(skills[1].status, None);
    }

    #[tokio::test]
    async fn sheet_includes_result_and_scales() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![],
            enrollments: vec![enrollment(42, 1)],
        };
        let grading = FakeGradingRepo {
            scales: vec![
                SkillScale {
                    id: SkillScaleId(0),
                    name: "not yet".to_string(),
                    value: 0,
                },
                SkillScale {
                    id: SkillScaleId(1),
                    name: "proficient".to_string(),
                    value: 10,
                },
            ],
            result: Some(ResultRecord {
                enrollment_id: EnrollmentId(42),
                result_type: ResultType {
                    id: ResultTypeId(1),
                    name: "passed".to_string(),
                },
            }),
            result_types: vec![ResultType {
                id: ResultTypeId(1),
                name: "passed".to_string(),
            }],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            grading,
            AppConfig::default(),
        );

        let sheet = svc
            .student_sheet(&admin(), EnrollmentId(42))
            .await
            .unwrap();

        assert_eq!(sheet.result.as_ref().unwrap().result_type.name, "passed");
        assert_eq!(sheet.result_types.len(), 1);
        assert_eq!(sheet.scales.len(), 2);
    }

    #[tokio::test]
    async fn sheet_denied_for_foreign_enrollment() {
        let courses = FakeCourseRepo {
            courses: vec![course(1)],
            skills: vec![],
            enrollments: vec![enrollment(42, 1)],
        };
        let svc = service(
            courses,
            FakeEvaluationRepo::new(),
            FakeGradingRepo::empty(),
            AppConfig::default(),
        );

        let err = svc
            .student_sheet(&teacher_of(8), EnrollmentId(42))
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Forbidden));
    }

    #[tokio::test]
    async fn writeaccess_from_config_or_capability() {
        let build = |config: AppConfig| {
            service(
                FakeCourseRepo {
                    courses: vec![course(1)],
                    skills: vec![],
                    enrollments: vec![enrollment(42, 1)],
                },
                FakeEvaluationRepo::new(),
                FakeGradingRepo::empty(),
                config,
            )
        };

        // Neither the setting nor the capability: no write access.
        let sheet = build(AppConfig::default())
            .student_sheet(&teacher_of(1), EnrollmentId(42))
            .await
            .unwrap();
        assert!(!sheet.writeaccess);

        // Global setting alone is enough.
        let sheet = build(AppConfig {
            teachers_can_edit_result: true,
        })
        .student_sheet(&teacher_of(1), EnrollmentId(42))
        .await
        .unwrap();
        assert!(sheet.writeaccess);

        // Capability alone is enough.
        let mut editor = teacher_of(1);
        editor
            .capabilities
            .insert(crate::authz::ENROLLMENTS_EDIT.to_string());
        let sheet = build(AppConfig::default())
            .student_sheet(&editor, EnrollmentId(42))
            .await
            .unwrap();
        assert!(sheet.writeaccess);
    }
}
