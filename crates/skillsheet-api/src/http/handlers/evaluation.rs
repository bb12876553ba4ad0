//! Skill-evaluation handlers for the REST API.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;

use skillsheet_types::ids::{CourseId, EnrollmentId};
use skillsheet_types::sheet::{CourseSkillOverview, StudentSkillSheet};
use skillsheet_types::skill::EvaluationRequest;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/courses/:id/skills - Skills overview for all students in
/// the course.
pub async fn course_overview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<i64>,
) -> Result<Json<ApiResponse<CourseSkillOverview>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let overview = state
        .evaluation_service
        .course_overview(&user, CourseId(course_id))
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(overview, request_id, elapsed)
        .with_link("self", &format!("/api/v1/courses/{course_id}/skills"));

    Ok(Json(resp))
}

/// Response body for a recorded evaluation: just the persisted scale id,
/// for cheap client-side confirmation.
#[derive(Debug, serde::Serialize)]
pub struct RecordedEvaluation {
    pub skill_scale_id: skillsheet_types::ids::SkillScaleId,
}

/// POST /api/v1/evaluations - Record a skill evaluation for a student.
pub async fn record_evaluation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<EvaluationRequest>,
) -> Result<Json<ApiResponse<RecordedEvaluation>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let enrollment_id = body.enrollment_id;
    let stored = state.evaluation_service.record_evaluation(&user, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        RecordedEvaluation {
            skill_scale_id: stored,
        },
        request_id,
        elapsed,
    )
    .with_link("self", "/api/v1/evaluations")
    .with_link(
        "sheet",
        &format!("/api/v1/enrollments/{enrollment_id}/skills"),
    );

    Ok(Json(resp))
}

/// GET /api/v1/enrollments/:id/skills - One student's annotated skill
/// sheet.
pub async fn student_sheet(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<ApiResponse<StudentSkillSheet>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let sheet = state
        .evaluation_service
        .student_sheet(&user, EnrollmentId(enrollment_id))
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let course_id = sheet.enrollment.course_id;
    let resp = ApiResponse::success(sheet, request_id, elapsed)
        .with_link(
            "self",
            &format!("/api/v1/enrollments/{enrollment_id}/skills"),
        )
        .with_link("course", &format!("/api/v1/courses/{course_id}/skills"));

    Ok(Json(resp))
}
