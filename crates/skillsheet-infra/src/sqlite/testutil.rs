//! Shared fixtures for the SQLite repository tests.
//!
//! Courses, skills, scales, enrollments, and results are owned by external
//! course administration in production, so tests seed them with raw inserts.

use super::pool::DatabasePool;

pub(crate) async fn test_pool() -> DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    // Leak tempdir so it lives for the test
    std::mem::forget(dir);
    DatabasePool::new(&url).await.unwrap()
}

pub(crate) async fn seed_evaluation_type(pool: &DatabasePool, id: i64, name: &str) {
    sqlx::query("INSERT INTO evaluation_types (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&pool.writer)
        .await
        .unwrap();
}

pub(crate) async fn seed_course(
    pool: &DatabasePool,
    id: i64,
    name: &str,
    evaluation_type_id: Option<i64>,
) {
    sqlx::query("INSERT INTO courses (id, name, evaluation_type_id) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(evaluation_type_id)
        .execute(&pool.writer)
        .await
        .unwrap();
}

pub(crate) async fn seed_skill_type(pool: &DatabasePool, id: i64, name: &str) {
    sqlx::query("INSERT INTO skill_types (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&pool.writer)
        .await
        .unwrap();
}

pub(crate) async fn seed_skill(
    pool: &DatabasePool,
    id: i64,
    course_id: i64,
    skill_type_id: i64,
    name: &str,
) {
    sqlx::query("INSERT INTO skills (id, course_id, skill_type_id, name) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(course_id)
        .bind(skill_type_id)
        .bind(name)
        .execute(&pool.writer)
        .await
        .unwrap();
}

pub(crate) async fn seed_scale(pool: &DatabasePool, id: i64, name: &str, value: i64) {
    sqlx::query("INSERT INTO skill_scales (id, name, value) VALUES (?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(value)
        .execute(&pool.writer)
        .await
        .unwrap();
}

pub(crate) async fn seed_enrollment(pool: &DatabasePool, id: i64, course_id: i64, student: &str) {
    sqlx::query("INSERT INTO enrollments (id, course_id, student_name) VALUES (?, ?, ?)")
        .bind(id)
        .bind(course_id)
        .bind(student)
        .execute(&pool.writer)
        .await
        .unwrap();
}

pub(crate) async fn seed_result_type(pool: &DatabasePool, id: i64, name: &str) {
    sqlx::query("INSERT INTO result_types (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(&pool.writer)
        .await
        .unwrap();
}

pub(crate) async fn seed_result(
    pool: &DatabasePool,
    id: i64,
    enrollment_id: i64,
    result_type_id: i64,
) {
    sqlx::query("INSERT INTO results (id, enrollment_id, result_type_id) VALUES (?, ?, ?)")
        .bind(id)
        .bind(enrollment_id)
        .bind(result_type_id)
        .execute(&pool.writer)
        .await
        .unwrap();
}
