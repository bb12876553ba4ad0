//! System status command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

async fn count(state: &AppState, table: &str) -> Result<i64> {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&state.db_pool.reader)
        .await?;
    Ok(row.0)
}

/// Display database and configuration status.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let courses = count(state, "courses").await?;
    let enrollments = count(state, "enrollments").await?;
    let skills = count(state, "skills").await?;
    let evaluations = count(state, "skill_evaluations").await?;
    let users = count(state, "users").await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "courses": courses,
            "enrollments": enrollments,
            "skills": skills,
            "evaluations": evaluations,
            "users": users,
            "teachers_can_edit_result": state.config.teachers_can_edit_result,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Skillsheet v{}",
        style("📋").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  {}", style("── Database ──").dim());
    println!("  Courses:      {}", style(courses).bold());
    println!("  Enrollments:  {}", style(enrollments).bold());
    println!("  Skills:       {}", style(skills).bold());
    println!("  Evaluations:  {}", style(evaluations).green());
    println!("  Users:        {}", style(users).bold());
    println!();
    println!("  {}", style("── Config ──").dim());
    println!(
        "  Teachers can edit result: {}",
        if state.config.teachers_can_edit_result {
            style("yes").green()
        } else {
            style("no").dim()
        }
    );
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!();

    Ok(())
}
