// src/handlers/courses.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::course::{Course, CourseListParams, CourseVideo},
};

/// Lists all courses, optionally filtered by category.
pub async fn list_courses(
    State(pool): State<PgPool>,
    Query(params): Query<CourseListParams>,
) -> Result<impl IntoResponse, AppError> {
    let category = params.category.filter(|c| !c.is_empty());

    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, category, description, created_at
        FROM courses
        WHERE ($1::TEXT IS NULL OR category = $1)
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(&pool)
    .await?;

    Ok(Json(courses))
}

/// Lists every course video with the title of its course.
pub async fn list_course_videos(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let videos = sqlx::query_as::<_, CourseVideo>(
        r#"
        SELECT
            v.course_id,
            c.title AS course_title,
            v.title AS video_title,
            v.video_url
        FROM course_videos v
        JOIN courses c ON c.id = v.course_id
        ORDER BY v.course_id, v.position, v.id
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(videos))
}
