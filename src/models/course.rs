// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A course video joined with the title of its course.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseVideo {
    pub course_id: i64,
    pub course_title: String,
    pub video_title: String,
    pub video_url: String,
}

/// Query parameters for listing courses.
#[derive(Debug, Deserialize)]
pub struct CourseListParams {
    pub category: Option<String>,
}
