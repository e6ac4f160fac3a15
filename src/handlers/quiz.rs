// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    config::DEFAULT_QUIZ_ID,
    error::AppError,
    models::quiz::{QuizContentResponse, QuizContentRow, QuizIdParams, QuizQuestionView},
    repositories::quizzes,
    utils::ids::parse_id_str,
};

/// Returns the ordered questions of a quiz for rendering.
///
/// A missing or unparsable `qid` selects the default quiz. When the quiz has
/// no questions, the lowest quiz that does is served instead.
pub async fn get_questions(
    State(pool): State<PgPool>,
    Query(params): Query<QuizIdParams>,
) -> Result<impl IntoResponse, AppError> {
    let requested = params
        .qid
        .as_deref()
        .and_then(parse_id_str)
        .unwrap_or(DEFAULT_QUIZ_ID);

    let mut conn = pool.acquire().await?;

    let (quiz_id, questions) = quizzes::load_served_quiz(&mut *conn, requested)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let title = quizzes::find_title(&mut *conn, quiz_id).await?;

    let views: Vec<QuizQuestionView> = questions
        .iter()
        .map(|q| QuizQuestionView::from_stored(q, quiz_id, title.as_deref()))
        .collect();

    Ok(Json(views))
}

/// Dumps a quiz in the flat four-option layout.
pub async fn get_quiz_content(
    State(pool): State<PgPool>,
    Query(params): Query<QuizIdParams>,
) -> Result<impl IntoResponse, AppError> {
    let qid = params
        .qid
        .as_deref()
        .and_then(parse_id_str)
        .ok_or(AppError::BadRequest(
            "qid query param is required and must be an integer".to_string(),
        ))?;

    let mut conn = pool.acquire().await?;
    let questions = quizzes::load_questions(&mut *conn, qid).await?;
    let quiz_title = quizzes::find_title(&mut *conn, qid).await?;

    Ok(Json(QuizContentResponse {
        qid,
        quiz_title,
        questions: questions
            .iter()
            .map(|q| QuizContentRow::from_stored(qid, q))
            .collect(),
    }))
}
