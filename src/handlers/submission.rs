// src/handlers/submission.rs

use std::collections::{HashMap, HashSet};

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::{
    config::{DEFAULT_QUIZ_TITLE, NISM_CH1_LEGACY_QID},
    error::AppError,
    grading::{AnswerKey, grade},
    models::{
        quiz::StoredQuestion,
        submission::{
            AnswerInsertRequest, LatestSubmissionResponse, LegacySubmitRequest, SubmitQuizRequest,
            SubmitQuizResponse, SubmittedQuestion,
        },
    },
    repositories::{
        quizzes,
        submissions::{self, NewAnswer},
    },
};

/// Grades a quiz attempt and stores it.
///
/// * Rejects malformed `answers` / `questions` before touching the database.
/// * Grades against the stored answer key of the resolved quiz.
/// * Writes the submission and one answer per question in one transaction;
///   any failed insert rolls the whole attempt back.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let request = SubmitQuizRequest::from_value(&body)?;

    let mut tx = pool.begin().await?;

    match record_attempt(&mut *tx, &request).await {
        Ok(response) => {
            tx.commit().await?;
            Ok(Json(response))
        }
        Err(e) => {
            rollback(tx, "quiz submission").await;
            Err(e)
        }
    }
}

async fn record_attempt(
    conn: &mut PgConnection,
    request: &SubmitQuizRequest,
) -> Result<SubmitQuizResponse, AppError> {
    let mut quiz_id =
        quizzes::resolve_submission_quiz(&mut *conn, request.quiz_id, DEFAULT_QUIZ_TITLE).await?;
    let mut stored = quizzes::load_questions(&mut *conn, quiz_id).await?;

    // Retrieval may have served a fallback quiz; grade against the quiz that
    // owns the submitted questions.
    if !covers(&stored, &request.questions) {
        let ids: Vec<i64> = request.questions.iter().map(SubmittedQuestion::stored_id).collect();
        if let Some(owner) = quizzes::quiz_containing(&mut *conn, &ids).await? {
            tracing::info!(
                "Submitted questions belong to quiz {}, not quiz {}",
                owner,
                quiz_id
            );
            quiz_id = owner;
            stored = quizzes::load_questions(&mut *conn, quiz_id).await?;
        }
    }

    let keys = answer_keys(&request.questions, &stored, quiz_id)?;
    let attempt = grade(&keys, &request.answers);

    let submission_id =
        submissions::insert_submission(&mut *conn, request.user_id, quiz_id, attempt.results.score)
            .await?;

    for answer in &attempt.answers {
        let row = NewAnswer {
            question_id: answer.question_id,
            selected_answer: answer.selected_answer,
            is_correct: answer.is_correct,
        };
        submissions::insert_answer(&mut *conn, submission_id, row)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to insert answer for question {}: {:?}",
                    answer.question_id,
                    e
                );
                AppError::from(e)
            })?;
    }

    tracing::info!(
        "Stored submission {} for quiz {}: {}/{} correct",
        submission_id,
        quiz_id,
        attempt.results.correct,
        attempt.results.total
    );

    Ok(SubmitQuizResponse {
        message: "Quiz submitted successfully",
        submission_id,
        results: attempt.results,
        details: attempt.answers,
    })
}

fn covers(stored: &[StoredQuestion], submitted: &[SubmittedQuestion]) -> bool {
    submitted
        .iter()
        .all(|q| stored.iter().any(|s| s.id == q.stored_id()))
}

/// Builds the grading keys for the submitted questions from the stored quiz.
/// Questions outside the quiz, or listed twice, are rejected.
fn answer_keys(
    submitted: &[SubmittedQuestion],
    stored: &[StoredQuestion],
    quiz_id: i64,
) -> Result<Vec<AnswerKey>, AppError> {
    let by_id: HashMap<i64, &StoredQuestion> = stored.iter().map(|q| (q.id, q)).collect();
    let mut seen = HashSet::new();

    submitted
        .iter()
        .map(|q| {
            let question_id = q.stored_id();
            let stored = by_id.get(&question_id).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Question {} does not belong to quiz {}",
                    question_id, quiz_id
                ))
            })?;

            if !seen.insert(question_id) {
                return Err(AppError::BadRequest(format!(
                    "Question {} is listed more than once",
                    question_id
                )));
            }

            Ok(AnswerKey {
                lookup_id: q.id,
                question_id,
                options: stored.option_texts(),
                answer: stored.correct_text(),
            })
        })
        .collect()
}

/// Stores a pre-graded attempt of the fixed NISM chapter-1 quiz.
pub async fn submit_nism_ch1(
    State(pool): State<PgPool>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let request = LegacySubmitRequest::from_value(&body)?;

    let mut tx = pool.begin().await?;

    match record_legacy_attempt(&mut *tx, &request).await {
        Ok(submission_id) => {
            tx.commit().await?;
            Ok(Json(json!({
                "message": "Submission saved",
                "submissionId": submission_id
            })))
        }
        Err(e) => {
            rollback(tx, "legacy submission").await;
            Err(e)
        }
    }
}

async fn record_legacy_attempt(
    conn: &mut PgConnection,
    request: &LegacySubmitRequest,
) -> Result<i64, AppError> {
    let quiz_id = match quizzes::find_by_legacy_qid(&mut *conn, NISM_CH1_LEGACY_QID).await? {
        Some(id) => id,
        None => {
            quizzes::resolve_submission_quiz(&mut *conn, NISM_CH1_LEGACY_QID, DEFAULT_QUIZ_TITLE)
                .await?
        }
    };

    let submission_id =
        submissions::insert_submission(&mut *conn, request.user_id, quiz_id, request.score).await?;

    let rows: Vec<NewAnswer> = request
        .answers
        .iter()
        .map(|a| NewAnswer {
            question_id: a.question_id,
            selected_answer: a.selected_answer,
            is_correct: a.is_correct,
        })
        .collect();

    submissions::bulk_insert_answers(&mut *conn, submission_id, &rows).await?;

    tracing::info!(
        "Stored legacy submission {} for quiz {}: score {}/{}",
        submission_id,
        quiz_id,
        request.score,
        request.total
    );

    Ok(submission_id)
}

/// Inserts a single answer row directly.
pub async fn insert_answer(
    State(pool): State<PgPool>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let request = AnswerInsertRequest::from_value(&body)?;

    let mut conn = pool.acquire().await?;

    if !quizzes::question_exists(&mut *conn, request.question_id).await? {
        return Err(AppError::NotFound(format!(
            "Question {} not found",
            request.question_id
        )));
    }

    let answer = submissions::insert_answer(
        &mut *conn,
        request.submission_id,
        NewAnswer {
            question_id: request.question_id,
            selected_answer: request.selected_answer,
            is_correct: request.is_correct,
        },
    )
    .await
    .map_err(|e| {
        tracing::error!("quiz-answers insert error: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(json!({ "success": true, "answer": answer })))
}

/// Most recent submission with its answers, for checking that writes landed.
pub async fn latest_submission(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;

    let Some(submission) = submissions::latest_submission(&mut *conn).await? else {
        return Ok(Json(LatestSubmissionResponse {
            ok: true,
            submission: None,
            answers: Vec::new(),
        }));
    };

    let answers = submissions::answers_with_questions(&mut *conn, submission.id).await?;

    Ok(Json(LatestSubmissionResponse {
        ok: true,
        submission: Some(submission),
        answers,
    }))
}

async fn rollback(tx: Transaction<'_, Postgres>, what: &str) {
    if let Err(e) = tx.rollback().await {
        tracing::error!("Failed to roll back {}: {:?}", what, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::StoredOption;

    fn stored(id: i64, options: &[&str], correct: usize) -> StoredQuestion {
        StoredQuestion {
            id,
            text: format!("Q{id}"),
            position: id as i32,
            options: options
                .iter()
                .enumerate()
                .map(|(i, t)| StoredOption {
                    text: t.to_string(),
                    position: i as i32 + 1,
                    is_correct: i == correct,
                })
                .collect(),
        }
    }

    fn submitted(id: i64, question_id: Option<i64>) -> SubmittedQuestion {
        SubmittedQuestion { id, question_id }
    }

    #[test]
    fn keys_come_from_stored_questions() {
        let quiz = [stored(1, &["X", "Y", "Z", "W"], 1)];
        let keys = answer_keys(&[submitted(1, Some(1))], &quiz, 2).unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].answer, "Y");
        assert_eq!(keys[0].options, vec!["X", "Y", "Z", "W"]);
    }

    #[test]
    fn stored_id_prefers_question_id() {
        let quiz = [stored(40, &["a", "b"], 0)];
        let keys = answer_keys(&[submitted(7, Some(40))], &quiz, 2).unwrap();
        assert_eq!(keys[0].lookup_id, 7);
        assert_eq!(keys[0].question_id, 40);
    }

    #[test]
    fn foreign_question_is_rejected() {
        let quiz = [stored(1, &["a", "b"], 0)];
        let err = answer_keys(&[submitted(99, None)], &quiz, 2).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("does not belong")));
    }

    #[test]
    fn duplicate_question_is_rejected() {
        let quiz = [stored(1, &["a", "b"], 0)];
        let err = answer_keys(&[submitted(1, None), submitted(1, Some(1))], &quiz, 2).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("more than once")));
    }

    #[test]
    fn covers_requires_every_submitted_question() {
        let quiz = [stored(1, &["a"], 0), stored(2, &["b"], 0)];
        assert!(covers(&quiz, &[submitted(1, None), submitted(9, Some(2))]));
        assert!(!covers(&quiz, &[submitted(1, None), submitted(3, None)]));
        assert!(covers(&quiz, &[]));
    }

    #[test]
    fn graded_keys_match_scenario() {
        let quiz = [stored(1, &["X", "Y", "Z", "W"], 1)];
        let request = SubmitQuizRequest::from_value(&json!({
            "questions": [{"id": 1, "questionId": 1, "answer": "Y", "options": ["X", "Y", "Z", "W"]}],
            "answers": {"1": "Y"}
        }))
        .unwrap();

        let keys = answer_keys(&request.questions, &quiz, 2).unwrap();
        let attempt = grade(&keys, &request.answers);
        assert_eq!(attempt.results.score, 1);
        assert_eq!(attempt.answers[0].selected_answer, 'B');
    }
}
