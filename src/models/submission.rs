// src/models/submission.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::{
    config::DEFAULT_QUIZ_ID,
    error::AppError,
    grading::{AttemptResults, GradedAnswer, normalize_selection},
    utils::ids::parse_id,
};

/// Represents the 'quiz_submissions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub user_id: Option<i64>,
    pub quiz_id: i64,
    pub score: i32,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'quiz_answers' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerRecord {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub selected_answers: String,
    pub is_correct: bool,
}

/// An answer joined with the text of its question.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerWithQuestion {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub selected_answers: String,
    pub is_correct: bool,
    pub question: Option<String>,
}

/// A question as listed by the client in a submission.
///
/// Clients also echo back `answer` and `options`; those are ignored; the
/// stored answer key is authoritative.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedQuestion {
    pub id: i64,
    #[serde(rename = "questionId", default)]
    pub question_id: Option<i64>,
}

impl SubmittedQuestion {
    /// Question row the answer belongs to.
    pub fn stored_id(&self) -> i64 {
        self.question_id.unwrap_or(self.id)
    }
}

/// Body of `POST /api/quiz/submit`.
#[derive(Debug, Clone)]
pub struct SubmitQuizRequest {
    pub answers: HashMap<String, Option<String>>,
    pub questions: Vec<SubmittedQuestion>,
    pub user_id: Option<i64>,
    pub quiz_id: i64,
}

impl SubmitQuizRequest {
    /// Validates the shape of a raw submission body.
    ///
    /// Runs before any database work so malformed payloads never open a transaction.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let answers = match body.get("answers") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| (k.clone(), answer_text(v)))
                .collect(),
            _ => return Err(AppError::BadRequest("Invalid answers format".to_string())),
        };

        let questions = match body.get("questions") {
            Some(list @ Value::Array(_)) => serde_json::from_value(list.clone())?,
            _ => return Err(AppError::BadRequest("Invalid questions format".to_string())),
        };

        Ok(Self {
            answers,
            questions,
            user_id: body.get("userId").and_then(parse_id),
            quiz_id: body.get("qid").and_then(parse_id).unwrap_or(DEFAULT_QUIZ_ID),
        })
    }
}

fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Loose truthiness for flags that older clients send as strings or numbers.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub message: &'static str,
    #[serde(rename = "submissionId")]
    pub submission_id: i64,
    pub results: AttemptResults,
    pub details: Vec<GradedAnswer>,
}

/// Body of `POST /api/quiz-answers`: one answer row written directly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerInsertRequest {
    pub submission_id: i64,
    pub question_id: i64,
    pub selected_answer: char,
    pub is_correct: bool,
}

impl AnswerInsertRequest {
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let ids = (
            body.get("submission_id").and_then(parse_id),
            body.get("question_id").and_then(parse_id),
        );
        let (Some(submission_id), Some(question_id)) = ids else {
            return Err(AppError::BadRequest(
                "submission_id and question_id must be integers".to_string(),
            ));
        };

        Ok(Self {
            submission_id,
            question_id,
            selected_answer: normalize_selection(
                body.get("selected_answers").and_then(Value::as_str),
            ),
            is_correct: truthy(body.get("is_correct")),
        })
    }
}

/// One answer in the fixed-quiz legacy submission.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyAnswer {
    pub question_id: i64,
    pub selected_answer: char,
    pub is_correct: bool,
}

/// Body of `POST /api/quizzes/nism/ch1/submit`. Score is client-computed.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacySubmitRequest {
    pub user_id: Option<i64>,
    pub score: i32,
    pub total: i32,
    pub answers: Vec<LegacyAnswer>,
}

impl LegacySubmitRequest {
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let invalid = || AppError::BadRequest("Invalid payload".to_string());

        let score = body.get("score").and_then(strict_i32).ok_or_else(invalid)?;
        let total = body.get("total").and_then(strict_i32).ok_or_else(invalid)?;
        let raw_answers = body.get("answers").and_then(Value::as_array).ok_or_else(invalid)?;

        let answers = raw_answers
            .iter()
            .map(|a| {
                let question_id = a.get("questionId").and_then(parse_id).ok_or_else(invalid)?;
                Ok(LegacyAnswer {
                    question_id,
                    selected_answer: normalize_selection(
                        a.get("selectedOption").and_then(Value::as_str),
                    ),
                    is_correct: truthy(a.get("isCorrect")),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Self {
            user_id: body.get("userId").and_then(parse_id),
            score,
            total,
            answers,
        })
    }
}

fn strict_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|n| i32::try_from(n).ok())
}

#[derive(Debug, Serialize)]
pub struct LatestSubmissionResponse {
    pub ok: bool,
    pub submission: Option<SubmissionRecord>,
    pub answers: Vec<AnswerWithQuestion>,
}
