// src/repositories/submissions.rs

use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::models::submission::{AnswerRecord, AnswerWithQuestion, SubmissionRecord};

/// Row shape for answer inserts.
#[derive(Debug, Clone, Copy)]
pub struct NewAnswer {
    pub question_id: i64,
    pub selected_answer: char,
    pub is_correct: bool,
}

/// Inserts a submission row and returns its id.
///
/// `user_id` is stored only when it names an existing user; an unknown id is
/// recorded as NULL rather than failing the attempt.
pub async fn insert_submission(
    conn: &mut PgConnection,
    user_id: Option<i64>,
    quiz_id: i64,
    score: i32,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quiz_submissions (user_id, quiz_id, score, submitted_at)
        VALUES ((SELECT id FROM users WHERE id = $1), $2, $3, NOW())
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .fetch_one(conn)
    .await
}

pub async fn insert_answer(
    conn: &mut PgConnection,
    submission_id: i64,
    answer: NewAnswer,
) -> Result<AnswerRecord, sqlx::Error> {
    sqlx::query_as::<_, AnswerRecord>(
        r#"
        INSERT INTO quiz_answers (submission_id, question_id, selected_answers, is_correct)
        VALUES ($1, $2, $3, $4)
        RETURNING id, submission_id, question_id, selected_answers, is_correct
        "#,
    )
    .bind(submission_id)
    .bind(answer.question_id)
    .bind(answer.selected_answer.to_string())
    .bind(answer.is_correct)
    .fetch_one(conn)
    .await
}

/// Inserts all answers of a submission with one multi-row statement.
pub async fn bulk_insert_answers(
    conn: &mut PgConnection,
    submission_id: i64,
    answers: &[NewAnswer],
) -> Result<u64, sqlx::Error> {
    if answers.is_empty() {
        return Ok(0);
    }

    let mut query_builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO quiz_answers (submission_id, question_id, selected_answers, is_correct) ",
    );
    query_builder.push_values(answers, |mut row, answer| {
        row.push_bind(submission_id)
            .push_bind(answer.question_id)
            .push_bind(answer.selected_answer.to_string())
            .push_bind(answer.is_correct);
    });

    let result = query_builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

pub async fn latest_submission(conn: &mut PgConnection) -> Result<Option<SubmissionRecord>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRecord>(
        r#"
        SELECT id, user_id, quiz_id, score, submitted_at
        FROM quiz_submissions
        ORDER BY submitted_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
}

pub async fn answers_with_questions(
    conn: &mut PgConnection,
    submission_id: i64,
) -> Result<Vec<AnswerWithQuestion>, sqlx::Error> {
    sqlx::query_as::<_, AnswerWithQuestion>(
        r#"
        SELECT
            qa.id,
            qa.submission_id,
            qa.question_id,
            qa.selected_answers,
            qa.is_correct,
            qq.question_text AS question
        FROM quiz_answers qa
        LEFT JOIN quiz_questions qq ON qq.id = qa.question_id
        WHERE qa.submission_id = $1
        ORDER BY qa.id
        "#,
    )
    .bind(submission_id)
    .fetch_all(conn)
    .await
}
