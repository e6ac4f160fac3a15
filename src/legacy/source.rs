// src/legacy/source.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;

use super::{LegacyQuiz, LegacyQuizRow};

/// Where legacy quiz rows are read from.
#[derive(Debug, Clone)]
pub enum LegacySource {
    /// JSON export: one `LegacyQuiz` document or an array of them.
    File(PathBuf),
    /// A database still holding the flat `quizes` / `quiz_content` tables.
    Database(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExportDocument {
    Many(Vec<LegacyQuiz>),
    One(LegacyQuiz),
}

/// Loads the legacy quiz `qid`, rows ordered by their legacy question id.
pub async fn load_quiz(source: &LegacySource, qid: i64) -> Result<LegacyQuiz> {
    let mut quiz = match source {
        LegacySource::File(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read legacy export: {}", path.display()))?;
            select_from_export(&raw, qid)?
        }
        LegacySource::Database(url) => load_from_database(url, qid).await?,
    };

    quiz.rows.retain(|row| row.qid == qid);
    quiz.rows.sort_by_key(|row| row.question_id);
    Ok(quiz)
}

fn select_from_export(raw: &str, qid: i64) -> Result<LegacyQuiz> {
    let document: ExportDocument =
        serde_json::from_str(raw).context("legacy export has invalid format")?;

    let quizzes = match document {
        ExportDocument::Many(list) => list,
        ExportDocument::One(quiz) => vec![quiz],
    };

    Ok(quizzes
        .into_iter()
        .find(|q| q.qid == qid)
        .unwrap_or(LegacyQuiz { qid, quiz_title: None, rows: Vec::new() }))
}

async fn load_from_database(url: &str, qid: i64) -> Result<LegacyQuiz> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .context("failed to connect to legacy database")?;

    let quiz_title = sqlx::query_scalar::<_, String>("SELECT quiz_title::TEXT FROM quizes WHERE qid = $1")
        .bind(qid)
        .fetch_optional(&pool)
        .await
        .context("failed to read legacy quiz title")?;

    let rows = sqlx::query_as::<_, LegacyQuizRow>(
        r#"
        SELECT
            question_id::BIGINT AS question_id,
            qid::BIGINT AS qid,
            question::TEXT AS question,
            COALESCE(option_a::TEXT, '') AS option_a,
            COALESCE(option_b::TEXT, '') AS option_b,
            COALESCE(option_c::TEXT, '') AS option_c,
            COALESCE(option_d::TEXT, '') AS option_d,
            COALESCE(correct_answer::TEXT, '') AS correct_answer
        FROM quiz_content
        WHERE qid = $1
        ORDER BY question_id
        "#,
    )
    .bind(qid)
    .fetch_all(&pool)
    .await
    .context("failed to read legacy quiz content")?;

    pool.close().await;

    Ok(LegacyQuiz { qid, quiz_title, rows })
}
