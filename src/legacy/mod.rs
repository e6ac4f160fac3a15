// src/legacy/mod.rs

//! Flat, four-option quiz records from the legacy schema and their one-shot
//! import into the normalized quiz tables.
//!
//! The flat layout is only ever read here; no request handler queries it.

pub mod import;
pub mod source;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One question row of a legacy flat quiz.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct LegacyQuizRow {
    pub question_id: i64,
    pub qid: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
}

/// A legacy quiz together with its question rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyQuiz {
    pub qid: i64,
    #[serde(default)]
    pub quiz_title: Option<String>,
    #[serde(default)]
    pub rows: Vec<LegacyQuizRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOption {
    pub text: String,
    pub position: i32,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuestion {
    pub text: String,
    pub position: i32,
    pub options: [PlannedOption; 4],
}

/// Maps a legacy correct-answer letter to an option position (1-4).
/// Matching ignores case and surrounding whitespace; unknown letters map to 1.
pub fn correct_position(letter: &str) -> i32 {
    match letter.trim().to_ascii_uppercase().as_str() {
        "A" => 1,
        "B" => 2,
        "C" => 3,
        "D" => 4,
        _ => 1,
    }
}

/// Turns legacy rows into normalized questions, keeping row order.
pub fn plan_import(rows: &[LegacyQuizRow]) -> Vec<PlannedQuestion> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let correct = correct_position(&row.correct_answer);
            let option = |text: &str, position: i32| PlannedOption {
                text: text.to_string(),
                position,
                is_correct: position == correct,
            };

            PlannedQuestion {
                text: row.question.clone(),
                position: idx as i32 + 1,
                options: [
                    option(&row.option_a, 1),
                    option(&row.option_b, 2),
                    option(&row.option_c, 3),
                    option(&row.option_d, 4),
                ],
            }
        })
        .collect()
}
