// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the questions ⟕ options join, ordered by question then option position.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionOptionRow {
    pub question_id: i64,
    pub question_text: String,
    pub question_position: i32,
    pub option_text: Option<String>,
    pub option_position: Option<i32>,
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredOption {
    pub text: String,
    pub position: i32,
    pub is_correct: bool,
}

/// A normalized question with its options in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredQuestion {
    pub id: i64,
    pub text: String,
    pub position: i32,
    pub options: Vec<StoredOption>,
}

impl StoredQuestion {
    /// Zero-based index of the correct option.
    /// Questions without a flagged option fall back to the first one.
    pub fn correct_index(&self) -> usize {
        self.options.iter().position(|o| o.is_correct).unwrap_or(0)
    }

    /// Text of the correct option, or an empty string when there are no options.
    pub fn correct_text(&self) -> String {
        self.options
            .get(self.correct_index())
            .map(|o| o.text.clone())
            .unwrap_or_default()
    }

    pub fn correct_letter(&self) -> char {
        char::from(b'A' + (self.correct_index().min(25) as u8))
    }

    pub fn option_texts(&self) -> Vec<String> {
        self.options.iter().map(|o| o.text.clone()).collect()
    }

    fn option_text_at(&self, idx: usize) -> Option<String> {
        self.options.get(idx).map(|o| o.text.clone())
    }
}

/// Folds the flat join rows into questions. Input must be ordered by question.
pub fn group_question_rows(rows: Vec<QuestionOptionRow>) -> Vec<StoredQuestion> {
    let mut questions: Vec<StoredQuestion> = Vec::new();

    for row in rows {
        let needs_new = questions.last().is_none_or(|q| q.id != row.question_id);
        if needs_new {
            questions.push(StoredQuestion {
                id: row.question_id,
                text: row.question_text,
                position: row.question_position,
                options: Vec::new(),
            });
        }

        if let (Some(text), Some(position), Some(question)) =
            (row.option_text, row.option_position, questions.last_mut())
        {
            question.options.push(StoredOption {
                text,
                position,
                is_correct: row.is_correct.unwrap_or(false),
            });
        }
    }

    questions
}

/// Question payload used to render a quiz.
#[derive(Debug, Clone, Serialize)]
pub struct QuizQuestionView {
    pub id: i64,
    #[serde(rename = "questionId")]
    pub question_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    /// Quiz actually served, which differs from the requested one after a fallback.
    pub qid: i64,
    pub quiz_title: Option<String>,
}

impl QuizQuestionView {
    pub fn from_stored(question: &StoredQuestion, quiz_id: i64, quiz_title: Option<&str>) -> Self {
        Self {
            id: question.id,
            question_id: question.id,
            question: question.text.clone(),
            options: question.option_texts(),
            answer: question.correct_text(),
            qid: quiz_id,
            quiz_title: quiz_title.map(str::to_string),
        }
    }
}

/// A question flattened into the four-option legacy layout.
#[derive(Debug, Clone, Serialize)]
pub struct QuizContentRow {
    pub question_id: i64,
    pub qid: i64,
    pub question: String,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_answer: String,
}

impl QuizContentRow {
    pub fn from_stored(quiz_id: i64, question: &StoredQuestion) -> Self {
        Self {
            question_id: question.id,
            qid: quiz_id,
            question: question.text.clone(),
            option_a: question.option_text_at(0),
            option_b: question.option_text_at(1),
            option_c: question.option_text_at(2),
            option_d: question.option_text_at(3),
            correct_answer: question.correct_letter().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizContentResponse {
    pub qid: i64,
    pub quiz_title: Option<String>,
    pub questions: Vec<QuizContentRow>,
}

/// `?qid=` query parameter, kept raw so unparsable values can be handled per endpoint.
#[derive(Debug, Deserialize)]
pub struct QuizIdParams {
    pub qid: Option<String>,
}
