// src/grading.rs

//! Scoring of quiz attempts.
//!
//! Everything here is pure: handlers load the answer keys, call [`grade`],
//! and persist the result inside their own transaction.

use std::collections::HashMap;

use serde::Serialize;

/// Selection code stored for a question the user left blank.
pub const UNANSWERED: char = 'N';

const VALID_CODES: [char; 5] = ['A', 'B', 'C', 'D', UNANSWERED];

/// What the grader needs to know about one question of an attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerKey {
    /// Key the client's answer map is indexed by.
    pub lookup_id: i64,
    /// Question row the answer is recorded against.
    pub question_id: i64,
    pub options: Vec<String>,
    /// Text of the correct option.
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_id: i64,
    pub is_correct: bool,
    pub selected_answer: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttemptResults {
    pub total: usize,
    pub attempted: usize,
    pub correct: usize,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradedAttempt {
    pub results: AttemptResults,
    pub answers: Vec<GradedAnswer>,
}

/// Letter code for the selected option text: `A` for the first option
/// through `D` for the fourth. Text that is not among the first four
/// options yields [`UNANSWERED`].
pub fn selection_code(options: &[String], selected: &str) -> char {
    options
        .iter()
        .position(|opt| opt == selected)
        .and_then(|idx| u8::try_from(idx).ok())
        .filter(|idx| *idx < 4)
        .map(|idx| char::from(b'A' + idx))
        .unwrap_or(UNANSWERED)
}

/// Normalizes a raw selection into one of `A B C D N`.
///
/// The first character of the trimmed, upper-cased input wins; blank or
/// unknown input is treated as unanswered.
pub fn normalize_selection(raw: Option<&str>) -> char {
    raw.map(str::trim)
        .and_then(|s| s.chars().next())
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| VALID_CODES.contains(c))
        .unwrap_or(UNANSWERED)
}

/// Grades an attempt.
///
/// Every key produces one answer row, answered or not. A non-empty answer
/// counts as attempted and is correct when it equals the key's answer text.
pub fn grade(keys: &[AnswerKey], answers: &HashMap<String, Option<String>>) -> GradedAttempt {
    let mut attempted = 0;
    let mut correct = 0;
    let mut graded = Vec::with_capacity(keys.len());

    for key in keys {
        let user_answer = answers
            .get(&key.lookup_id.to_string())
            .and_then(|a| a.as_deref())
            .filter(|a| !a.is_empty());

        let (is_correct, selected_answer) = match user_answer {
            Some(selected) => {
                attempted += 1;
                let is_correct = selected == key.answer;
                if is_correct {
                    correct += 1;
                }
                (is_correct, selection_code(&key.options, selected))
            }
            None => (false, UNANSWERED),
        };

        graded.push(GradedAnswer {
            question_id: key.question_id,
            is_correct,
            selected_answer,
        });
    }

    GradedAttempt {
        results: AttemptResults {
            total: keys.len(),
            attempted,
            correct,
            score: i32::try_from(correct).unwrap_or(i32::MAX),
        },
        answers: graded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: i64, options: &[&str], answer: &str) -> AnswerKey {
        AnswerKey {
            lookup_id: id,
            question_id: id,
            options: options.iter().map(|s| s.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    fn answers(pairs: &[(i64, &str)]) -> HashMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(id, a)| (id.to_string(), Some(a.to_string())))
            .collect()
    }

    #[test]
    fn correct_answer_is_scored_with_its_letter() {
        let keys = [key(1, &["X", "Y", "Z", "W"], "Y")];
        let attempt = grade(&keys, &answers(&[(1, "Y")]));

        assert_eq!(
            attempt.results,
            AttemptResults { total: 1, attempted: 1, correct: 1, score: 1 }
        );
        assert_eq!(
            attempt.answers,
            vec![GradedAnswer { question_id: 1, is_correct: true, selected_answer: 'B' }]
        );
    }

    #[test]
    fn unanswered_question_records_n() {
        let keys = [key(1, &["X", "Y", "Z", "W"], "Y")];
        let attempt = grade(&keys, &HashMap::new());

        assert_eq!(
            attempt.results,
            AttemptResults { total: 1, attempted: 0, correct: 0, score: 0 }
        );
        assert_eq!(attempt.answers[0].selected_answer, 'N');
        assert!(!attempt.answers[0].is_correct);
    }

    #[test]
    fn null_and_empty_answers_count_as_unanswered() {
        let keys = [key(1, &["X", "Y"], "X"), key(2, &["X", "Y"], "Y")];
        let mut map = HashMap::new();
        map.insert("1".to_string(), None);
        map.insert("2".to_string(), Some(String::new()));

        let attempt = grade(&keys, &map);
        assert_eq!(attempt.results.attempted, 0);
        assert!(attempt.answers.iter().all(|a| a.selected_answer == 'N'));
    }

    #[test]
    fn wrong_answer_keeps_its_letter() {
        let keys = [key(5, &["X", "Y", "Z", "W"], "Y")];
        let attempt = grade(&keys, &answers(&[(5, "W")]));

        assert_eq!(attempt.results.attempted, 1);
        assert_eq!(attempt.results.correct, 0);
        assert_eq!(attempt.answers[0].selected_answer, 'D');
        assert!(!attempt.answers[0].is_correct);
    }

    #[test]
    fn text_outside_the_options_is_attempted_but_coded_n() {
        let keys = [key(1, &["X", "Y"], "X")];
        let attempt = grade(&keys, &answers(&[(1, "Q")]));

        assert_eq!(attempt.results.attempted, 1);
        assert_eq!(attempt.answers[0].selected_answer, 'N');
    }

    #[test]
    fn score_equals_correct_count() {
        let keys = [
            key(1, &["a", "b", "c", "d"], "a"),
            key(2, &["a", "b", "c", "d"], "b"),
            key(3, &["a", "b", "c", "d"], "c"),
            key(4, &["a", "b", "c", "d"], "d"),
        ];
        let attempt = grade(&keys, &answers(&[(1, "a"), (2, "c"), (3, "c")]));

        let flagged = attempt.answers.iter().filter(|a| a.is_correct).count();
        let attempted = attempt.answers.iter().filter(|a| a.selected_answer != 'N').count();
        assert_eq!(attempt.results.correct, 2);
        assert_eq!(attempt.results.score as usize, flagged);
        assert_eq!(attempt.results.attempted, attempted);
        assert_eq!(attempt.results.total, 4);
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let keys = [key(1, &["a", "b"], "a")];
        let attempt = grade(&keys, &answers(&[(99, "a")]));
        assert_eq!(attempt.results.attempted, 0);
        assert_eq!(attempt.answers.len(), 1);
    }

    #[test]
    fn fifth_option_has_no_letter() {
        let options: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        assert_eq!(selection_code(&options, "d"), 'D');
        assert_eq!(selection_code(&options, "e"), 'N');
    }

    #[test]
    fn normalize_selection_cases() {
        assert_eq!(normalize_selection(Some(" b ")), 'B');
        assert_eq!(normalize_selection(Some("Dog")), 'D');
        assert_eq!(normalize_selection(Some("z")), 'N');
        assert_eq!(normalize_selection(Some("")), 'N');
        assert_eq!(normalize_selection(None), 'N');
    }
}
