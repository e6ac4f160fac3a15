// src/repositories/quizzes.rs

use sqlx::PgConnection;

use crate::models::quiz::{QuestionOptionRow, StoredQuestion, group_question_rows};

pub async fn quiz_exists(conn: &mut PgConnection, quiz_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM quizzes WHERE id = $1)")
        .bind(quiz_id)
        .fetch_one(conn)
        .await
}

pub async fn first_quiz_id(conn: &mut PgConnection) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes ORDER BY id LIMIT 1")
        .fetch_optional(conn)
        .await
}

pub async fn find_title(conn: &mut PgConnection, quiz_id: i64) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT title FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_legacy_qid(
    conn: &mut PgConnection,
    legacy_qid: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes WHERE legacy_qid = $1")
        .bind(legacy_qid)
        .fetch_optional(conn)
        .await
}

/// Lowest-id quiz whose title contains any of the given substrings.
pub async fn find_by_title_patterns(
    conn: &mut PgConnection,
    patterns: &[&str],
) -> Result<Option<i64>, sqlx::Error> {
    let likes: Vec<String> = patterns.iter().map(|p| format!("%{p}%")).collect();
    sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes WHERE title LIKE ANY($1) ORDER BY id LIMIT 1")
        .bind(likes)
        .fetch_optional(conn)
        .await
}

/// Creates the quiz with an explicit id if it is missing.
///
/// The id sequence is moved past the highest id afterwards so later
/// generated ids cannot collide with the explicit one.
pub async fn ensure_quiz(
    conn: &mut PgConnection,
    quiz_id: i64,
    title: &str,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query("INSERT INTO quizzes (id, title) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
        .bind(quiz_id)
        .bind(title)
        .execute(&mut *conn)
        .await?
        .rows_affected()
        > 0;

    if inserted {
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('quizzes', 'id'), (SELECT MAX(id) FROM quizzes))",
        )
        .execute(&mut *conn)
        .await?;
    }

    Ok(inserted)
}

/// Picks the quiz a submission is recorded against.
///
/// The requested quiz if it exists, else the first quiz, else a stub quiz
/// created under the requested id.
pub async fn resolve_submission_quiz(
    conn: &mut PgConnection,
    requested: i64,
    stub_title: &str,
) -> Result<i64, sqlx::Error> {
    if quiz_exists(&mut *conn, requested).await? {
        return Ok(requested);
    }

    if let Some(first) = first_quiz_id(&mut *conn).await? {
        return Ok(first);
    }

    tracing::warn!("No quizzes exist; creating stub quiz {}", requested);
    ensure_quiz(&mut *conn, requested, stub_title).await?;
    Ok(requested)
}

/// Loads the ordered questions of a quiz with their ordered options.
pub async fn load_questions(
    conn: &mut PgConnection,
    quiz_id: i64,
) -> Result<Vec<StoredQuestion>, sqlx::Error> {
    let rows = sqlx::query_as::<_, QuestionOptionRow>(
        r#"
        SELECT
            qq.id AS question_id,
            qq.question_text,
            qq.position AS question_position,
            qo.option_text,
            qo.position AS option_position,
            qo.is_correct
        FROM quiz_questions qq
        LEFT JOIN quiz_options qo ON qo.question_id = qq.id
        WHERE qq.quiz_id = $1
        ORDER BY qq.position, qq.id, qo.position, qo.id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(conn)
    .await?;

    Ok(group_question_rows(rows))
}

/// Questions to serve for a requested quiz.
///
/// The requested quiz when it has questions, else the lowest quiz that does.
/// Returns the served quiz id with its questions, or `None` when no quiz has any.
pub async fn load_served_quiz(
    conn: &mut PgConnection,
    requested: i64,
) -> Result<Option<(i64, Vec<StoredQuestion>)>, sqlx::Error> {
    let questions = load_questions(&mut *conn, requested).await?;
    if !questions.is_empty() {
        return Ok(Some((requested, questions)));
    }

    let Some(fallback) = lowest_quiz_with_questions(&mut *conn).await? else {
        return Ok(None);
    };

    tracing::info!("Quiz {} has no questions; serving quiz {}", requested, fallback);
    let questions = load_questions(&mut *conn, fallback).await?;
    Ok(Some((fallback, questions)))
}

/// The single quiz that owns every one of the given questions, if there is one.
pub async fn quiz_containing(
    conn: &mut PgConnection,
    question_ids: &[i64],
) -> Result<Option<i64>, sqlx::Error> {
    let mut ids = question_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(None);
    }

    let owner = sqlx::query_scalar::<_, Option<i64>>(
        r#"
        SELECT MIN(quiz_id)
        FROM quiz_questions
        WHERE id = ANY($1)
        HAVING COUNT(DISTINCT quiz_id) = 1 AND COUNT(*) = $2
        "#,
    )
    .bind(&ids)
    .bind(ids.len() as i64)
    .fetch_optional(conn)
    .await?;

    Ok(owner.flatten())
}

pub async fn question_exists(conn: &mut PgConnection, question_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM quiz_questions WHERE id = $1)")
        .bind(question_id)
        .fetch_one(conn)
        .await
}

pub async fn lowest_quiz_with_questions(conn: &mut PgConnection) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i64>>("SELECT MIN(quiz_id) FROM quiz_questions")
        .fetch_one(conn)
        .await
}

/// Number of recorded answers pointing at questions of the quiz.
pub async fn count_answers_for_quiz(conn: &mut PgConnection, quiz_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM quiz_answers qa
        JOIN quiz_questions qq ON qq.id = qa.question_id
        WHERE qq.quiz_id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_one(conn)
    .await
}

/// Removes every question of the quiz, options first.
/// Returns the number of questions deleted.
pub async fn delete_questions(conn: &mut PgConnection, quiz_id: i64) -> Result<u64, sqlx::Error> {
    let question_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM quiz_questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_all(&mut *conn)
            .await?;

    if question_ids.is_empty() {
        return Ok(0);
    }

    sqlx::query("DELETE FROM quiz_options WHERE question_id = ANY($1)")
        .bind(&question_ids)
        .execute(&mut *conn)
        .await?;

    let deleted = sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(deleted)
}

pub async fn insert_question(
    conn: &mut PgConnection,
    quiz_id: i64,
    text: &str,
    position: i32,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO quiz_questions (quiz_id, question_text, position) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(quiz_id)
    .bind(text)
    .bind(position)
    .fetch_one(conn)
    .await
}

pub async fn insert_option(
    conn: &mut PgConnection,
    question_id: i64,
    text: &str,
    position: i32,
    is_correct: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quiz_options (question_id, option_text, position, is_correct) VALUES ($1, $2, $3, $4)",
    )
    .bind(question_id)
    .bind(text)
    .bind(position)
    .bind(is_correct)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn set_title(conn: &mut PgConnection, quiz_id: i64, title: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE quizzes SET title = $1 WHERE id = $2")
        .bind(title)
        .bind(quiz_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Records that `quiz_id` is the import of legacy quiz `legacy_qid`.
/// Any previous owner of the mapping loses it.
pub async fn assign_legacy_qid(
    conn: &mut PgConnection,
    quiz_id: i64,
    legacy_qid: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE quizzes SET legacy_qid = NULL WHERE legacy_qid = $1 AND id <> $2")
        .bind(legacy_qid)
        .bind(quiz_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("UPDATE quizzes SET legacy_qid = $1 WHERE id = $2")
        .bind(legacy_qid)
        .bind(quiz_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn count_options_for_quiz(conn: &mut PgConnection, quiz_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM quiz_options WHERE question_id IN (SELECT id FROM quiz_questions WHERE quiz_id = $1)",
    )
    .bind(quiz_id)
    .fetch_one(conn)
    .await
}

pub async fn count_questions_for_quiz(conn: &mut PgConnection, quiz_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quiz_questions WHERE quiz_id = $1")
        .bind(quiz_id)
        .fetch_one(conn)
        .await
}
