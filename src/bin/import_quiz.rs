//! One-shot import of a legacy flat quiz into the normalized quiz tables.
//!
//! Usage:
//!   import_quiz (--file <export.json> | --legacy-url <postgres-url>)
//!               [--source-qid <n>] [--target-quiz <n>] [--title <text>]
//!
//! Not idempotent: every run replaces the target quiz's questions.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use lms_backend::{
    config::DEFAULT_QUIZ_ID,
    legacy::{
        import::{ImportOptions, import_quiz, verify_import},
        source::{LegacySource, load_quiz},
    },
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    source: LegacySource,
    source_qid: i64,
    options: ImportOptions,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let quiz = load_quiz(&args.source, args.source_qid).await?;
    tracing::info!(
        "Loaded {} rows for legacy quiz {} ({})",
        quiz.rows.len(),
        quiz.qid,
        quiz.quiz_title.as_deref().unwrap_or("untitled")
    );

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .context("failed to connect to database")?;

    let summary = import_quiz(&pool, &quiz, &args.options).await?;

    let (questions, options, title) = verify_import(&pool, summary.target_quiz_id).await?;
    tracing::info!("Questions stored: {}", questions);
    tracing::info!("Options stored: {}", options);
    tracing::info!("Quiz title: {}", title.unwrap_or_default());

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut source = None;
    let mut source_qid = DEFAULT_QUIZ_ID;
    let mut options = ImportOptions::default();
    let mut patterns = Vec::new();

    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| anyhow!("{arg} missing value"));
        match arg.as_str() {
            "--file" => source = Some(LegacySource::File(PathBuf::from(value()?))),
            "--legacy-url" => source = Some(LegacySource::Database(value()?)),
            "--source-qid" => source_qid = value()?.parse().context("--source-qid must be an integer")?,
            "--target-quiz" => {
                options.target_quiz_id =
                    Some(value()?.parse().context("--target-quiz must be an integer")?)
            }
            "--title" => options.title = value()?,
            "--title-pattern" => patterns.push(value()?),
            "--fallback-quiz" => {
                options.fallback_quiz_id =
                    value()?.parse().context("--fallback-quiz must be an integer")?
            }
            _ => return Err(anyhow!("Unknown argument: {arg}")),
        }
    }

    let source = source.ok_or_else(|| anyhow!("one of --file or --legacy-url is required"))?;
    if !patterns.is_empty() {
        options.title_patterns = patterns;
    }
    Ok(Args { source, source_qid, options })
}
