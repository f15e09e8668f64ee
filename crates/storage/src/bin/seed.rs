use std::fmt;

use chrono::{DateTime, Duration, Utc};
use storage::repository::Storage;
use storage::seed::{load_questions, seed_questions_if_empty};
use survey_core::model::{Response, ResponseSession, SessionId, SessionScore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    questions_file: Option<String>,
    sessions: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSessions { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSessions { raw } => write!(f, "invalid --sessions value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("SURVEY_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut questions_file = std::env::var("SURVEY_QUESTIONS_FILE").ok();
        let mut sessions = std::env::var("SURVEY_SEED_SESSIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(0);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--questions" => {
                    questions_file = Some(require_value(&mut args, "--questions")?);
                }
                "--sessions" => {
                    let value = require_value(&mut args, "--sessions")?;
                    sessions = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidSessions { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            questions_file,
            sessions,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --questions <file.json>   JSON array of question texts (default: built-in set)");
    eprintln!("  --sessions <n>            Number of finished demo sessions to add (default: 0)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  SURVEY_DB_URL, SURVEY_QUESTIONS_FILE, SURVEY_SEED_SESSIONS");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    let questions = load_questions(args.questions_file.as_deref().map(std::path::Path::new))?;
    let inserted = seed_questions_if_empty(storage.questions.as_ref(), &questions, now).await?;

    let questions = storage.questions.list_active_questions().await?;
    let total = u32::try_from(questions.len())?;
    for i in 0..args.sessions {
        let started_at = now - Duration::hours(i64::from(i) + 1);
        let session = ResponseSession::start(SessionId::generate(), started_at);
        storage.sessions.create_session(&session).await?;

        for (q_idx, question) in questions.iter().enumerate() {
            let answer = (q_idx + i as usize) % 3 != 0;
            let answered_at = started_at + Duration::seconds(i64::try_from(q_idx)? * 10);
            let response = Response::new(session.id(), question.id(), answer, answered_at);
            storage.responses.upsert_response(&response).await?;
        }

        let yes = storage.responses.count_yes_for_session(session.id()).await?;
        let score = SessionScore::compute(yes, total)?;
        storage
            .sessions
            .finalize_session(session.id(), &score, started_at + Duration::minutes(5))
            .await?;
    }

    println!(
        "Seeded {inserted} questions and {} demo sessions into {}",
        args.sessions, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
