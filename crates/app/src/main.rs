mod terminal;

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use learn_core::model::{Answer, LearnerProfile, LessonId, SubscriptionTier};
use services::{
    AdapterError, Clock, ExerciseHandler, LessonEngine, LessonLoopService, LessonStep,
};
use storage::repository::{InMemoryRepository, Storage};
use storage::CourseFile;
use storage::sample::sample_course;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLessonId { raw: String },
    InvalidHearts { raw: String },
    InvalidTier { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLessonId { raw } => write!(f, "invalid --lesson-id value: {raw}"),
            ArgsError::InvalidHearts { raw } => write!(f, "invalid --hearts value: {raw}"),
            ArgsError::InvalidTier { raw } => write!(f, "invalid --tier value: {raw}"),
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

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    lesson_id: LessonId,
    max_hearts: Option<u32>,
    tier: SubscriptionTier,
    course: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--lesson-id <id>] [--hearts <n>] [--tier <tier>]");
    eprintln!("                      [--course <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --lesson-id 1");
    eprintln!("  --hearts    the learner's current hearts");
    eprintln!("  --tier      free (free|super|max)");
    eprintln!("  --course    built-in sample course");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_LESSON_ID, LEARN_MAX_HEARTS, LEARN_TIER, LEARN_COURSE, RUST_LOG");
}

fn parse_lesson_id(raw: String) -> Result<LessonId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidLessonId { raw })
}

fn parse_hearts(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidHearts { raw })
}

fn parse_tier(raw: String) -> Result<SubscriptionTier, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidTier { raw })
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut lesson_id = env("LEARN_LESSON_ID")
            .map(parse_lesson_id)
            .transpose()?
            .unwrap_or(LessonId::new(1));
        let mut max_hearts = env("LEARN_MAX_HEARTS").map(parse_hearts).transpose()?;
        let mut tier = env("LEARN_TIER").map(parse_tier).transpose()?.unwrap_or_default();
        let mut course = env("LEARN_COURSE").map(PathBuf::from);

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--lesson-id" => {
                    lesson_id = parse_lesson_id(require_value(&mut args, "--lesson-id")?)?;
                }
                "--hearts" => {
                    max_hearts = Some(parse_hearts(require_value(&mut args, "--hearts")?)?);
                }
                "--tier" => tier = parse_tier(require_value(&mut args, "--tier")?)?,
                "--course" => {
                    course = Some(PathBuf::from(require_value(&mut args, "--course")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            lesson_id,
            max_hearts,
            tier,
            course,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Read one line. `None` on end of input.
fn read_line(input: &mut impl BufRead) -> std::io::Result<Option<String>> {
    print!("> ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

async fn play(
    loop_svc: &LessonLoopService,
    engine: &mut LessonEngine,
    input: &mut impl BufRead,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let Some(exercise) = engine.current_exercise().cloned() else {
            return Ok(());
        };
        let handler = ExerciseHandler::for_exercise(&exercise);
        let progress = engine.progress();
        println!();
        println!(
            "Exercise {}/{}  hearts: {}",
            progress.position, progress.total, progress.hearts_remaining
        );
        print_lines(&terminal::render(&exercise, &handler.present(&exercise)));

        let answer = loop {
            let Some(line) = read_line(input)? else {
                loop_svc.quit(engine);
                return Ok(());
            };
            if line.trim() == terminal::QUIT {
                loop_svc.quit(engine);
                println!("Lesson abandoned.");
                return Ok(());
            }
            let Some(gesture) = terminal::parse_gesture(handler, &line) else {
                println!("Could not read that answer, try again.");
                continue;
            };
            match handler.answer(&exercise, gesture) {
                Ok(answer) => break answer,
                Err(AdapterError::Unsupported(_)) => {
                    break Answer::scalar(line.trim());
                }
                Err(err) => println!("{err}"),
            }
        };

        let result = loop_svc.answer(engine, answer).await?;
        print_lines(&terminal::render_verdict(&result.verdict, &exercise));

        match loop_svc.advance(engine).await? {
            LessonStep::Next => {}
            LessonStep::Finished(outcome) => {
                println!();
                if outcome.ended_early {
                    println!("Out of hearts. Refill to keep learning.");
                } else {
                    print_lines(&terminal::render_summary(&outcome.summary));
                }
                if let Some(rewards) = outcome.rewards {
                    println!("  +{} XP, +{} gems", rewards.xp, rewards.gems);
                }
                return Ok(());
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .inspect_err(|_| print_usage())?;
    init_tracing();

    let repo = InMemoryRepository::with_profile(LearnerProfile::new().with_tier(args.tier));
    let course = match &args.course {
        Some(path) => CourseFile::load(path)?,
        None => sample_course(),
    };
    let imported = course.import_into(&repo).await?;
    tracing::info!(lessons = imported, "course loaded");

    let storage = Storage::from_repository(repo);
    let loop_svc = LessonLoopService::new(
        Clock::system(),
        Arc::clone(&storage.catalog),
        Arc::clone(&storage.profiles),
    )
    .with_max_hearts(args.max_hearts);
    let mut engine = loop_svc.engine();
    loop_svc.start_lesson(&mut engine, args.lesson_id).await?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    play(&loop_svc, &mut engine, &mut input).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let parsed = Args::parse(Vec::new(), |_| None).unwrap();
        assert_eq!(parsed.lesson_id, LessonId::new(1));
        assert_eq!(parsed.max_hearts, None);
        assert_eq!(parsed.tier, SubscriptionTier::Free);
        assert_eq!(parsed.course, None);
    }

    #[test]
    fn flags_override_env() {
        let parsed = Args::parse(args(&["--lesson-id", "3", "--tier", "max"]), |key| {
            match key {
                "LEARN_LESSON_ID" => Some("2".into()),
                "LEARN_MAX_HEARTS" => Some("4".into()),
                _ => None,
            }
        })
        .unwrap();
        assert_eq!(parsed.lesson_id, LessonId::new(3));
        assert_eq!(parsed.max_hearts, Some(4));
        assert_eq!(parsed.tier, SubscriptionTier::Max);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Args::parse(args(&["--hearts", "lots"]), |_| None),
            Err(ArgsError::InvalidHearts { .. })
        ));
        assert!(matches!(
            Args::parse(args(&["--lesson-id"]), |_| None),
            Err(ArgsError::MissingValue { flag: "--lesson-id" })
        ));
        assert!(matches!(
            Args::parse(args(&["--wat"]), |_| None),
            Err(ArgsError::UnknownArg(_))
        ));
    }
}
