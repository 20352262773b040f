use std::fmt;
use std::io::Write;
use std::time::Duration;

use drill_core::model::SessionSettings;
use services::{
    Clock, NextAction, ReviewItem, SessionEvent, SessionLoopService, SessionResponse,
    SessionResult, SessionService,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_FEEDBACK_MS: u64 = 1_500;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
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

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--seed <n>] [--feedback-ms <ms>] [--levels <n>]");
    eprintln!("                      [--questions-per-level <n>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --feedback-ms {DEFAULT_FEEDBACK_MS}");
    eprintln!("  --levels 20 --questions-per-level 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DRILL_SEED, DRILL_FEEDBACK_MS, DRILL_LEVELS, DRILL_QUESTIONS_PER_LEVEL, RUST_LOG");
    eprintln!();
    eprintln!("During play, type an answer, or: review, restart, quit");
}

struct Args {
    seed: Option<u64>,
    feedback: Duration,
    levels: u32,
    questions_per_level: u32,
    json: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let defaults = SessionSettings::default();
        let mut seed = env_number("DRILL_SEED");
        let mut feedback_ms = env_number("DRILL_FEEDBACK_MS").unwrap_or(DEFAULT_FEEDBACK_MS);
        let mut levels = env_number("DRILL_LEVELS").unwrap_or(defaults.level_count());
        let mut questions_per_level = env_number("DRILL_QUESTIONS_PER_LEVEL")
            .unwrap_or(defaults.questions_per_level());
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    seed = Some(parse_number("--seed", value)?);
                }
                "--feedback-ms" => {
                    let value = require_value(args, "--feedback-ms")?;
                    feedback_ms = parse_number("--feedback-ms", value)?;
                }
                "--levels" => {
                    let value = require_value(args, "--levels")?;
                    levels = parse_number("--levels", value)?;
                }
                "--questions-per-level" => {
                    let value = require_value(args, "--questions-per-level")?;
                    questions_per_level = parse_number("--questions-per-level", value)?;
                }
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            seed,
            feedback: Duration::from_millis(feedback_ms),
            levels,
            questions_per_level,
            json,
        })
    }
}

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Answer(String),
    Review,
    Restart,
    Quit,
}

impl Input {
    fn from_line(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "review" => Self::Review,
            "restart" => Self::Restart,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Answer(line.to_string()),
        }
    }
}

fn prompt(session: &SessionService) -> std::io::Result<()> {
    let Some(question) = session.current_question() else {
        return Ok(());
    };
    let snap = session.snapshot();
    let mut out = std::io::stdout().lock();
    write!(
        out,
        "[level {} | question {}/{} | score {}] {} ",
        snap.level,
        snap.question_index,
        session.settings().questions_per_level(),
        snap.score,
        question
    )?;
    out.flush()
}

fn print_review(items: &[ReviewItem]) {
    if items.is_empty() {
        println!("No wrong answers to review!");
        return;
    }
    for item in items {
        println!(
            "  {}  your answer: {} | correct answer: {}",
            item.question_text, item.user_answer, item.correct_answer
        );
    }
}

fn print_results(session: &SessionService, result: &SessionResult) {
    println!();
    println!("Final score: {}", result.final_score);
    println!("Accuracy:    {}%", result.accuracy_percent);
    println!("Time used:   {}s", result.elapsed_seconds);
    println!();
    println!("Weak spots:");
    for entry in &session.weakness_report() {
        println!("  {entry}");
    }
    println!();
    println!("Review:");
    print_review(&session.review());
}

type InputLines = tokio::io::Lines<BufReader<tokio::io::Stdin>>;

/// What to do once the results have been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterResults {
    PlayAgain,
    ShowReview,
    Exit,
}

impl AfterResults {
    fn from_line(line: &str) -> Self {
        match Input::from_line(line) {
            Input::Restart => Self::PlayAgain,
            Input::Review => Self::ShowReview,
            Input::Quit | Input::Answer(_) => Self::Exit,
        }
    }
}

/// Runs one session until it completes, the player quits or input ends.
async fn play(
    loop_svc: &SessionLoopService,
    session: &mut SessionService,
    lines: &mut InputLines,
    feedback: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        prompt(session)?;
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        let event = match Input::from_line(&line) {
            Input::Quit => return Ok(()),
            Input::Review => {
                print_review(&session.review());
                continue;
            }
            Input::Restart => SessionEvent::Restart,
            Input::Answer(raw) => SessionEvent::SubmitAnswer(raw),
        };

        let result = match loop_svc.dispatch(session, event) {
            Ok(SessionResponse::Answered(result)) => result,
            Ok(_) => continue,
            Err(err) if err.is_recoverable() => {
                println!("{err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        println!("{}", result.feedback);
        tokio::time::sleep(feedback).await;
        match result.next {
            NextAction::NextQuestion(_) => {}
            NextAction::LevelUp { level, .. } => println!("Level {level}!"),
            NextAction::SessionComplete => return Ok(()),
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = SessionSettings::new(args.questions_per_level, args.levels, 10)?;
    let loop_svc = SessionLoopService::new(Clock::default_clock())
        .with_settings(settings)
        .with_seed(args.seed);
    let mut session = loop_svc.create_session();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop_svc.dispatch(&mut session, SessionEvent::Start)?;

    loop {
        play(&loop_svc, &mut session, &mut lines, args.feedback).await?;

        let SessionResponse::Ended(result) =
            loop_svc.dispatch(&mut session, SessionEvent::End)?
        else {
            return Ok(());
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(&session.report()?)?);
        } else {
            print_results(&session, &result);
        }

        loop {
            print!("Type restart to play again, review to see mistakes, or Enter to quit: ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            match AfterResults::from_line(&line) {
                AfterResults::ShowReview => print_review(&session.review()),
                AfterResults::Exit => return Ok(()),
                AfterResults::PlayAgain => break,
            }
        }

        loop_svc.dispatch(&mut session, SessionEvent::Restart)?;
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("services=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn parses_flags() {
        let args = parse(&["--seed", "7", "--feedback-ms", "0", "--levels", "3", "--json"]).unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.feedback, Duration::ZERO);
        assert_eq!(args.levels, 3);
        assert!(args.json);
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(matches!(
            parse(&["--seed"]),
            Err(ArgsError::MissingValue { flag: "--seed" })
        ));
        assert!(matches!(
            parse(&["--levels", "many"]),
            Err(ArgsError::InvalidNumber { flag: "--levels", .. })
        ));
        assert!(matches!(parse(&["--frobnicate"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn prompt_words_become_commands() {
        assert_eq!(Input::from_line(" Review "), Input::Review);
        assert_eq!(Input::from_line("restart"), Input::Restart);
        assert_eq!(Input::from_line("q"), Input::Quit);
        assert_eq!(Input::from_line("42"), Input::Answer("42".to_string()));
    }

    #[test]
    fn results_screen_offers_restart() {
        assert_eq!(AfterResults::from_line("restart"), AfterResults::PlayAgain);
        assert_eq!(AfterResults::from_line(" REVIEW"), AfterResults::ShowReview);
        assert_eq!(AfterResults::from_line(""), AfterResults::Exit);
        assert_eq!(AfterResults::from_line("quit"), AfterResults::Exit);
    }

    #[test]
    fn restart_after_results_starts_a_fresh_session() {
        let settings = SessionSettings::new(1, 1, 10).unwrap();
        let loop_svc = SessionLoopService::new(Clock::default_clock())
            .with_settings(settings)
            .with_seed(Some(3));
        let mut session = loop_svc.create_session();
        loop_svc.dispatch(&mut session, SessionEvent::Start).unwrap();
        loop_svc
            .dispatch(&mut session, SessionEvent::SubmitAnswer("-1".into()))
            .unwrap();
        loop_svc.dispatch(&mut session, SessionEvent::End).unwrap();
        assert!(session.is_complete());

        loop_svc.dispatch(&mut session, SessionEvent::Restart).unwrap();
        assert!(!session.is_complete());
        assert!(session.wrong_answers().is_empty());
        assert!(session.current_question().is_some());
    }
}
