use std::fmt;
use std::path::PathBuf;

use storage::CourseFile;
use storage::sample::sample_course;

#[derive(Debug, Clone)]
struct Args {
    out: Option<PathBuf>,
    check: Option<PathBuf>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
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
        let mut out = std::env::var("LEARN_COURSE_OUT").ok().map(PathBuf::from);
        let mut check = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" => out = Some(PathBuf::from(require_value(&mut args, "--out")?)),
                "--check" => check = Some(PathBuf::from(require_value(&mut args, "--check")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { out, check })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --out <path>     Write the built-in sample course as JSON (default: stdout)");
    eprintln!("  --check <path>   Validate an existing course file and report its size");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_COURSE_OUT");
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().inspect_err(|_| print_usage())?;

    if let Some(path) = args.check {
        let (lessons, exercises) = CourseFile::load(&path)?.into_domain()?;
        println!(
            "{}: {} lessons, {} exercises",
            path.display(),
            lessons.len(),
            exercises.len()
        );
        return Ok(());
    }

    let json = sample_course().to_json_pretty()?;
    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)?;
            eprintln!("wrote sample course to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
