//! Command-line entry point for the ZIP password brute-force utility.

use chrono::{DateTime, Local};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;

use std::path::PathBuf;
use std::process::exit;

use zip_pwbf::{Outcome, PasswordFile, ProgressSnapshot, SearchController, SearchSpace, ZipOracle};

/// Lowercase letters and digits, the alphabet the archive's password is
/// assumed to be drawn from unless overridden.
const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// CLI arguments supported by zip-pwbf.
struct Cli {
    /// Path to the password-protected ZIP archive
    #[arg(short = 'i', long = "input", value_name = "ZIP", required = true)]
    input: PathBuf,

    /// Ordered alphabet candidates are drawn from
    #[arg(long = "alphabet", default_value = DEFAULT_ALPHABET)]
    alphabet: String,

    /// Exact password length to brute-force
    #[arg(short = 'l', long = "length", default_value_t = 6)]
    length: usize,

    /// Number of attempts between progress reports
    #[arg(long = "interval", default_value_t = 100_000)]
    interval: u64,

    /// Number of worker threads (1 runs the sequential scan)
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,

    /// File the recovered password is written to
    #[arg(short = 'o', long = "output", default_value = "password.txt")]
    output: PathBuf,

    /// Extract the archive's contents here once the password is recovered
    #[arg(long = "extract-dir", value_name = "DIR")]
    extract_dir: Option<PathBuf>,
}

/// Exit codes: 0 found, 1 usage error, 2 exhausted, 3 archive failure.
fn main() {
    let args = Cli::parse();

    if args.threads == 0 {
        eprintln!("Error: --threads must be at least 1.");
        exit(1);
    }

    let space = match SearchSpace::new(&args.alphabet, args.length) {
        Ok(space) => space,
        Err(e) => {
            eprintln!("Error: {e}");
            exit(1);
        }
    };

    println!("Archive: {}", args.input.display());
    println!("Alphabet size: {}", space.alphabet_len());
    println!("Password length: {}", space.length());
    println!("Candidates: {}", space.total());
    println!("Threads: {}", args.threads);

    // Preflight: a missing, corrupt, empty, or unencrypted archive fails here,
    // before any candidate is tested.
    let mut oracle = match ZipOracle::open(&args.input) {
        Ok(oracle) => oracle,
        Err(e) => {
            eprintln!("Failed to open archive: {e}");
            exit(3);
        }
    };

    let progress = ProgressBar::new(space.total());
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {percent:>3}% [{wide_bar:.cyan/blue}] ({eta} remaining)",
        )
        .expect("valid progress template"),
    );

    let controller = SearchController::new(space, args.interval);
    let report = |snapshot: &ProgressSnapshot| {
        progress.set_position(snapshot.attempts);
        progress.println(snapshot.to_string());
    };

    let result = if args.threads == 1 {
        controller.run(&mut oracle, report)
    } else {
        let pool = ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build()
            .unwrap_or_else(|e| {
                eprintln!("Failed to initialize thread pool: {e}");
                exit(1);
            });
        controller.run_sharded(&pool, || ZipOracle::open(&args.input), report)
    };

    progress.finish_and_clear();

    let started: DateTime<Local> = result.started_at.into();
    println!("Started at: {}", started.format("%Y-%m-%d %H:%M:%S"));
    println!("Tried: {} passwords", result.attempts);
    println!("Total time: {:.2}s", result.elapsed.as_secs_f64());

    match &result.outcome {
        Outcome::Found { password } => {
            println!("Password found: {password}");

            let sink = PasswordFile::new(&args.output);
            match sink.persist(&result) {
                Ok(_) => println!("Password saved to {}", sink.path().display()),
                Err(e) => {
                    eprintln!("Failed to save password: {e}");
                    exit(3);
                }
            }

            if let Some(dir) = &args.extract_dir {
                match oracle.extract_to(dir, password) {
                    Ok(()) => println!("Archive extracted to {}", dir.display()),
                    Err(e) => {
                        eprintln!("Failed to extract archive: {e}");
                        exit(3);
                    }
                }
            }
        }
        Outcome::Exhausted => {
            println!("Password not found in the searched space.");
            exit(2);
        }
        Outcome::Aborted { cause } => {
            eprintln!("Archive error: {cause}");
            exit(3);
        }
    }
}
