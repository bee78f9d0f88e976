//! TypingStats - check your typing skills against any text of your choice

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use typing_stats::{
    config::Config,
    menu,
    report::{ResultRecord, SessionReport},
    session::{RunOutcome, SessionController},
    terminal::{self, RawModeGuard, TerminalKeys, TerminalSink, ThemeColors},
    text::ReferenceText,
};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "typing-stats", version)]
#[command(about = "Check your typing skills against any text of your choice!")]
struct Cli {
    /// Source file of text to use for typing test
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Statistics file to append typing results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a JSON report of each run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Save the effective configuration to the config directory and exit
    #[arg(long)]
    save_config: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            log::warn!("using default config: {}", e);
            Config::default()
        }),
    };
    if let Some(output) = &cli.output {
        config.files.results_path = output.clone();
    }

    if cli.save_config {
        let path = config.save().context("failed to save config")?;
        println!("Configuration saved to {}", path.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut next = match cli.input.clone() {
        Some(path) => Some(path),
        None => select_test(&config)?,
    };

    while let Some(path) = next {
        let text = match ReferenceText::load(&path) {
            Ok(text) => text,
            Err(e) => {
                println!("Could not find, open, or read test file");
                println!("{}", e);
                Cli::command().print_help()?;
                return Ok(ExitCode::FAILURE);
            }
        };

        let outcome = type_text(&text, &config)?;
        if let Some(e) = &outcome.input_error {
            println!("Typing stopped early: {}", e);
        }
        let metrics = outcome.metrics();
        println!("{}", metrics);

        let input = path.display().to_string();
        save_results(&input, &outcome, &config.files.results_path, cli.report.as_deref());

        println!("Press any key to continue...");
        terminal::wait_for_key()?;
        next = select_test(&config)?;
    }

    println!(
        "Your results are saved in <{}>.",
        config.files.results_path.display()
    );
    println!("Hope you enjoyed testing your typing skills!");
    Ok(ExitCode::SUCCESS)
}

/// Show the startup menu; `None` means the user quit.
fn select_test(config: &Config) -> Result<Option<PathBuf>> {
    let mut stdout = io::stdout();
    terminal::clear_screen(&mut stdout)?;
    let entries = menu::discover(&config.files);
    let chosen = menu::choose(
        &entries,
        config.files.preview_chars,
        &mut io::stdin().lock(),
        &mut stdout,
    )?;
    Ok(chosen)
}

/// Run one typing test over every line of `text`.
fn type_text(text: &ReferenceText, config: &Config) -> Result<RunOutcome> {
    let mut stdout = io::stdout();
    terminal::clear_screen(&mut stdout)?;
    writeln!(stdout, "Begin typing whenever you are ready:")?;
    stdout.flush()?;

    let _raw = RawModeGuard::enable().context("failed to enable raw mode")?;
    let keys = TerminalKeys::new(config.keys.clone());
    let sink = TerminalSink::new(io::stdout(), ThemeColors::from_theme(config.ui.theme));
    let outcome = SessionController::new(keys, sink).run(text.lines());

    log::info!(
        "run finished: {} lines, aborted: {}",
        outcome.lines_completed,
        outcome.aborted
    );
    Ok(outcome)
}

/// Append the run to the history file (and the JSON report, if requested).
/// Failures are reported without ending the program.
fn save_results(input: &str, outcome: &RunOutcome, results: &Path, report: Option<&Path>) {
    if let Err(e) = ResultRecord::new(input, &outcome.metrics()).append_to(results) {
        println!("Could not save results");
        println!("{}", e);
    }

    if let Some(path) = report {
        match SessionReport::new(input, outcome).export_json(path) {
            Ok(()) => println!("Report written to {}", path.display()),
            Err(e) => println!("Could not write report: {}", e),
        }
    }
}
