use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use cardtable_cli::config::TableConfig;
use cardtable_cli::controller::Controller;
use cardtable_cli::logging::init_logging;
use cardtable_core::game::definition::EndPrecedence;

/// Console card table running trick-taking matches.
#[derive(Debug, Parser)]
#[command(name = "cardtable", author, version, about = "Console trick-taking card table")]
struct Cli {
    /// Path to a YAML configuration file; built-in defaults otherwise.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the RNG seed used for shuffling and automated choices.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the round limit (0 disables it).
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<u32>,

    /// Override the score limit (0 disables it).
    #[arg(long, value_name = "POINTS")]
    max_score: Option<u32>,

    /// Override the deck size (32 or 54).
    #[arg(long, value_name = "CARDS")]
    deck_size: Option<u32>,

    /// Which limit is consulted first: score_first or rounds_first.
    #[arg(long, value_name = "ORDER", value_parser = parse_precedence)]
    precedence: Option<EndPrecedence>,

    /// Let the computer play every seat.
    #[arg(long)]
    auto: bool,

    /// Write a JSON summary of the match to FILE.
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Override the log file location.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Disable the log file.
    #[arg(long)]
    no_log: bool,

    /// Exit after validating the configuration (no match is played).
    #[arg(long)]
    validate_only: bool,
}

fn parse_precedence(value: &str) -> Result<EndPrecedence, String> {
    EndPrecedence::from_name(value)
        .ok_or_else(|| format!("unknown precedence '{value}', expected score_first or rounds_first"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => TableConfig::from_path(path)?,
        None => TableConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Some(rounds) = cli.rounds {
        config.game.max_rounds = rounds;
    }

    if let Some(max_score) = cli.max_score {
        config.game.max_score = max_score;
    }

    if let Some(deck_size) = cli.deck_size {
        config.game.deck_size = deck_size;
    }

    if let Some(precedence) = cli.precedence {
        config.game.precedence = precedence;
    }

    if cli.auto {
        config.automate_all();
    }

    if let Some(log_file) = cli.log_file {
        config.logging.file = log_file;
    }

    if cli.no_log {
        config.logging.enabled = false;
    }

    config.validate()?;

    let player_count = config.players.len();
    println!(
        "Loaded game '{}' with {player_count} player{} ({} cards)",
        config.game.name,
        if player_count == 1 { "" } else { "s" },
        config.game.deck_size
    );

    let _logging_guard = init_logging(&config.logging)?;

    if cli.validate_only {
        println!("Validation-only mode: no match played.");
        return Ok(());
    }

    let mut controller = Controller::new(&config, io::stdout())?;
    let report = controller.run()?;
    println!(
        "Match over after {} round(s): {}",
        report.outcome.rounds_played, report.outcome.termination
    );
    println!("Winners: {}", report.summary.winners.join(", "));

    if let Some(path) = cli.summary.as_ref() {
        let json = report.summary.to_json().context("serialising match summary")?;
        fs::write(path, json)
            .with_context(|| format!("writing match summary to {}", path.display()))?;
        println!("Summary: {}", path.display());
    }

    Ok(())
}
