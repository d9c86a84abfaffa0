use std::fs;

use assert_cmd::Command;
use cardtable_cli::config::TableConfig;
use cardtable_cli::controller::Controller;
use cardtable_core::game::serialization::MatchSummary;
use predicates::prelude::*;
use tempfile::tempdir;

fn cardtable() -> Command {
    Command::cargo_bin("cardtable").expect("binary built")
}

#[test]
fn automated_match_runs_to_completion() {
    cardtable()
        .args(["--auto", "--seed", "7", "--no-log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Match over after 2 round(s)"))
        .stdout(predicate::str::contains("Winners: you, left, partner, right"));
}

#[test]
fn summary_file_is_written() {
    let dir = tempdir().expect("temp dir");
    let summary_path = dir.path().join("summary.json");

    cardtable()
        .args(["--auto", "--seed", "11", "--no-log", "--rounds", "3", "--summary"])
        .arg(&summary_path)
        .assert()
        .success();

    let json = fs::read_to_string(&summary_path).expect("summary readable");
    let summary = MatchSummary::from_json(&json).expect("summary decodes");
    assert_eq!(summary.seed, 11);
    assert_eq!(summary.rounds_played, 3);
    assert_eq!(summary.total_of("you"), Some(300));
}

#[test]
fn config_file_and_log_file_are_honoured() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("table.yaml");
    let log_path = dir.path().join("logs").join("table.log");
    fs::write(
        &config_path,
        r#"
game:
  name: "Pairs"
  deck_size: 54
  max_rounds: 0
  max_score: 250
players:
  - name: "north"
  - name: "south"
seed: 5
logging:
  level: "debug"
"#,
    )
    .expect("write config");

    cardtable()
        .arg("--config")
        .arg(&config_path)
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded game 'Pairs' with 2 players (54 cards)"))
        .stdout(predicate::str::contains("score limit 250 reached"));

    let log = fs::read_to_string(&log_path).expect("log written");
    assert!(log.contains("match started"));
    assert!(log.contains("card played"));
}

#[test]
fn missing_limits_are_reported_in_the_log() {
    let dir = tempdir().expect("temp dir");
    let log_path = dir.path().join("cardtable.log");

    cardtable()
        .args(["--auto", "--seed", "1", "--rounds", "0", "--max-score", "0"])
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Match over after 1 round(s)"));

    let log = fs::read_to_string(&log_path).expect("log written");
    assert!(log.contains("ERROR"));
    assert!(log.contains("no end-of-match limit configured"));
}

#[test]
fn invalid_deck_size_fails_validation() {
    cardtable()
        .args(["--auto", "--no-log", "--deck-size", "40", "--validate-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("game.deck_size"));
}

#[test]
fn interactive_player_reads_stdin() {
    cardtable()
        .args(["--seed", "3", "--rounds", "1", "--no-log"])
        .write_stdin("x\n".to_string() + &"1\n".repeat(8))
        .assert()
        .success()
        .stdout(predicate::str::contains("not a valid choice"))
        .stdout(predicate::str::contains("you, choose a card to play:"));
}

#[test]
fn two_interactive_players_share_stdin() {
    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("duel.yaml");
    fs::write(
        &config_path,
        r#"
game:
  max_rounds: 1
players:
  - name: "ada"
    kind: interactive
  - name: "ben"
    kind: interactive
seed: 11
logging:
  enabled: false
"#,
    )
    .expect("write config");

    cardtable()
        .arg("--config")
        .arg(&config_path)
        .write_stdin("1\n".repeat(32))
        .assert()
        .success()
        .stdout(predicate::str::contains("ada, choose a card to play:"))
        .stdout(predicate::str::contains("ben, choose a card to play:"))
        .stdout(predicate::str::contains("Match over after 1 round(s)"));
}

#[test]
fn unreachable_score_limit_fails_validation() {
    cardtable()
        .args(["--auto", "--no-log", "--validate-only", "--rounds", "0", "--max-score", "100"])
        .assert()
        .success();

    let dir = tempdir().expect("temp dir");
    let config_path = dir.path().join("stuck.yaml");
    fs::write(
        &config_path,
        "game:\n  max_rounds: 0\n  max_score: 100\n  round_points: 0\n",
    )
    .expect("write config");

    cardtable()
        .args(["--auto", "--no-log"])
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("game.round_points"));
}

#[test]
fn controller_reports_same_summary_for_same_seed() {
    let mut config = TableConfig::default();
    config.seed = Some(99);
    config.automate_all();

    let play = || {
        let players = config.build_players(|| unreachable!());
        let mut controller =
            Controller::with_players(&config, players, Vec::<u8>::new()).expect("controller");
        controller.run().expect("session").summary
    };
    assert_eq!(play(), play());
}
