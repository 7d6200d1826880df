//! Integration tests for the pawpal binary.
//!
//! These tests drive interactive sessions end to end:
//! - Habit logging, completion rewards and mood changes
//! - Encouraging messages from the offline generator
//! - Shop purchases and pet customization
//! - Configuration loading

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to write a config file into a fresh temp dir
fn setup_config(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write config");
    (temp_dir, path)
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pawpal"))
}

/// Run an offline session with the given stdin script
fn play(script: &str) -> assert_cmd::assert::Assert {
    let (_temp_dir, config_path) = setup_config("");
    cli()
        .arg("play")
        .arg("--offline")
        .arg("--config")
        .arg(&config_path)
        .write_stdin(script)
        .assert()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Habit tracker with a virtual pet"));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let (_temp_dir, config_path) = setup_config("");
    cli()
        .arg("play")
        .arg("--offline")
        .arg("-v")
        .arg("--config")
        .arg(&config_path)
        .env_remove("PAWPAL_LOG")
        .env_remove("RUST_LOG")
        .write_stdin("log water 8\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("completed").not())
        .stderr(predicate::str::contains("Water Intake completed"));
}

#[test]
fn test_session_starts_sad() {
    play("quit\n")
        .success()
        .stdout(predicate::str::contains("Buddy the dog is waiting for you"))
        .stdout(predicate::str::contains("Buddy is sad (sad dog)."))
        .stdout(predicate::str::contains("Goodbye! Final streak 0, coins 100."));
}

#[test]
fn test_completing_water_rewards_and_encourages() {
    play("log water 8\nquit\n")
        .success()
        .stdout(predicate::str::contains("Water Intake: 8 / 8 glasses"))
        .stdout(predicate::str::contains("Goal reached! Streak 1, coins 110."))
        .stdout(predicate::str::contains("Buddy is idle (dog sitting)."))
        .stdout(predicate::str::contains(
            "Buddy says: \"Great start! Water Intake goal of 8 glasses reached",
        ))
        .stdout(predicate::str::contains("Goodbye! Final streak 1, coins 110."));
}

#[test]
fn test_overshooting_goal_does_not_reward_twice() {
    play("log water 8\nlog water\nlog water 3\nquit\n")
        .success()
        .stdout(predicate::str::contains("Water Intake: 12 / 8 glasses"))
        .stdout(predicate::str::contains("Goal reached!").count(1))
        .stdout(predicate::str::contains("Goodbye! Final streak 1, coins 110."));
}

#[test]
fn test_four_completions_make_pet_happy() {
    play("log water 8\nset sleep 8\nset steps 10000\nlog meals 3\nquit\n")
        .success()
        .stdout(predicate::str::contains("Buddy is energetic (dog running)."))
        .stdout(predicate::str::contains("Buddy is happy (happy dog)."))
        .stdout(predicate::str::contains("Goodbye! Final streak 4, coins 140."));
}

#[test]
fn test_set_clamps_negative_and_unreadable_values() {
    play("set sleep -5\nset steps lots\nquit\n")
        .success()
        .stdout(predicate::str::contains("Sleep: 0 / 8 hours"))
        .stdout(predicate::str::contains("Steps: 0 / 10000 steps"));
}

#[test]
fn test_log_below_zero_clamps() {
    play("log meals 1\nlog meals -4\nquit\n")
        .success()
        .stdout(predicate::str::contains("Healthy Meals: 0 / 3 meals"));
}

#[test]
fn test_unknown_habit_and_amount_are_reported() {
    play("log coffee 1\nlog water many\nquit\n")
        .success()
        .stdout(predicate::str::contains("Error: Unknown habit: coffee"))
        .stdout(predicate::str::contains("Error: Invalid amount: many"));
}

#[test]
fn test_shop_purchase_rules() {
    play("buy zombie\nbuy golden\nbuy golden\nquit\n")
        .success()
        .stdout(predicate::str::contains(
            "Error: Not enough coins: costs 150, balance is 100",
        ))
        .stdout(predicate::str::contains("Bought Golden for 50 coins. 50 coins left."))
        .stdout(predicate::str::contains("Error: Cosmetic already owned: Golden"))
        .stdout(predicate::str::contains("Goodbye! Final streak 0, coins 50."));
}

#[test]
fn test_minigame_win_celebrates() {
    play("win\nlog water 1\nquit\n")
        .success()
        .stdout(predicate::str::contains("You won the minigame! Coins: 150"))
        .stdout(predicate::str::contains("Buddy is happy (happy dog)."))
        .stdout(predicate::str::contains("Buddy is sad (sad dog)."));
}

#[test]
fn test_rename_and_change_pet() {
    play("name Rex\npet dragon\nname   \nquit\n")
        .success()
        .stdout(predicate::str::contains("Your pet is now called Rex."))
        .stdout(predicate::str::contains("Rex is sad (sad dragon)."))
        .stdout(predicate::str::contains("Error: Pet name cannot be empty"));
}

#[test]
fn test_status_json() {
    let output = play("set meals 3\nbuy bowtie\nstatus json\nquit\n")
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("stdout is UTF-8");

    let line = stdout
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("status json line");
    let status: serde_json::Value = serde_json::from_str(line).expect("valid JSON");

    assert_eq!(status["streak"], 1);
    assert_eq!(status["coins"], 90);
    assert_eq!(status["mood"], "idle");
    assert_eq!(status["pet"]["owned"][0], "bowtie");
    assert_eq!(status["habits"].as_array().unwrap().len(), 5);
    assert_eq!(status["habits"][3]["id"], "meals");
    assert_eq!(status["completions"][0]["habit"], "meals");
}

#[test]
fn test_end_of_input_ends_session() {
    play("log water 8\n")
        .success()
        .stdout(predicate::str::contains("Buddy says:"))
        .stdout(predicate::str::contains("Goodbye! Final streak 1, coins 110."));
}

#[test]
fn test_config_goals_and_coins() {
    let (_temp_dir, config_path) = setup_config(
        r#"
[session]
initial_coins = 0
pet_name = "Mochi"
pet_type = "cat"

[goals]
water = 2
"#,
    );

    cli()
        .arg("play")
        .arg("--offline")
        .arg("--config")
        .arg(&config_path)
        .write_stdin("log water 2\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mochi the cat is waiting for you"))
        .stdout(predicate::str::contains("Water Intake: 2 / 2 glasses"))
        .stdout(predicate::str::contains("Mochi is idle (cat sitting)."))
        .stdout(predicate::str::contains("Goodbye! Final streak 1, coins 10."));
}

#[test]
fn test_habits_command_lists_goals() {
    let (_temp_dir, config_path) = setup_config("[goals]\nsteps = 6000\n");

    cli()
        .arg("habits")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Water Intake"))
        .stdout(predicate::str::contains("0 / 6000 steps"))
        .stdout(predicate::str::contains("screenTime"));
}

#[test]
fn test_shop_command_lists_cosmetics() {
    let (_temp_dir, config_path) = setup_config("");

    cli()
        .arg("shop")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Coins: 100"))
        .stdout(predicate::str::contains("superhero_cape"))
        .stdout(predicate::str::is_match(r"zombie\s+Zombie\s+skin\s+150\s+locked").unwrap());
}

#[test]
fn test_invalid_config_fails() {
    let (_temp_dir, config_path) = setup_config("[goals]\nmeals = 0\n");

    cli()
        .arg("habits")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure();
}
