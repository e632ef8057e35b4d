//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BUILTIN_BANK: &str = "../selfquiz-core/data/core-cs.toml";

const CUSTOM_BANK: &str = r#"
[bank]
id = "custom"
name = "Custom Bank"

[[questions]]
id = "cn-42"
subject = "cn"
topic = "DNS"
prompt = "What does DNS do?"
ideal_answer = "DNS resolves domain names to IP addresses using a hierarchy of name servers."
keywords = ["domain names", "IP addresses", "name servers"]
"#;

/// A `selfquiz` command isolated from the developer's own config.
fn selfquiz(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("selfquiz").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("SELFQUIZ_GRADING_DELAY_MS")
        .env_remove("SELFQUIZ_DEFAULT_SUBJECT")
        .env_remove("RUST_LOG");
    cmd
}

fn builtin_bank_path() -> std::path::PathBuf {
    std::fs::canonicalize(BUILTIN_BANK).unwrap()
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("practice"))
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("selfquiz"));
}

#[test]
fn list_builtin_questions() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("os-1"))
        .stdout(predicate::str::contains("dsa-3"))
        .stdout(predicate::str::contains("9 question(s)"));
}

#[test]
fn list_filters_by_subject() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["list", "--subject", "dsa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dsa-1"))
        .stdout(predicate::str::contains("os-1").not())
        .stdout(predicate::str::contains("3 question(s)"));
}

#[test]
fn list_rejects_unknown_subject() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["list", "--subject", "physics"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown subject: physics"));
}

#[test]
fn evaluate_text_output() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args([
            "evaluate",
            "--question",
            "os-1",
            "--answer",
            "A semaphore is a synchronization primitive.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: "))
        .stdout(predicate::str::contains("Concepts covered:"))
        .stdout(predicate::str::contains("  - synchronization"))
        .stdout(predicate::str::contains("Focus on including concepts like:"));
}

#[test]
fn evaluate_json_output() {
    let home = TempDir::new().unwrap();
    let output = selfquiz(&home)
        .args([
            "evaluate",
            "--question",
            "os-1",
            "--format",
            "json",
            "--answer",
            "A semaphore is a synchronization primitive.",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["question_id"], "os-1");
    assert_eq!(value["subject"], "os");
    let matched = value["result"]["matched_keywords"].as_array().unwrap();
    assert!(matched.iter().any(|k| k == "synchronization"));
    assert!(value["result"]["percentage"].as_u64().unwrap() < 90);
}

#[test]
fn evaluate_markdown_output() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args([
            "evaluate",
            "--question",
            "dsa-1",
            "--format",
            "markdown",
            "--answer",
            "no idea",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("## dsa-1"))
        .stdout(predicate::str::contains("### Concepts missing"));
}

#[test]
fn evaluate_reads_answer_from_stdin() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["evaluate", "--question", "os-1"])
        .write_stdin("I am not really sure what to write here, sorry")
        .assert()
        .success()
        .stdout(predicate::str::contains("No key concepts identified"))
        .stdout(predicate::str::contains("Your answer needs improvement."));
}

#[test]
fn evaluate_reads_answer_file() {
    let home = TempDir::new().unwrap();
    let answer = home.path().join("answer.txt");
    std::fs::write(&answer, "DNS maps domain names to IP addresses.").unwrap();
    let bank = home.path().join("custom.toml");
    std::fs::write(&bank, CUSTOM_BANK).unwrap();

    selfquiz(&home)
        .args(["evaluate", "--question", "cn-42", "--answer-file"])
        .arg(&answer)
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("  - domain names"))
        .stdout(predicate::str::contains("  - name servers"));
}

#[test]
fn evaluate_rejects_empty_answer() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["evaluate", "--question", "os-1", "--answer", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please enter an answer before submitting.",
        ));
}

#[test]
fn evaluate_unknown_question() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["evaluate", "--question", "nope", "--answer", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question not found: nope"));
}

#[test]
fn evaluate_unknown_format() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args([
            "evaluate", "--question", "os-1", "--answer", "text", "--format", "yaml",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: yaml"));
}

#[test]
fn validate_builtin_bank() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .arg("validate")
        .arg("--bank")
        .arg(builtin_bank_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Core Computer Science (9 questions)"))
        .stdout(predicate::str::contains("[os-2] WARNING: keywords not found"))
        .stdout(predicate::str::contains("4 warning(s) found."));
}

#[test]
fn validate_nonexistent_file() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["validate", "--bank", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let home = TempDir::new().unwrap();

    selfquiz(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created selfquiz.toml"))
        .stdout(predicate::str::contains(
            "Created question-banks/example.toml",
        ));

    assert!(home.path().join("selfquiz.toml").exists());
    assert!(home.path().join("question-banks/example.toml").exists());

    selfquiz(&home)
        .args(["validate", "--bank", "question-banks"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All question banks valid."));
}

#[test]
fn init_skips_existing() {
    let home = TempDir::new().unwrap();
    selfquiz(&home).arg("init").assert().success();

    selfquiz(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_config_merges_example_bank() {
    let home = TempDir::new().unwrap();
    selfquiz(&home).arg("init").assert().success();

    selfquiz(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("example-dsa-1"))
        .stdout(predicate::str::contains("os-1"))
        .stdout(predicate::str::contains("11 question(s)"));
}

#[test]
fn config_can_replace_builtin_bank() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("custom.toml"), CUSTOM_BANK).unwrap();
    std::fs::write(
        home.path().join("selfquiz.toml"),
        "banks = [\"custom.toml\"]\ninclude_builtin = false\n",
    )
    .unwrap();

    selfquiz(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cn-42"))
        .stdout(predicate::str::contains("os-1").not());
}

#[test]
fn practice_session_end_to_end() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["practice", "--subject", "os", "--delay-ms", "0"])
        .write_stdin("A semaphore prevents a race condition on a shared resource.\n\n:stats\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OS]"))
        .stdout(predicate::str::contains("Evaluating your answer..."))
        .stdout(predicate::str::contains("Score: "))
        .stdout(predicate::str::contains("Session summary: Answered: 1"));
}

#[test]
fn practice_menu_and_empty_answer() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["practice", "--delay-ms", "0"])
        .write_stdin("cn\n\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Choose a subject:"))
        .stdout(predicate::str::contains("[CN]"))
        .stdout(predicate::str::contains(
            "Please enter an answer before submitting.",
        ))
        .stdout(predicate::str::contains("Answered: 0 | Average: -"));
}

#[test]
fn practice_default_subject_from_env() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .args(["practice", "--delay-ms", "0"])
        .env("SELFQUIZ_DEFAULT_SUBJECT", "dsa")
        .write_stdin(":quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Choose a subject:").not())
        .stdout(predicate::str::contains("[DSA]"));
}

#[test]
fn invalid_delay_env_is_an_error() {
    let home = TempDir::new().unwrap();
    selfquiz(&home)
        .arg("list")
        .env("SELFQUIZ_GRADING_DELAY_MS", "soon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid SELFQUIZ_GRADING_DELAY_MS"));
}

#[test]
fn invalid_weights_are_rejected() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("selfquiz.toml"),
        "[weights]\nkeyword = 0.9\nsemantic = 0.9\nexplanation = 0.0\nexample = 0.0\n",
    )
    .unwrap();

    selfquiz(&home)
        .args(["evaluate", "--question", "os-1", "--answer", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid scoring weights"));
}
