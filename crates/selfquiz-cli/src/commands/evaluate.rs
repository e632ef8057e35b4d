//! The `selfquiz evaluate` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use selfquiz_core::bank::QuestionStore;
use selfquiz_core::report::SubmissionReport;
use selfquiz_core::Evaluator;

use crate::config::{load_config_from, load_question_bank};
use crate::render;

pub fn execute(
    question_id: String,
    answer: Option<String>,
    answer_file: Option<PathBuf>,
    bank_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_question_bank(&config, bank_path.as_deref())?;
    let evaluator =
        Evaluator::with_weights(config.weights).context("invalid scoring weights in config")?;

    let question = bank
        .get(&question_id)
        .with_context(|| format!("question not found: {question_id}"))?;

    let answer = match (answer, answer_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read answer file: {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read answer from stdin")?;
            buf
        }
    };
    let answer = super::submitted_answer(&answer)
        .with_context(|| render::EMPTY_ANSWER.to_string())?;

    let result = evaluator.evaluate(question, answer).map_err(|e| {
        tracing::error!(question = %question.id, "evaluation failed: {e}");
        anyhow::Error::new(e).context(render::EVALUATION_FAILED)
    })?;

    match format.as_str() {
        "json" => {
            let report = SubmissionReport::new(question, result);
            println!("{}", report.to_json()?);
        }
        "markdown" | "md" => {
            let report = SubmissionReport::new(question, result);
            println!("{}", report.to_markdown());
        }
        "text" => {
            print!("{}", render::question(question));
            print!(
                "{}",
                render::result(question, &result, config.show_breakdown)
            );
        }
        other => anyhow::bail!("unknown format: {other} (expected text, json or markdown)"),
    }

    Ok(())
}
