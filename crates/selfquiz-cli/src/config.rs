//! Configuration loading and question bank assembly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use selfquiz_core::bank::{load_banks, QuestionBank};
use selfquiz_core::{ScoringWeights, Subject};

/// Top-level selfquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfquizConfig {
    /// Extra question bank files or directories. `${VAR}` references are expanded.
    #[serde(default)]
    pub banks: Vec<String>,
    /// Whether the built-in bank is loaded alongside `banks`.
    #[serde(default = "default_true")]
    pub include_builtin: bool,
    /// Subject to start practice with.
    #[serde(default)]
    pub default_subject: Option<Subject>,
    /// Pause before results are shown, in milliseconds.
    #[serde(default = "default_grading_delay")]
    pub grading_delay_ms: u64,
    /// Show per-signal score breakdown after each answer.
    #[serde(default)]
    pub show_breakdown: bool,
    /// Weights of the four grading signals.
    #[serde(default)]
    pub weights: ScoringWeights,
}

fn default_true() -> bool {
    true
}
fn default_grading_delay() -> u64 {
    1000
}

impl Default for SelfquizConfig {
    fn default() -> Self {
        Self {
            banks: Vec::new(),
            include_builtin: true,
            default_subject: None,
            grading_delay_ms: default_grading_delay(),
            show_breakdown: false,
            weights: ScoringWeights::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `selfquiz.toml` in the current directory
/// 2. `~/.config/selfquiz/config.toml`
///
/// Environment variable overrides: `SELFQUIZ_GRADING_DELAY_MS`,
/// `SELFQUIZ_DEFAULT_SUBJECT`.
pub fn load_config_from(path: Option<&Path>) -> Result<SelfquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("selfquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SelfquizConfig::default(),
    };

    if let Ok(delay) = std::env::var("SELFQUIZ_GRADING_DELAY_MS") {
        config.grading_delay_ms = delay
            .trim()
            .parse()
            .with_context(|| format!("invalid SELFQUIZ_GRADING_DELAY_MS: '{delay}'"))?;
    }

    if let Ok(subject) = std::env::var("SELFQUIZ_DEFAULT_SUBJECT") {
        let parsed: Subject = subject
            .parse()
            .map_err(|e: String| anyhow::anyhow!("invalid SELFQUIZ_DEFAULT_SUBJECT: {e}"))?;
        config.default_subject = Some(parsed);
    }

    config.banks = config.banks.iter().map(|b| resolve_env_vars(b)).collect();

    Ok(config)
}

fn parse_config(content: &str) -> Result<SelfquizConfig> {
    Ok(toml::from_str::<SelfquizConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("selfquiz"))
}

/// Assemble the question bank to quiz from.
///
/// An explicit `--bank` path replaces everything else. Otherwise the built-in
/// bank (unless disabled) is merged with every bank listed in the config.
pub fn load_question_bank(config: &SelfquizConfig, bank_override: Option<&Path>) -> Result<QuestionBank> {
    let sources: Vec<PathBuf> = match bank_override {
        Some(path) => vec![path.to_path_buf()],
        None => config.banks.iter().map(PathBuf::from).collect(),
    };
    let include_builtin = bank_override.is_none() && config.include_builtin;

    let mut combined = if include_builtin {
        QuestionBank::builtin().context("built-in question bank is malformed")?
    } else {
        QuestionBank {
            id: "custom".into(),
            name: "Custom".into(),
            description: String::new(),
            questions: Vec::new(),
        }
    };

    for source in &sources {
        for bank in load_banks(source)? {
            tracing::info!(
                "loaded bank '{}' ({} questions) from {}",
                bank.id,
                bank.questions.len(),
                source.display()
            );
            combined.merge(bank);
        }
    }

    anyhow::ensure!(
        !combined.questions.is_empty(),
        "no questions found in {}",
        sources
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(combined)
}
