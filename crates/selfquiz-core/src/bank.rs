//! TOML question bank parser and the question store.
//!
//! Loads question banks from TOML files and directories, validates them, and
//! serves questions grouped by subject.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, Subject};

/// The catalogue compiled into the crate.
const BUILTIN_BANK: &str = include_str!("../data/core-cs.toml");

/// Read-only access to a catalogue of questions.
pub trait QuestionStore {
    /// Questions for one subject, in catalogue order.
    fn list_by_subject(&self, subject: Subject) -> Vec<&Question>;

    /// Look up a question by id.
    fn get(&self, id: &str) -> Option<&Question>;

    /// Subjects that have at least one question, in menu order.
    fn subjects(&self) -> Vec<Subject>;
}

/// A named collection of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    pub description: String,
    /// The questions, in file order.
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// The built-in operating systems / networks / algorithms catalogue.
    pub fn builtin() -> Result<Self> {
        parse_bank_str(BUILTIN_BANK, Path::new("builtin:core-cs.toml"))
    }

    /// Append another bank's questions. Later duplicates of an id are dropped.
    pub fn merge(&mut self, other: QuestionBank) {
        let mut seen: HashSet<String> = self.questions.iter().map(|q| q.id.clone()).collect();
        for question in other.questions {
            if seen.insert(question.id.clone()) {
                self.questions.push(question);
            } else {
                tracing::warn!(
                    "question '{}' from bank '{}' shadows an existing id, skipping",
                    question.id,
                    other.id
                );
            }
        }
    }
}

impl QuestionStore for QuestionBank {
    fn list_by_subject(&self, subject: Subject) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.subject == subject)
            .collect()
    }

    fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    fn subjects(&self) -> Vec<Subject> {
        let present: BTreeSet<Subject> = self.questions.iter().map(|q| q.subject).collect();
        present.into_iter().collect()
    }
}

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    subject: String,
    #[serde(default)]
    topic: String,
    prompt: String,
    ideal_answer: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default = "default_marks")]
    marks: u32,
}

fn default_marks() -> u32 {
    10
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let subject: Subject = q
                .subject
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question '{}': {}", q.id, e))?;

            Ok(Question {
                id: q.id,
                subject,
                topic: q.topic,
                prompt: q.prompt,
                ideal_answer: q.ideal_answer,
                keywords: q.keywords,
                marks: q.marks,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank from a file, or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_bank(path)?])
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for data problems the evaluator cannot recover
/// from, and for questions that can never reach full marks.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |question: &Question, message: String| {
        warnings.push(ValidationWarning {
            question_id: Some(question.id.clone()),
            message,
        });
    };

    let mut seen_ids = HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(&question.id) {
            warn(question, format!("duplicate question ID: {}", question.id));
        }
        if question.prompt.trim().is_empty() {
            warn(question, "prompt is empty".into());
        }
        if question.ideal_answer.trim().is_empty() {
            warn(question, "ideal_answer is empty".into());
        }
        if question.marks == 0 {
            warn(question, "marks must be greater than zero".into());
        }
        if question.keywords.is_empty() {
            warn(question, "no keywords defined".into());
        }
        if question.keywords.iter().any(|k| k.trim().is_empty()) {
            warn(question, "contains a blank keyword".into());
        }

        let ideal = question.ideal_answer.to_lowercase();
        let absent: Vec<&str> = question
            .keywords
            .iter()
            .filter(|k| !k.trim().is_empty() && !ideal.contains(&k.to_lowercase()))
            .map(String::as_str)
            .collect();
        if !absent.is_empty() {
            warn(
                question,
                format!("keywords not found in ideal_answer: {}", absent.join(", ")),
            );
        }
    }

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    warnings
}
