//! The `selfquiz list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use selfquiz_core::bank::QuestionStore;
use selfquiz_core::Subject;

use crate::config::{load_config_from, load_question_bank};

pub fn execute(
    subject: Option<String>,
    bank_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_question_bank(&config, bank_path.as_deref())?;

    let subjects: Vec<Subject> = match subject {
        Some(s) => vec![s.parse::<Subject>().map_err(anyhow::Error::msg)?],
        None => bank.subjects(),
    };

    let mut table = Table::new();
    table.set_header(vec!["ID", "Subject", "Topic", "Marks", "Keywords"]);

    let mut count = 0;
    for subject in &subjects {
        for question in bank.list_by_subject(*subject) {
            table.add_row(vec![
                Cell::new(&question.id),
                Cell::new(subject.code()),
                Cell::new(&question.topic),
                Cell::new(question.marks),
                Cell::new(question.keywords.len()),
            ]);
            count += 1;
        }
    }

    if count == 0 {
        println!("No questions found.");
    } else {
        println!("{table}");
        println!("{count} question(s)");
    }

    Ok(())
}
