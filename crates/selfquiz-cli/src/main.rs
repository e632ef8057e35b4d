//! selfquiz CLI: practice, grade and manage question banks from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod render;

#[derive(Parser)]
#[command(
    name = "selfquiz",
    version,
    about = "Self-quiz tool with instant free-text answer grading"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer questions interactively and get instant feedback
    Practice {
        /// Subject to start with (os, cn, dsa); prompts when omitted
        #[arg(long)]
        subject: Option<String>,

        /// Question bank file or directory (replaces the built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pause before showing results, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Grade a single answer
    Evaluate {
        /// Question ID (see `selfquiz list`)
        #[arg(long)]
        question: String,

        /// Answer text (reads stdin when neither this nor --answer-file is given)
        #[arg(long, conflicts_with = "answer_file")]
        answer: Option<String>,

        /// File containing the answer text
        #[arg(long)]
        answer_file: Option<PathBuf>,

        /// Question bank file or directory (replaces the built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List available questions
    List {
        /// Filter to one subject
        #[arg(long)]
        subject: Option<String>,

        /// Question bank file or directory (replaces the built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("selfquiz=info".parse().expect("valid directive"))
                .add_directive("selfquiz_core=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            subject,
            bank,
            config,
            delay_ms,
        } => commands::practice::execute(subject, bank, config, delay_ms).await,
        Commands::Evaluate {
            question,
            answer,
            answer_file,
            bank,
            config,
            format,
        } => commands::evaluate::execute(question, answer, answer_file, bank, config, format),
        Commands::List {
            subject,
            bank,
            config,
        } => commands::list::execute(subject, bank, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
