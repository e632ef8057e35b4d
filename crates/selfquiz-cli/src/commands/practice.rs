//! The `selfquiz practice` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use tokio::sync::Notify;

use selfquiz_core::bank::QuestionStore;
use selfquiz_core::session::{Session, SessionStats};
use selfquiz_core::{EvaluationError, EvaluationResult, Evaluator, Question, Subject};

use crate::config::{load_config_from, load_question_bank};
use crate::render;

const HELP: &str = "\
Finish an answer with an empty line. Commands:
  :next           skip to another question
  :subject [S]    switch subject (menu when S is omitted)
  :stats          show session statistics
  :ideal          show the ideal answer once your answer is graded
  :quit           end the session
";

pub async fn execute(
    subject: Option<String>,
    bank_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    delay_ms: Option<u64>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_question_bank(&config, bank_path.as_deref())?;
    let evaluator =
        Evaluator::with_weights(config.weights).context("invalid scoring weights in config")?;

    let start = subject
        .map(|s| s.parse::<Subject>().map_err(anyhow::Error::msg))
        .transpose()?
        .or(config.default_subject);

    let options = PracticeOptions {
        delay: Duration::from_millis(delay_ms.unwrap_or(config.grading_delay_ms)),
        show_breakdown: config.show_breakdown,
    };

    tracing::info!(
        "loaded {} questions from bank '{}'",
        bank.questions.len(),
        bank.name
    );

    let interrupts = InterruptHandle::default();
    watch_ctrl_c(interrupts.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let session = Practice::new(&bank, evaluator, options)
        .with_interrupts(interrupts)
        .run(start, stdin.lock(), stdout.lock(), &mut rand::rng())
        .await?;

    tracing::info!(
        session = %session.id,
        answered = session.stats.answered,
        "practice session finished after {}s",
        session.elapsed().num_seconds()
    );

    Ok(())
}

/// Route every Ctrl-C of the session through `interrupts`.
///
/// During a grading delay the press cancels that submission. Anywhere else it
/// ends the session: stdin reads block the main task, so the summary goes to
/// stderr and the process exits with the conventional SIGINT status.
fn watch_ctrl_c(interrupts: InterruptHandle) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !interrupts.interrupt() {
                eprintln!("\nSession summary: {}", render::stats(&interrupts.stats()));
                std::process::exit(130);
            }
        }
    });
}

/// Shared between the practice loop and whatever delivers interrupts.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    grading: Arc<AtomicBool>,
    cancel: Arc<Notify>,
    stats: Arc<Mutex<SessionStats>>,
}

impl InterruptHandle {
    /// Deliver one interrupt. Returns `true` when it cancelled a pending
    /// grading, `false` when nothing was being graded.
    pub fn interrupt(&self) -> bool {
        if self.grading.load(Ordering::SeqCst) {
            self.cancel.notify_waiters();
            true
        } else {
            false
        }
    }

    /// Stats as of the last recorded answer.
    pub fn stats(&self) -> SessionStats {
        self.stats
            .lock()
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    fn publish(&self, stats: &SessionStats) {
        if let Ok(mut shared) = self.stats.lock() {
            *shared = stats.clone();
        }
    }
}

/// Presentation settings for a practice session.
#[derive(Debug, Clone)]
pub struct PracticeOptions {
    /// Pause between submission and results.
    pub delay: Duration,
    pub show_breakdown: bool,
}

/// One unit of learner input.
#[derive(Debug, PartialEq)]
enum Entry {
    Answer(String),
    Command(Command),
    Eof,
}

#[derive(Debug, PartialEq)]
enum Command {
    Next,
    Subject(Option<String>),
    Stats,
    Ideal,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let body = line.trim().trim_start_matches(':');
        let (name, arg) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => {
                let rest = rest.trim();
                (name, (!rest.is_empty()).then(|| rest.to_string()))
            }
            None => (body, None),
        };

        match name.to_lowercase().as_str() {
            "next" | "n" => Command::Next,
            "subject" | "s" => Command::Subject(arg),
            "stats" => Command::Stats,
            "ideal" => Command::Ideal,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => Command::Unknown(body.to_string()),
        }
    }
}

/// Outcome of a submission once the grading delay has passed.
enum Grading {
    Graded(Result<EvaluationResult, EvaluationError>),
    Cancelled,
}

/// Read one entry: a `:command` line, or answer lines up to a blank line.
fn read_entry<R: BufRead>(input: &mut R) -> Result<Entry> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        let mut raw = String::new();
        if input.read_line(&mut raw).context("failed to read input")? == 0 {
            return Ok(if lines.is_empty() {
                Entry::Eof
            } else {
                Entry::Answer(lines.join("\n"))
            });
        }
        let line = raw.trim_end_matches(&['\r', '\n'][..]);

        if lines.is_empty() && line.trim_start().starts_with(':') {
            return Ok(Entry::Command(Command::parse(line)));
        }
        if line.trim().is_empty() {
            return Ok(Entry::Answer(lines.join("\n")));
        }
        lines.push(line.to_string());
    }
}

/// Interactive question/answer loop over any question store.
pub struct Practice<'a, S: QuestionStore> {
    store: &'a S,
    evaluator: Evaluator,
    options: PracticeOptions,
    session: Session,
    interrupts: InterruptHandle,
}

impl<'a, S: QuestionStore> Practice<'a, S> {
    pub fn new(store: &'a S, evaluator: Evaluator, options: PracticeOptions) -> Self {
        Self {
            store,
            evaluator,
            options,
            session: Session::new(),
            interrupts: InterruptHandle::default(),
        }
    }

    pub fn with_interrupts(mut self, interrupts: InterruptHandle) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn interrupts(&self) -> InterruptHandle {
        self.interrupts.clone()
    }

    /// Run until `:quit` or end of input, returning the finished session.
    pub async fn run<R, W, G>(
        mut self,
        start: Option<Subject>,
        mut input: R,
        mut out: W,
        rng: &mut G,
    ) -> Result<Session>
    where
        R: BufRead,
        W: Write,
        G: Rng + ?Sized,
    {
        let store = self.store;
        let mut subject = start;
        let mut current: Option<&'a Question> = None;
        // The ideal answer stays hidden until the current question is graded.
        let mut graded = false;

        writeln!(out, "selfquiz practice. Type :help for commands.")?;

        loop {
            let active = match subject {
                Some(s) => s,
                None => match self.choose_subject(&mut input, &mut out)? {
                    Some(s) => {
                        subject = Some(s);
                        s
                    }
                    None => break,
                },
            };

            let question = match current {
                Some(q) => q,
                None => {
                    let candidates = store.list_by_subject(active);
                    match self.session.picker.pick(&candidates, rng) {
                        Some(q) => {
                            write!(out, "{}", render::question(q))?;
                            writeln!(out, "(finish your answer with an empty line)")?;
                            current = Some(q);
                            graded = false;
                            q
                        }
                        None => {
                            writeln!(out, "No questions available for {}.", active.name())?;
                            subject = None;
                            continue;
                        }
                    }
                }
            };
            out.flush()?;

            match read_entry(&mut input)? {
                Entry::Eof => break,
                Entry::Command(command) => match command {
                    Command::Quit => break,
                    Command::Next => current = None,
                    Command::Subject(None) => {
                        subject = None;
                        current = None;
                    }
                    Command::Subject(Some(name)) => match name.parse::<Subject>() {
                        Ok(s) => {
                            subject = Some(s);
                            current = None;
                            self.session.picker.reset();
                        }
                        Err(e) => writeln!(out, "{e}")?,
                    },
                    Command::Stats => writeln!(out, "{}", render::stats(&self.session.stats))?,
                    Command::Ideal if graded => writeln!(
                        out,
                        "\nIdeal answer:\n{}\n",
                        question.ideal_answer.trim()
                    )?,
                    Command::Ideal => {
                        writeln!(out, "Submit an answer first to see the ideal answer.")?
                    }
                    Command::Help => write!(out, "{HELP}")?,
                    Command::Unknown(name) => {
                        writeln!(out, "Unknown command ':{name}'. Type :help for commands.")?
                    }
                },
                Entry::Answer(text) => match super::submitted_answer(&text) {
                    Some(answer) => graded |= self.submit(question, answer, &mut out).await?,
                    None => writeln!(out, "{}", render::EMPTY_ANSWER)?,
                },
            }
        }

        writeln!(
            out,
            "\nSession summary: {}",
            render::stats(&self.session.stats)
        )?;
        out.flush()?;
        Ok(self.session)
    }

    /// Show the subject menu until a usable subject is chosen.
    /// `None` means the learner quit or input ended.
    fn choose_subject<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<Option<Subject>> {
        let available = self.store.subjects();
        loop {
            write!(out, "\n{}> ", render::subject_menu(&available))?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line).context("failed to read input")? == 0 {
                return Ok(None);
            }
            let choice = line.trim();
            if choice.is_empty() {
                continue;
            }
            if choice.starts_with(':') {
                if Command::parse(choice) == Command::Quit {
                    return Ok(None);
                }
                writeln!(out, "Choose a subject first.")?;
                continue;
            }

            let by_index = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| available.get(i).copied());
            let parsed = match by_index {
                Some(s) => Ok(s),
                None => choice.parse::<Subject>(),
            };

            match parsed {
                Ok(s) if available.contains(&s) => return Ok(Some(s)),
                Ok(s) => writeln!(out, "No questions available for {}.", s.name())?,
                Err(e) => writeln!(out, "{e}")?,
            }
        }
    }

    /// Grade one answer and render the outcome. Returns whether it was graded.
    async fn submit<W: Write>(
        &mut self,
        question: &Question,
        answer: &str,
        out: &mut W,
    ) -> Result<bool> {
        writeln!(out, "Evaluating your answer...")?;
        out.flush()?;

        match self.grade(question, answer).await {
            Grading::Cancelled => {
                writeln!(out, "Grading cancelled. Your answer was not recorded.")?;
                Ok(false)
            }
            Grading::Graded(Ok(result)) => {
                self.session.record(&result);
                self.interrupts.publish(&self.session.stats);
                write!(
                    out,
                    "{}",
                    render::result(question, &result, self.options.show_breakdown)
                )?;
                writeln!(out, "\n{}", render::stats(&self.session.stats))?;
                writeln!(
                    out,
                    "Answer again, :ideal to compare, or :next for another question."
                )?;
                Ok(true)
            }
            Grading::Graded(Err(e)) => {
                tracing::error!(question = %question.id, "evaluation failed: {e}");
                writeln!(out, "{}", render::EVALUATION_FAILED)?;
                Ok(false)
            }
        }
    }

    /// Wait out the grading delay, then grade. An interrupt during the wait
    /// drops the submission without touching the session.
    async fn grade(&self, question: &Question, answer: &str) -> Grading {
        let cancelled = self.interrupts.cancel.notified();
        tokio::pin!(cancelled);
        // Register as a waiter before interrupts are routed here.
        cancelled.as_mut().enable();
        self.interrupts.grading.store(true, Ordering::SeqCst);

        let outcome = tokio::select! {
            _ = tokio::time::sleep(self.options.delay) => {
                Grading::Graded(self.evaluator.evaluate(question, answer))
            }
            _ = &mut cancelled => Grading::Cancelled,
        };

        self.interrupts.grading.store(false, Ordering::SeqCst);
        outcome
    }
}
