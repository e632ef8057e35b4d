pub mod evaluate;
pub mod init;
pub mod list;
pub mod practice;
pub mod validate;

/// The answer text handed to the grader: trimmed, or `None` when blank.
pub fn submitted_answer(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
