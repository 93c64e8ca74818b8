use regex::Regex;
use std::error::Error;
use std::fmt;
use std::sync::LazyLock;

use crate::db::executor::SqlStatement;
use crate::llm::FAILURE_SENTINEL;

/// Matches the first fenced code block, with or without a language tag.
/// The tag and the body are matched case-insensitively across lines.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:sql)?\s*(.*?)\s*```").unwrap()
});

#[derive(Debug, PartialEq, Eq)]
pub enum InterpretError {
    /// The text carries the model-failure sentinel instead of an answer.
    UpstreamFailure(String),
    /// The candidate does not start with SELECT, INSERT, UPDATE or DELETE.
    InvalidStatementType(String),
}

impl fmt::Display for InterpretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpretError::UpstreamFailure(msg) => write!(f, "{}", msg),
            InterpretError::InvalidStatementType(text) => {
                write!(f, "not an executable SQL statement: {}", text)
            }
        }
    }
}

impl Error for InterpretError {}

/// Pulls a single executable statement out of the model's free-text answer.
///
/// The candidate is the trimmed content of the first fenced code block, or
/// the whole trimmed text when no block is present. A candidate carrying the
/// failure sentinel is rejected before the statement-type check so a
/// stringified failure can never reach the executor.
pub fn extract(model_text: &str) -> Result<SqlStatement, InterpretError> {
    let candidate = match CODE_FENCE.captures(model_text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => model_text,
    };
    let candidate = candidate.trim();

    if candidate.starts_with(FAILURE_SENTINEL) {
        return Err(InterpretError::UpstreamFailure(candidate.to_string()));
    }

    SqlStatement::parse(candidate)
        .ok_or_else(|| InterpretError::InvalidStatementType(candidate.to_string()))
}
