pub mod interpret;
pub mod prompt;
pub mod shape;

use serde::Serialize;
use std::error::Error;
use std::fmt;
use tracing::{info, warn};

use crate::db::StoreError;
use crate::db::employee::EMPLOYEE_COLUMNS;
use crate::db::store::EmployeeStore;
use crate::llm::{LlmError, LlmManager};
use crate::notify::Notifier;
use interpret::InterpretError;
use shape::{Presentable, ShapeError};

/// Guidance returned when the model's reply cannot be run as SQL.
pub const REFINE_GUIDANCE: &str = "The model did not return a valid SQL query \
    (must start with SELECT, INSERT, UPDATE, or DELETE). Please refine your question.";

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AskOutcome {
    /// The question was translated, executed and shaped.
    Answered { sql: String, answer: Presentable },
    /// The model replied with something other than SQL; the user should
    /// rephrase. Not a failure of the flow.
    Refine { reason: String },
}

#[derive(Debug)]
pub enum AskError {
    EmptyQuestion,
    Model(LlmError),
    UpstreamFailure(String),
    Execution(StoreError),
    Shape(ShapeError),
}

impl fmt::Display for AskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AskError::EmptyQuestion => write!(f, "Please enter a question."),
            AskError::Model(e) => write!(f, "{}", e),
            AskError::UpstreamFailure(msg) => write!(f, "{}", msg),
            AskError::Execution(e) => write!(f, "Error executing SQL query: {}", e),
            AskError::Shape(e) => write!(f, "Could not present the result: {}", e),
        }
    }
}

impl Error for AskError {}

/// Runs the full question-to-answer flow: translate through the model,
/// extract a statement, execute it and shape the rows.
///
/// An empty question is rejected before any model call is made.
pub async fn answer_question(
    store: &EmployeeStore,
    llm: &LlmManager,
    question: &str,
    notifier: &dyn Notifier,
) -> Result<AskOutcome, AskError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AskError::EmptyQuestion);
    }

    let model_text = llm
        .ask(prompt::SYSTEM_PROMPT, question, notifier)
        .await
        .map_err(AskError::Model)?;

    let statement = match interpret::extract(&model_text) {
        Ok(statement) => statement,
        Err(InterpretError::InvalidStatementType(text)) => {
            info!("Model output was not executable: {}", text);
            return Ok(AskOutcome::Refine {
                reason: REFINE_GUIDANCE.to_string(),
            });
        }
        Err(InterpretError::UpstreamFailure(msg)) => {
            return Err(AskError::UpstreamFailure(msg));
        }
    };

    if statement.is_mutation() {
        // Model-authored statements run verbatim; mutations are worth a trace.
        warn!("Running model-written mutation: {}", statement);
    }
    info!("Generated SQL: {}", statement);

    let sql = statement.text().to_string();
    let task_store = store.clone();
    let rows = tokio::task::spawn_blocking(move || task_store.execute_raw(&statement))
        .await
        .map_err(|e| AskError::Execution(StoreError::Query(e.to_string())))?
        .map_err(AskError::Execution)?;

    let answer = shape::shape(rows, &sql, &EMPLOYEE_COLUMNS).map_err(AskError::Shape)?;

    Ok(AskOutcome::Answered { sql, answer })
}
