pub mod providers;

use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::warn;

use crate::config::LlmConfig;
use crate::notify::Notifier;

/// Prefix of every stringified model failure. Text produced under this prefix
/// is never a statement, and downstream handling checks for it explicitly.
pub const FAILURE_SENTINEL: &str = "Error: Could not get response from LLM";

/// A single completion attempt's failure, as classified by the provider.
#[derive(Debug)]
pub enum CompletionError {
    /// The endpoint signalled rate limiting; the call may be retried.
    RateLimited(String),
    Connection(String),
    Response(String),
    Config(String),
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::RateLimited(msg) => write!(f, "rate limit exceeded: {}", msg),
            CompletionError::Connection(msg) => write!(f, "connection error: {}", msg),
            CompletionError::Response(msg) => write!(f, "response error: {}", msg),
            CompletionError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl Error for CompletionError {}

/// Final failure of the model call, after the retry budget is spent or a
/// non-retryable error occurs.
#[derive(Debug)]
pub enum LlmError {
    Fatal(CompletionError),
    Exhausted { attempts: u32, last_error: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::Fatal(e) => {
                write!(f, "{}. Details: {}", FAILURE_SENTINEL, e)
            }
            LlmError::Exhausted { attempts, last_error } => {
                write!(
                    f,
                    "{} after {} attempts. Details: {}",
                    FAILURE_SENTINEL, attempts, last_error
                )
            }
        }
    }
}

impl Error for LlmError {}

/// A chat-style completion backend taking a system prompt and a user message.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}

/// Budget for retrying rate-limited completion calls. The delay doubles after
/// every rate-limited attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_secs(2),
        }
    }
}

pub struct LlmManager {
    completion: Box<dyn ChatCompletion>,
    policy: RetryPolicy,
}

impl LlmManager {
    pub fn new(config: &LlmConfig) -> Result<Self, CompletionError> {
        let completion: Box<dyn ChatCompletion> = match config.backend.as_str() {
            "openrouter" => Box::new(providers::openrouter::OpenRouterProvider::new(config)?),
            "ollama" => Box::new(providers::ollama::OllamaProvider::new(config)?),
            _ => {
                return Err(CompletionError::Config(format!(
                    "Unsupported LLM backend: {}",
                    config.backend
                )));
            }
        };

        let policy = RetryPolicy {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_secs(config.initial_delay_secs),
        };

        Ok(Self { completion, policy })
    }

    /// Builds a manager over an explicit backend, bypassing config dispatch.
    pub fn with_completion(completion: Box<dyn ChatCompletion>, policy: RetryPolicy) -> Self {
        Self { completion, policy }
    }

    /// Asks the model, suspending and retrying with doubling delays while the
    /// endpoint rate-limits, up to the policy's attempt budget. Any other
    /// failure is returned immediately without consuming the budget.
    pub async fn ask(
        &self,
        system_prompt: &str,
        question: &str,
        notifier: &dyn Notifier,
    ) -> Result<String, LlmError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut delay = self.policy.initial_delay;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            notifier.info(format!(
                "Asking the model... (attempt {}/{})",
                attempt, max_attempts
            ));

            match self.completion.complete(system_prompt, question).await {
                Ok(text) => return Ok(text),
                Err(CompletionError::RateLimited(msg)) => {
                    warn!(
                        "Rate limit hit on attempt {}/{}: {}",
                        attempt, max_attempts, msg
                    );
                    last_error = format!("rate limit exceeded: {}", msg);

                    if attempt < max_attempts {
                        notifier.warning(format!(
                            "Rate limit hit. Retrying in {} seconds... (attempt {}/{})",
                            delay.as_secs(),
                            attempt,
                            max_attempts
                        ));
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    }
                }
                Err(fatal) => return Err(LlmError::Fatal(fatal)),
            }
        }

        Err(LlmError::Exhausted {
            attempts: max_attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeLog, Severity};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    struct Scripted {
        calls: Arc<AtomicU32>,
        rate_limits: u32,
    }

    #[async_trait]
    impl ChatCompletion for Scripted {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.rate_limits {
                Err(CompletionError::RateLimited("try later".to_string()))
            } else {
                Ok("SELECT 1;".to_string())
            }
        }
    }

    struct AlwaysFatal {
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl ChatCompletion for AlwaysFatal {
        async fn complete(&self, _: &str, _: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CompletionError::Response("boom".to_string()))
        }
    }

    fn manager(completion: impl ChatCompletion + 'static, max_attempts: u32) -> LlmManager {
        LlmManager::with_completion(
            Box::new(completion),
            RetryPolicy {
                max_attempts,
                initial_delay: Duration::from_secs(2),
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_rate_limits_with_doubling_delays() {
        let calls = Arc::new(AtomicU32::new(0));
        let llm = manager(Scripted { calls: calls.clone(), rate_limits: 3 }, 10);
        let log = NoticeLog::new();

        let start = Instant::now();
        let text = llm.ask("system", "question", &log).await.unwrap();

        assert_eq!(text, "SELECT 1;");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // Three rate-limited attempts suspend for 2, 4 and 8 seconds.
        assert_eq!(start.elapsed(), Duration::from_secs(14));

        let warnings = log
            .take()
            .into_iter()
            .filter(|n| n.severity == Severity::Warning)
            .count();
        assert_eq!(warnings, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_after_exactly_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let llm = manager(Scripted { calls: calls.clone(), rate_limits: u32::MAX }, 3);
        let log = NoticeLog::new();

        let start = Instant::now();
        let err = llm.ask("system", "question", &log).await.unwrap_err();

        assert!(matches!(err, LlmError::Exhausted { attempts: 3, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // No suspension after the final failed attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let llm = manager(AlwaysFatal { calls: calls.clone() }, 10);
        let log = NoticeLog::new();

        let start = Instant::now();
        let err = llm.ask("system", "question", &log).await.unwrap_err();

        assert!(matches!(err, LlmError::Fatal(CompletionError::Response(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn failures_stringify_under_the_sentinel() {
        let fatal = LlmError::Fatal(CompletionError::Connection("refused".to_string()));
        assert!(fatal.to_string().starts_with(FAILURE_SENTINEL));

        let exhausted = LlmError::Exhausted {
            attempts: 10,
            last_error: "rate limit exceeded: 429".to_string(),
        };
        assert!(exhausted.to_string().starts_with(FAILURE_SENTINEL));
        assert!(exhausted.to_string().contains("10 attempts"));
    }
}
