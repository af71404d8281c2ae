//! Caller-supplied checks.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use shapeguard_core::{ActionAsync, BoxFuture, PipeIssue, Validation, Value};

const INVALID_INPUT: &str = "Invalid input";

/// Wraps a predicate as a check named `custom`.
pub fn custom<F>(check: F) -> Validation
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Validation::new("custom", INVALID_INPUT, check)
}

/// A check whose predicate may suspend. Only usable in async pipes.
#[derive(Clone)]
pub struct CustomAsync {
    message: String,
    check: Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>,
}

impl CustomAsync {
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Debug for CustomAsync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAsync")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

pub fn custom_async<F, Fut>(check: F) -> CustomAsync
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    CustomAsync {
        message: INVALID_INPUT.to_string(),
        check: Arc::new(move |input| Box::pin(check(input))),
    }
}

impl From<CustomAsync> for ActionAsync {
    fn from(custom: CustomAsync) -> Self {
        let CustomAsync { message, check } = custom;
        ActionAsync::new(move |input: Value| {
            let verdict = check(input.clone());
            let message = message.clone();
            async move {
                if verdict.await {
                    Ok(input)
                } else {
                    Err(PipeIssue::new("custom", message, input))
                }
            }
        })
    }
}
