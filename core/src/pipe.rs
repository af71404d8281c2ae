//! Ordered validation and transformation pipes.
//!
//! A pipe runs after its schema's native type check succeeded. Each step
//! ([`Action`]) either returns a replacement value or a [`PipeIssue`]. The
//! executor applies steps in declared order:
//!
//! - with `skip_pipe`, the input is returned untouched;
//! - on a failing step, the issue is recorded and, if `abort_pipe_early` or
//!   `abort_early` is set, the remaining steps are skipped;
//! - otherwise later steps keep running on the last successful value and
//!   every issue is returned together.
//!
//! The async executor ([`PipeAsync`]) awaits one step at a time, so step
//! order, issue order and step side effects match the synchronous
//! executor exactly.
//!
//! # Examples
//!
//! ```
//! use shapeguard_core::*;
//!
//! let non_empty = Validation::new("non_empty", "Must not be empty", |v| {
//!     v.as_str().is_some_and(|s| !s.is_empty())
//! });
//! let schema = string().with_pipe(Pipe::new().step(non_empty));
//!
//! let ctx = ParseContext::default();
//! assert!(schema.parse(&"".into(), &ctx).is_err());
//! assert_eq!(schema.parse(&"ok".into(), &ctx), Ok("ok".into()));
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::trace;

use crate::issue::accumulate;
use crate::{BoxFuture, Issue, IssueReason, Issues, ParseContext, ParseResult, Value};

/// Failure reported by a single pipe step.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeIssue {
    /// Name of the failing check (`"min_length"`, ...).
    pub validation: String,
    pub message: String,
    pub input: Value,
}

impl PipeIssue {
    pub fn new(validation: impl Into<String>, message: impl Into<String>, input: Value) -> Self {
        Self {
            validation: validation.into(),
            message: message.into(),
            input,
        }
    }

    fn into_issue(self, reason: IssueReason, ctx: &ParseContext) -> Issue {
        Issue::new(reason, self.validation, self.message, self.input).with_origin(ctx.origin)
    }
}

/// Outcome of one pipe step.
pub type PipeResult = Result<Value, PipeIssue>;

/// One synchronous pipe step.
#[derive(Clone)]
pub struct Action(Arc<dyn Fn(Value) -> PipeResult + Send + Sync>);

impl Action {
    pub fn new<F>(step: F) -> Self
    where
        F: Fn(Value) -> PipeResult + Send + Sync + 'static,
    {
        Self(Arc::new(step))
    }

    /// A step that always succeeds with `map(input)`.
    pub fn transform<F>(map: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::new(move |input| Ok(map(input)))
    }

    pub fn run(&self, input: Value) -> PipeResult {
        (self.0)(input)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// A named predicate with an overridable default message.
///
/// This is the shape every validator takes: a requirement captured at
/// construction, a default message, and a check run against the input.
/// Converts into an [`Action`] that returns the input unchanged on success.
#[derive(Clone)]
pub struct Validation {
    name: &'static str,
    message: String,
    check: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Validation {
    pub fn new<F>(name: &'static str, default_message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            message: default_message.into(),
            check: Arc::new(check),
        }
    }

    /// Replaces the default message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Runs the check.
    pub fn validate(&self, input: Value) -> PipeResult {
        if (self.check)(&input) {
            Ok(input)
        } else {
            Err(PipeIssue::new(self.name, self.message.clone(), input))
        }
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish()
    }
}

impl From<Validation> for Action {
    fn from(validation: Validation) -> Self {
        Action::new(move |input| validation.validate(input))
    }
}

/// Ordered list of synchronous steps.
#[derive(Debug, Clone, Default)]
pub struct Pipe {
    actions: Vec<Action>,
}

impl Pipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn step(mut self, action: impl Into<Action>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs the pipe over a value that already passed its type check.
    ///
    /// `reason` is the owning schema's reason, recorded on every issue.
    pub fn execute(&self, input: Value, ctx: &ParseContext, reason: IssueReason) -> ParseResult {
        if ctx.skip_pipe || self.actions.is_empty() {
            return Ok(input);
        }

        let mut issues: Option<Issues> = None;
        let mut output = input;

        for (index, action) in self.actions.iter().enumerate() {
            match action.run(output.clone()) {
                Ok(value) => output = value,
                Err(issue) => {
                    accumulate(&mut issues, Issues::new(issue.into_issue(reason, ctx)));
                    if ctx.abort_early || ctx.abort_pipe_early {
                        trace!(step = index, ?reason, "pipe aborted early");
                        break;
                    }
                }
            }
        }

        match issues {
            Some(issues) => Err(issues),
            None => Ok(output),
        }
    }
}

/// One step that may suspend.
#[derive(Clone)]
pub struct ActionAsync(Arc<dyn Fn(Value) -> BoxFuture<'static, PipeResult> + Send + Sync>);

impl ActionAsync {
    pub fn new<F, Fut>(step: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PipeResult> + Send + 'static,
    {
        Self(Arc::new(move |input| Box::pin(step(input))))
    }

    pub fn run(&self, input: Value) -> BoxFuture<'static, PipeResult> {
        (self.0)(input)
    }
}

impl fmt::Debug for ActionAsync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionAsync(..)")
    }
}

#[derive(Debug, Clone)]
enum Step {
    Sync(Action),
    Async(ActionAsync),
}

/// Ordered list of steps, any of which may suspend.
#[derive(Debug, Clone, Default)]
pub struct PipeAsync {
    steps: Vec<Step>,
}

impl PipeAsync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a synchronous step.
    pub fn step(mut self, action: impl Into<Action>) -> Self {
        self.steps.push(Step::Sync(action.into()));
        self
    }

    /// Appends a step that may suspend.
    pub fn step_async(mut self, action: ActionAsync) -> Self {
        self.steps.push(Step::Async(action));
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Async counterpart of [`Pipe::execute`]; steps run strictly one after
    /// another.
    pub async fn execute(
        &self,
        input: Value,
        ctx: &ParseContext,
        reason: IssueReason,
    ) -> ParseResult {
        if ctx.skip_pipe || self.steps.is_empty() {
            return Ok(input);
        }

        let mut issues: Option<Issues> = None;
        let mut output = input;

        for (index, step) in self.steps.iter().enumerate() {
            let result = match step {
                Step::Sync(action) => action.run(output.clone()),
                Step::Async(action) => action.run(output.clone()).await,
            };
            match result {
                Ok(value) => output = value,
                Err(issue) => {
                    accumulate(&mut issues, Issues::new(issue.into_issue(reason, ctx)));
                    if ctx.abort_early || ctx.abort_pipe_early {
                        trace!(step = index, ?reason, "async pipe aborted early");
                        break;
                    }
                }
            }
        }

        match issues {
            Some(issues) => Err(issues),
            None => Ok(output),
        }
    }
}

impl From<Pipe> for PipeAsync {
    fn from(pipe: Pipe) -> Self {
        Self {
            steps: pipe.actions.into_iter().map(Step::Sync).collect(),
        }
    }
}
