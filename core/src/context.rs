//! Per-call parse configuration.
//!
//! A [`ParseContext`] is threaded unchanged through an entire traversal.
//! It derives [`Deserialize`] with defaults for every field, so callers can
//! embed it in their own configuration files.
//!
//! # Example YAML
//!
//! ```yaml
//! abort_early: false
//! abort_pipe_early: true
//! skip_pipe: false
//! origin: value
//! ```

use serde::{Deserialize, Serialize};

use crate::IssueOrigin;

/// Traversal policy for one `parse` call.
///
/// # Examples
///
/// ```
/// use shapeguard_core::ParseContext;
///
/// let ctx = ParseContext::default().with_abort_early(true);
/// assert!(ctx.abort_early);
/// assert!(!ctx.abort_pipe_early);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseContext {
    /// Stop the whole traversal at the first issue found anywhere.
    pub abort_early: bool,
    /// Stop the current pipe after its first failing step.
    pub abort_pipe_early: bool,
    /// Return type-checked values without running any pipe.
    pub skip_pipe: bool,
    /// Origin recorded on every issue raised during this call.
    pub origin: IssueOrigin,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = abort_early;
        self
    }

    pub fn with_abort_pipe_early(mut self, abort_pipe_early: bool) -> Self {
        self.abort_pipe_early = abort_pipe_early;
        self
    }

    pub fn with_skip_pipe(mut self, skip_pipe: bool) -> Self {
        self.skip_pipe = skip_pipe;
        self
    }

    pub fn with_origin(mut self, origin: IssueOrigin) -> Self {
        self.origin = origin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_yaml_complete() {
        let yaml = r#"
abort_early: true
abort_pipe_early: true
skip_pipe: true
origin: key
"#;
        let ctx: ParseContext = serde_yaml::from_str(yaml).unwrap();
        assert!(ctx.abort_early);
        assert!(ctx.abort_pipe_early);
        assert!(ctx.skip_pipe);
        assert_eq!(ctx.origin, IssueOrigin::Key);
    }

    #[test]
    fn test_deserialize_yaml_partial_uses_defaults() {
        let ctx: ParseContext = serde_yaml::from_str("abort_pipe_early: true\n").unwrap();
        assert!(!ctx.abort_early);
        assert!(ctx.abort_pipe_early);
        assert!(!ctx.skip_pipe);
        assert_eq!(ctx.origin, IssueOrigin::Value);
    }

    #[test]
    fn test_json_roundtrip() {
        let ctx = ParseContext::new()
            .with_abort_early(true)
            .with_origin(IssueOrigin::Key);
        let json = serde_json::to_string(&ctx).unwrap();
        let back: ParseContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
