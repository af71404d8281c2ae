//! Structured failure representation.
//!
//! An [`Issue`] describes one validation failure. Composite schemas annotate
//! their children's issues with a [`PathItem`] on the way back up, so by the
//! time an issue reaches the caller its path reads outermost container
//! first, innermost last.
//!
//! [`Issues`] is a non-empty list: it can only be created from at least one
//! issue, and it is the error half of every
//! [`ParseResult`](crate::ParseResult).
//!
//! # Examples
//!
//! ```
//! use shapeguard_core::*;
//!
//! let schema = array(number().shared());
//! let input = Value::Array(vec!["x".into(), 2.into(), "y".into()]);
//! let issues = schema.parse(&input, &ParseContext::default()).unwrap_err();
//!
//! let keys: Vec<_> = issues.iter().map(|i| i.path[0].key.clone()).collect();
//! assert_eq!(keys, vec![PathKey::Index(0), PathKey::Index(2)]);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Value;

/// Why an issue was raised.
///
/// Native type checks report [`IssueReason::Type`]. Pipe steps report the
/// reason of the schema that owns the pipe (e.g. [`IssueReason::String`]
/// for a `min_length` step on a string schema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueReason {
    Any,
    Array,
    Bigint,
    Boolean,
    Date,
    Intersect,
    Number,
    Object,
    Set,
    Special,
    String,
    Tuple,
    Type,
    Unknown,
}

/// Whether the failing data was an object key or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueOrigin {
    Key,
    #[default]
    Value,
}

/// Coarse classification of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCategory {
    /// The native representation check failed.
    Type,
    /// A pipe step rejected an otherwise well-typed value.
    Validator,
    /// Intersection outputs could not be merged.
    Composition,
}

/// Kind of container a [`PathItem`] steps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Array,
    Tuple,
    Set,
    Object,
}

/// Position of a child inside its container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(index) => write!(f, "{index}"),
            PathKey::Key(key) => f.write_str(key),
        }
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

/// One step of container nesting.
///
/// The container and child values are shared, so prepending the same item
/// to many issues never copies the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    #[serde(rename = "type")]
    pub container: ContainerKind,
    /// The whole container value the child was found in.
    pub input: Arc<Value>,
    pub key: PathKey,
    /// The child value itself.
    pub value: Arc<Value>,
}

impl PathItem {
    pub fn new(
        container: ContainerKind,
        input: &Value,
        key: impl Into<PathKey>,
        value: &Value,
    ) -> Self {
        Self {
            container,
            input: Arc::new(input.clone()),
            key: key.into(),
            value: Arc::new(value.clone()),
        }
    }
}

/// Path items for the children of one container.
///
/// The container is copied on the first failing child only, and that copy
/// is shared by every later item.
pub(crate) struct ChildPaths<'a> {
    container: ContainerKind,
    input: &'a Value,
    shared: Option<Arc<Value>>,
}

impl<'a> ChildPaths<'a> {
    pub(crate) fn new(container: ContainerKind, input: &'a Value) -> Self {
        Self {
            container,
            input,
            shared: None,
        }
    }

    pub(crate) fn item(&mut self, key: impl Into<PathKey>, value: &Value) -> PathItem {
        let input = self.input;
        let shared = self.shared.get_or_insert_with(|| Arc::new(input.clone()));
        PathItem {
            container: self.container,
            input: Arc::clone(shared),
            key: key.into(),
            value: Arc::new(value.clone()),
        }
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub reason: IssueReason,
    /// Name of the check that failed (`"string"`, `"min_length"`, ...).
    pub validation: String,
    pub origin: IssueOrigin,
    pub message: String,
    /// The offending input.
    pub input: Value,
    /// Nesting path, outermost container first. Empty for root-level issues.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathItem>,
}

impl Issue {
    pub fn new(
        reason: IssueReason,
        validation: impl Into<String>,
        message: impl Into<String>,
        input: Value,
    ) -> Self {
        Self {
            reason,
            validation: validation.into(),
            origin: IssueOrigin::Value,
            message: message.into(),
            input,
            path: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: IssueOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Classifies the issue.
    ///
    /// # Examples
    ///
    /// ```
    /// use shapeguard_core::*;
    ///
    /// let issue = Issue::new(IssueReason::Type, "intersect", "Invalid type", Value::Null);
    /// assert_eq!(issue.category(), IssueCategory::Composition);
    ///
    /// let issue = Issue::new(IssueReason::String, "min_length", "Too short", "a".into());
    /// assert_eq!(issue.category(), IssueCategory::Validator);
    /// ```
    pub fn category(&self) -> IssueCategory {
        match self.reason {
            IssueReason::Type if self.validation == "intersect" => IssueCategory::Composition,
            IssueReason::Type => IssueCategory::Type,
            _ => IssueCategory::Validator,
        }
    }

    /// Dot-joined path keys, e.g. `"items.0.name"`. `None` without a path.
    pub fn dotted_path(&self) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        let keys: Vec<String> = self.path.iter().map(|item| item.key.to_string()).collect();
        Some(keys.join("."))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dotted_path() {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Non-empty, ordered list of issues.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Issues(Vec<Issue>);

impl Issues {
    /// Creates a list holding a single issue.
    pub fn new(first: Issue) -> Self {
        Self(vec![first])
    }

    /// Builds a list from a vector, returning `None` if it is empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() { None } else { Some(Self(issues)) }
    }

    pub fn first(&self) -> &Issue {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    pub fn push(&mut self, issue: Issue) {
        self.0.push(issue);
    }

    /// Appends every issue of `other`, preserving order.
    pub fn extend(&mut self, other: Issues) {
        self.0.extend(other.0);
    }

    /// Prepends `item` to the path of every issue.
    pub fn prepend_path(&mut self, item: PathItem) {
        for issue in &mut self.0 {
            issue.path.insert(0, item.clone());
        }
    }

    /// Returns the list with `item` prepended to every path.
    pub fn with_path_item(mut self, item: PathItem) -> Self {
        self.prepend_path(item);
        self
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }

    /// Groups issue messages by their dotted path.
    ///
    /// # Examples
    ///
    /// ```
    /// use shapeguard_core::*;
    ///
    /// let schema = object([("name", string().shared())]);
    /// let input = Value::from(serde_json::json!({"name": 5}));
    /// let issues = schema.parse(&input, &ParseContext::default()).unwrap_err();
    ///
    /// let flat = issues.flatten();
    /// assert!(flat.root.is_empty());
    /// assert_eq!(flat.nested["name"].len(), 1);
    /// ```
    pub fn flatten(&self) -> FlatErrors {
        let mut flat = FlatErrors::default();
        for issue in &self.0 {
            match issue.dotted_path() {
                Some(path) => flat.nested.entry(path).or_default().push(issue.message.clone()),
                None => flat.root.push(issue.message.clone()),
            }
        }
        flat
    }
}

/// Appends `issues` to an optional accumulator, creating it on first use.
pub(crate) fn accumulate(acc: &mut Option<Issues>, issues: Issues) {
    match acc {
        Some(existing) => existing.extend(issues),
        None => *acc = Some(issues),
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Issues {
    type Output = Issue;

    fn index(&self, index: usize) -> &Issue {
        &self.0[index]
    }
}

/// Issue messages grouped for display in forms and API responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatErrors {
    /// Messages of issues without a path.
    pub root: Vec<String>,
    /// Messages keyed by dotted path, in first-seen order.
    pub nested: IndexMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Map;

    fn type_issue(input: Value) -> Issue {
        Issue::new(IssueReason::Type, "number", "Invalid type", input)
    }

    #[test]
    fn test_prepend_path_builds_outermost_first() {
        let outer = Value::Array(vec![Value::Array(vec!["x".into()])]);
        let inner = Value::Array(vec!["x".into()]);

        let mut issues = Issues::new(type_issue("x".into()));
        issues.prepend_path(PathItem::new(ContainerKind::Array, &inner, 0, &"x".into()));
        issues.prepend_path(PathItem::new(ContainerKind::Array, &outer, 0, &inner));

        let issue = issues.first();
        assert_eq!(issue.path.len(), 2);
        assert_eq!(*issue.path[0].input, outer);
        assert_eq!(*issue.path[1].input, inner);
        assert_eq!(issue.dotted_path().as_deref(), Some("0.0"));
    }

    #[test]
    fn test_extend_keeps_traversal_order() {
        let mut issues = Issues::new(type_issue(Value::from(1)));
        issues.extend(Issues::new(type_issue(Value::from(2))));
        let inputs: Vec<_> = issues.iter().map(|i| i.input.clone()).collect();
        assert_eq!(inputs, vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(Issues::from_vec(Vec::new()).is_none());
        assert_eq!(Issues::from_vec(vec![type_issue(Value::Null)]).unwrap().len(), 1);
    }

    #[test]
    fn test_flatten_groups_by_path() {
        let map = Value::Object(Map::from_iter([("a".to_string(), Value::Null)]));
        let mut nested = Issues::new(type_issue(Value::Null));
        nested.prepend_path(PathItem::new(ContainerKind::Object, &map, "a", &Value::Null));

        let mut issues = Issues::new(type_issue(Value::Null));
        issues.extend(nested.clone());
        issues.extend(nested);

        let flat = issues.flatten();
        assert_eq!(flat.root, vec!["Invalid type".to_string()]);
        assert_eq!(flat.nested["a"].len(), 2);
    }

    #[test]
    fn test_reasons_cover_only_built_in_kinds() {
        let names: Vec<_> = [
            IssueReason::Any,
            IssueReason::Array,
            IssueReason::Bigint,
            IssueReason::Boolean,
            IssueReason::Date,
            IssueReason::Intersect,
            IssueReason::Number,
            IssueReason::Object,
            IssueReason::Set,
            IssueReason::Special,
            IssueReason::String,
            IssueReason::Tuple,
            IssueReason::Type,
            IssueReason::Unknown,
        ]
        .iter()
        .map(|reason| serde_json::to_value(reason).unwrap())
        .collect();
        assert_eq!(names[4], serde_json::json!("date"));
        // no value or schema kind exists for binary blobs
        assert!(serde_json::from_value::<IssueReason>(serde_json::json!("blob")).is_err());
    }

    #[test]
    fn test_category() {
        assert_eq!(type_issue(Value::Null).category(), IssueCategory::Type);
    }

    #[test]
    fn test_issue_serializes_path_keys() {
        let arr = Value::Array(vec![Value::Null]);
        let issues = Issues::new(type_issue(Value::Null))
            .with_path_item(PathItem::new(ContainerKind::Array, &arr, 0, &Value::Null));
        let json = serde_json::to_value(&issues).unwrap();
        assert_eq!(json[0]["reason"], "type");
        assert_eq!(json[0]["path"][0]["type"], "array");
        assert_eq!(json[0]["path"][0]["key"], 0);
    }
}
