//! Value types for keywords, field values, queries, and object handles.
//!
//! Keywords are plain UTF-8 text. They have no identity of their own: they
//! exist only as entries inside field values on content objects and as rows
//! in the host catalog's index.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KeywordError, KeywordResult};

/// Opaque handle for a content object held by the host catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Mint a fresh random handle.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A `/`-separated path restricting an operation to a subtree of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePath(String);

impl ScopePath {
    /// Build a scope from a path. Trailing slashes are dropped so that
    /// `/site/news` and `/site/news/` denote the same subtree.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            Self("/".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `path` is the scope root itself or lies underneath it.
    pub fn contains(&self, path: &str) -> bool {
        if self.0 == "/" {
            return path.starts_with('/');
        }
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Similarity operand: decoded text or raw byte text.
///
/// Both shapes normalize to UTF-8 text before scoring. Bytes that do not
/// decode surface [`KeywordError::InvalidInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Text(String),
    Bytes(Vec<u8>),
}

impl TextInput {
    /// View the operand as text, decoding byte input.
    pub fn as_text(&self) -> KeywordResult<&str> {
        match self {
            TextInput::Text(s) => Ok(s),
            TextInput::Bytes(b) => std::str::from_utf8(b).map_err(|err| {
                KeywordError::InvalidInput(format!("byte operand is not valid UTF-8: {err}"))
            }),
        }
    }
}

impl From<&str> for TextInput {
    fn from(s: &str) -> Self {
        TextInput::Text(s.to_string())
    }
}

impl From<String> for TextInput {
    fn from(s: String) -> Self {
        TextInput::Text(s)
    }
}

impl From<&[u8]> for TextInput {
    fn from(b: &[u8]) -> Self {
        TextInput::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for TextInput {
    fn from(b: Vec<u8>) -> Self {
        TextInput::Bytes(b)
    }
}

/// The value of a keyword-bearing field on a content object.
///
/// The shape is resolved per object by the host's field accessor, not
/// statically per field: two objects indexed under the same field may expose
/// different shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Unordered collection of distinct keywords.
    Multi(BTreeSet<String>),
    /// A single keyword, possibly absent.
    Mono(Option<String>),
}

impl FieldValue {
    /// Build a multi-valued field from any keyword iterator. Duplicates
    /// collapse.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Multi(values.into_iter().map(Into::into).collect())
    }

    /// Build a mono-valued field holding `value`.
    pub fn mono(value: impl Into<String>) -> Self {
        FieldValue::Mono(Some(value.into()))
    }

    /// An empty multi-valued field.
    pub fn empty() -> Self {
        FieldValue::Multi(BTreeSet::new())
    }

    /// True when the field holds no keyword at all.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Multi(values) => values.is_empty(),
            FieldValue::Mono(value) => value.is_none(),
        }
    }

    /// True when `keyword` is present in the field.
    pub fn contains(&self, keyword: &str) -> bool {
        match self {
            FieldValue::Multi(values) => values.contains(keyword),
            FieldValue::Mono(value) => value.as_deref() == Some(keyword),
        }
    }

    /// The keywords currently held.
    pub fn keywords(&self) -> Vec<&str> {
        match self {
            FieldValue::Multi(values) => values.iter().map(String::as_str).collect(),
            FieldValue::Mono(value) => value.iter().map(String::as_str).collect(),
        }
    }
}

/// Kind of a catalog field. Only keyword fields are manageable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Keyword,
    Other,
}

/// A field declared by the host catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn keyword(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Keyword,
        }
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Other,
        }
    }

    pub fn is_keyword(&self) -> bool {
        self.kind == FieldKind::Keyword
    }
}

/// Query for the objects whose `field` holds any of `values`, optionally
/// restricted to a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordQuery {
    pub field: String,
    pub values: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopePath>,
}

impl KeywordQuery {
    pub fn new<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            scope: None,
        }
    }

    /// Builder-style: restrict the query to a subtree.
    #[must_use]
    pub fn with_scope(mut self, scope: ScopePath) -> Self {
        self.scope = Some(scope);
        self
    }
}
