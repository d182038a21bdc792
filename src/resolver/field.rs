//! Field references used by criteria and sort lists

use std::fmt;

/// A dot-separated path into a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Splits `path` on `.`
    pub fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// The path as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when the path has more than one segment
    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Target of a criterion or sort entry.
///
/// `Key` is the record's primary key. It is stored beside the record rather
/// than inside it, so it can be filtered on but never sorted by. Strings
/// always convert to `Path`; the key is only reachable through [`KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Key,
    Path(FieldPath),
}

/// The reserved primary key field
pub const KEY: Field = Field::Key;

impl Field {
    pub fn is_key(&self) -> bool {
        matches!(self, Field::Key)
    }

    /// Returns the path unless this is the key
    pub fn as_path(&self) -> Option<&FieldPath> {
        match self {
            Field::Key => None,
            Field::Path(path) => Some(path),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Key => write!(f, "<key>"),
            Field::Path(path) => write!(f, "{}", path),
        }
    }
}

impl From<&str> for Field {
    fn from(path: &str) -> Self {
        Field::Path(FieldPath::parse(path))
    }
}

impl From<String> for Field {
    fn from(path: String) -> Self {
        Field::Path(FieldPath::parse(&path))
    }
}

impl From<FieldPath> for Field {
    fn from(path: FieldPath) -> Self {
        Field::Path(path)
    }
}
