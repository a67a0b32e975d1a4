//! Lookup paths into nested documents.
//!
//! A [`Path`] is an ordered list of [`PathSegment`]s. Paths can be built with
//! the [`path!`](crate::path!) macro, collected from segments, or parsed from
//! text:
//!
//! ```rust
//! use propwrap::path;
//! use propwrap::path::Path;
//! let parsed: Path = "spec.containers[0].\"app.kubernetes.io/name\"".parse().unwrap();
//! assert_eq!(parsed, path!["spec", "containers", 0, "app.kubernetes.io/name"]);
//! ```

use crate::errors::PathParseError;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Parser)]
#[grammar = "path.pest"]
struct PathParser;

/// One step into a container: a map key or a list index.
///
/// Negative indices count from the end of a list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(i64),
    Key(String),
}

impl PathSegment {
    /// Human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            PathSegment::Key(key) => format!("key '{}'", key),
            PathSegment::Index(index) => format!("index {}", index),
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            PathSegment::Index(index) => Some(*index),
            PathSegment::Key(_) => None,
        }
    }

    /// Maps this segment onto a position in a list of `len` items.
    pub fn list_position(&self, len: usize) -> Option<usize> {
        let index = self.as_index()?;
        let resolved = if index < 0 {
            (len as i64).checked_add(index)?
        } else {
            index
        };
        usize::try_from(resolved).ok().filter(|i| *i < len)
    }

    fn is_bare_key(key: &str) -> bool {
        !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "_-$@:/".contains(c))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) if Self::is_bare_key(key) => write!(f, "{}", key),
            PathSegment::Key(key) => {
                write!(f, "\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))
            }
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<i64> for PathSegment {
    fn from(index: i64) -> Self {
        PathSegment::Index(index)
    }
}

impl From<i32> for PathSegment {
    fn from(index: i32) -> Self {
        PathSegment::Index(index as i64)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index as i64)
    }
}

// ============================================================================
// PATH
// ============================================================================

/// An ordered sequence of segments locating a value inside nested containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.0.iter()
    }

    /// Splits off the terminal segment, returning the parent segments with it.
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.0.split_last()
    }

    /// The first `len` segments as a new path.
    pub fn prefix(&self, len: usize) -> Path {
        Path(self.0[..len.min(self.0.len())].to_vec())
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Path {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    fn build_segment(pair: Pair<Rule>, source: &str) -> Result<PathSegment, PathParseError> {
        let span = pair.as_span();
        match pair.as_rule() {
            Rule::bare => Ok(PathSegment::Key(pair.as_str().to_string())),
            Rule::quoted => {
                let raw = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                Ok(PathSegment::Key(unescape(raw)))
            }
            Rule::index => {
                let digits = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                digits
                    .parse::<i64>()
                    .map(PathSegment::Index)
                    .map_err(|e| PathParseError {
                        message: format!("index '{}' is out of range: {}", digits, e),
                        src: source.to_string(),
                        span: (span.start(), span.end() - span.start()).into(),
                    })
            }
            other => Err(PathParseError {
                message: format!("unexpected {:?}", other),
                src: source.to_string(),
                span: (span.start(), span.end() - span.start()).into(),
            }),
        }
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl FromStr for Path {
    type Err = PathParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut pairs = PathParser::parse(Rule::path, source).map_err(|e| {
            let (start, end) = match e.location {
                pest::error::InputLocation::Pos(pos) => (pos, pos),
                pest::error::InputLocation::Span((start, end)) => (start, end),
            };
            let message = if source.is_empty() {
                "path is empty".to_string()
            } else {
                format!("unexpected input at offset {}", start)
            };
            PathParseError {
                message,
                src: source.to_string(),
                span: (start, end - start).into(),
            }
        })?;

        let Some(path) = pairs.next() else {
            return Ok(Path::root());
        };
        path.into_inner()
            .filter(|p| p.as_rule() != Rule::EOI)
            .map(|p| Path::build_segment(p, source))
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Paths deserialize from a segment list or from the textual syntax.
impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Segments(Vec<PathSegment>),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Segments(segments) => Ok(Path(segments)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Builds a [`Path`](crate::path::Path) from keys and indices.
///
/// ```rust
/// use propwrap::path;
/// let p = path!["items", 0, "name"];
/// assert_eq!(p.to_string(), "items[0].name");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::path::Path::root()
    };
    ($($segment:expr),+ $(,)?) => {
        $crate::path::Path::new(vec![$($crate::path::PathSegment::from($segment)),+])
    };
}
