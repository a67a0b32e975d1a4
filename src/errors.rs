//! Propwrap error types.
//!
//! Errors fall into three groups: path failures raised by the resolver,
//! property failures raised by schemas and wrappers, and loading failures
//! raised while reading property tables. All of them derive `miette`
//! diagnostics so the CLI can render them with codes and help text.

use crate::path::{Path, PathSegment};
use crate::property::Operation;
use miette::{Diagnostic, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

pub type PropertyResult<T> = Result<T, PropertyError>;

// ============================================================================
// PATH ERRORS
// ============================================================================

/// A failure to follow a path through a container.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("failed to find {} at path {prefix}", .segment.describe())]
    #[diagnostic(code(propwrap::path::missing))]
    Missing { segment: PathSegment, prefix: Path },

    #[error("cannot step into {found} with {} at path {prefix}", .segment.describe())]
    #[diagnostic(
        code(propwrap::path::not_indexable),
        help("maps are indexed by keys and lists by integer indices; scalars cannot be indexed")
    )]
    NotIndexable {
        segment: PathSegment,
        prefix: Path,
        found: &'static str,
    },

    #[error("an empty path has no terminal entry to {operation}")]
    #[diagnostic(code(propwrap::path::empty))]
    Empty { operation: Operation },
}

impl PathError {
    /// The segment the walk failed on, if any.
    pub fn segment(&self) -> Option<&PathSegment> {
        match self {
            PathError::Missing { segment, .. } | PathError::NotIndexable { segment, .. } => {
                Some(segment)
            }
            PathError::Empty { .. } => None,
        }
    }

    /// The part of the path that did resolve before the failure.
    pub fn valid_prefix(&self) -> Option<&Path> {
        match self {
            PathError::Missing { prefix, .. } | PathError::NotIndexable { prefix, .. } => {
                Some(prefix)
            }
            PathError::Empty { .. } => None,
        }
    }
}

/// A textual path that does not match the path grammar.
#[derive(Error, Diagnostic, Debug, Clone)]
#[error("invalid path syntax: {message}")]
#[diagnostic(
    code(propwrap::path::syntax),
    help("separate keys with dots and put indices in brackets, e.g. items[0].name or \"dotted.key\"")
)]
pub struct PathParseError {
    pub message: String,
    #[source_code]
    pub src: String,
    #[label("here")]
    pub span: SourceSpan,
}

// ============================================================================
// PROPERTY ERRORS
// ============================================================================

/// Errors raised by schemas at build time and by wrappers at access time.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// Raised only while building a schema, never at access time.
    #[error("invalid property '{property}': {reason}")]
    #[diagnostic(code(propwrap::config::invalid_property))]
    Configuration { property: String, reason: String },

    #[error("broken property '{property}': cannot {operation}")]
    #[diagnostic(code(propwrap::access::path_not_found))]
    PathNotFound {
        property: String,
        operation: Operation,
        #[source]
        source: PathError,
    },

    #[error("property '{property}' does not allow {operation}")]
    #[diagnostic(
        code(propwrap::access::disabled),
        help("the property was declared with this accessor disabled")
    )]
    AccessDisabled {
        property: String,
        operation: Operation,
    },

    #[error("no property named '{property}'")]
    #[diagnostic(code(propwrap::access::unknown_property))]
    UnknownProperty { property: String },

    #[error("property '{property}': {message}")]
    #[diagnostic(code(propwrap::access::custom))]
    Custom { property: String, message: String },
}

impl PropertyError {
    pub(crate) fn configuration(property: &str, reason: impl Into<String>) -> Self {
        PropertyError::Configuration {
            property: property.to_string(),
            reason: reason.into(),
        }
    }

    /// Builds the error a custom accessor returns to signal its own failure.
    pub fn custom(property: &str, message: impl Into<String>) -> Self {
        PropertyError::Custom {
            property: property.to_string(),
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, PropertyError::Configuration { .. })
    }

    pub fn is_path_not_found(&self) -> bool {
        matches!(self, PropertyError::PathNotFound { .. })
    }

    pub fn is_access_disabled(&self) -> bool {
        matches!(self, PropertyError::AccessDisabled { .. })
    }

    /// The underlying path failure, for `PathNotFound` errors.
    pub fn path_error(&self) -> Option<&PathError> {
        match self {
            PropertyError::PathNotFound { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// CONFIG ERRORS
// ============================================================================

/// Failures while loading a property table from disk or text.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    #[diagnostic(code(propwrap::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON document")]
    #[diagnostic(code(propwrap::config::json))]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML document")]
    #[diagnostic(code(propwrap::config::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported file format '{extension}'")]
    #[diagnostic(
        code(propwrap::config::format),
        help("use a .json, .yaml or .yml file")
    )]
    UnsupportedFormat { extension: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidPath(#[from] PathParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] PropertyError),
}
