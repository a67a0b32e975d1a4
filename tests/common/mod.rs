//! Shared helpers for propwrap integration tests.

#![allow(dead_code)]

use propwrap::value::Value;
use std::path::PathBuf;

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Parses a JSON literal into a `Value`.
pub fn value(json: &str) -> Value {
    serde_json::from_str(json).expect("test JSON should parse")
}
