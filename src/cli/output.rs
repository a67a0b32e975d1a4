//! Handles all user-facing output for the CLI.
//!
//! Output functions write to any `termcolor::WriteColor`, so commands print
//! colorized text to a terminal and plain text into a buffer under test.

use crate::property::Operation;
use crate::schema::{BoundProperty, Schema};
use crate::value::Value;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Prints one line per property: name, path, enabled operations and doc.
pub fn print_listing<W: WriteColor>(out: &mut W, schema: &Schema<Value>) -> io::Result<()> {
    let width = schema.names().map(str::len).max().unwrap_or(0);
    for prop in schema.iter() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(out, "{:width$}", prop.name(), width = width)?;
        out.reset()?;
        write!(out, "  {}  ", prop.path())?;
        print_operations(out, prop)?;
        if let Some(doc) = prop.doc() {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "  {}", doc)?;
            out.reset()?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn print_operations<W: WriteColor>(out: &mut W, prop: &BoundProperty<Value>) -> io::Result<()> {
    write!(out, "[")?;
    for (i, op) in Operation::ALL.iter().enumerate() {
        if i > 0 {
            write!(out, " ")?;
        }
        if prop.allows(*op) {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "{}", op)?;
        } else {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(out, "-{}", op)?;
        }
        out.reset()?;
    }
    write!(out, "]")
}

/// Prints whether each property resolves in `contents`. Returns the missing names.
pub fn print_check<W: WriteColor>(
    out: &mut W,
    schema: &Schema<Value>,
    contents: &Value,
) -> io::Result<Vec<String>> {
    let mut missing = Vec::new();
    for prop in schema.iter() {
        let present = prop.is_present(contents);
        let (label, color) = if present {
            ("ok", Color::Green)
        } else {
            missing.push(prop.name().to_string());
            ("missing", Color::Yellow)
        };
        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{:>7}", label)?;
        out.reset()?;
        writeln!(out, "  {} ({})", prop.name(), prop.path())?;
    }
    Ok(missing)
}

/// Prints a value as pretty JSON followed by a newline.
pub fn print_value<W: Write>(out: &mut W, value: &Value) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{}", text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use termcolor::Buffer;

    fn schema() -> std::sync::Arc<Schema<Value>> {
        config::parse_yaml(
            "owner:\n  path: [labels, owner]\n  doc: Owning team\nimage:\n  path: spec.image\n  set: false\n",
        )
        .unwrap()
        .build("Resource")
        .unwrap()
    }

    #[test]
    fn listing_shows_paths_operations_and_docs() {
        let mut buf = Buffer::no_color();
        print_listing(&mut buf, &schema()).unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert!(text.contains("owner  labels.owner  [get set delete]  Owning team"));
        assert!(text.contains("image  spec.image  [get -set delete]"));
    }

    #[test]
    fn check_reports_missing_properties() {
        let data: Value = serde_json::from_str(r#"{"labels": {"owner": "a"}}"#).unwrap();
        let mut buf = Buffer::no_color();
        let missing = print_check(&mut buf, &schema(), &data).unwrap();
        assert_eq!(missing, vec!["image".to_string()]);
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert!(text.contains("     ok  owner (labels.owner)"));
        assert!(text.contains("missing  image (spec.image)"));
    }
}
