//! Human and JSON rendering of collected attributes.
//!
//! The core only produces [`Attributes`]; everything about presentation
//! lives here. The two styles are a closed set, so they are a tagged
//! enum consumed by one `match`, not a dispatch table.

use std::io::{self, Write};

use colored::Colorize;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::model::{Attributes, Field};

/// Output style selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// `Label: value` lines per file; errors go to stderr.
    Human,
    /// One JSON object keyed by file name; errors are embedded.
    Json,
}

/// Renders attribute records in the selected style.
pub struct Renderer {
    max_value_bytes: usize,
}

impl Renderer {
    /// A renderer truncating human-mode values beyond `max_value_bytes`.
    #[must_use]
    pub fn new(max_value_bytes: usize) -> Self {
        Renderer { max_value_bytes }
    }

    /// Render every result in the given style.
    pub fn render_all(
        &self,
        style: RenderStyle,
        results: &[(String, Attributes)],
    ) -> anyhow::Result<()> {
        match style {
            RenderStyle::Human => {
                let stdout = io::stdout();
                let stderr = io::stderr();
                for (name, attrs) in results {
                    self.human(&mut stdout.lock(), &mut stderr.lock(), name, attrs)?;
                }
            }
            RenderStyle::Json => {
                let mut root = serde_json::Map::new();
                for (name, attrs) in results {
                    root.insert(name.clone(), json_object(attrs));
                }
                let text = to_ascii_json(&serde_json::Value::Object(root))?;
                println!("{text}");
            }
        }
        Ok(())
    }

    /// Human rendering for one file.
    ///
    /// A hard error prints `filename: message` to the error stream and
    /// suppresses the fields; a file with no fields at all prints
    /// nothing (its status shows in the exit code).
    pub fn human(
        &self,
        out: &mut impl Write,
        err: &mut impl Write,
        fname: &str,
        attrs: &Attributes,
    ) -> io::Result<()> {
        if let Some(message) = attrs.error() {
            writeln!(err, "{}: {}", fname, message.red())?;
            return Ok(());
        }

        let mut rows: Vec<(&'static str, String)> = Vec::new();
        for field in Field::ALL {
            if let Some(value) = attrs.get(field) {
                rows.push((field.label(), self.truncate(value)));
            }
            if field == Field::Application {
                if let Some(date) = attrs.date.format_human() {
                    rows.push(("Date", date));
                }
            }
        }

        if rows.is_empty() {
            return Ok(());
        }

        writeln!(out, "{}:", fname.bold())?;
        let width = rows
            .iter()
            .map(|(label, _)| label.len() + 1)
            .max()
            .unwrap_or(0);
        for (label, value) in rows {
            let padded = format!("{:<width$}", format!("{label}:"));
            writeln!(out, "  {} {}", padded.cyan(), value)?;
        }
        Ok(())
    }

    fn truncate(&self, value: &str) -> String {
        if value.len() <= self.max_value_bytes {
            return value.to_string();
        }
        let mut end = self.max_value_bytes;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes)", &value[..end], value.len())
    }
}

/// The per-file JSON object: populated fields, the date in ISO-8601,
/// and the error as just another field.
#[must_use]
pub fn json_object(attrs: &Attributes) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for field in Field::ALL {
        if let Some(value) = attrs.get(field) {
            map.insert(field.json_key().to_string(), value.into());
        }
        if field == Field::Application {
            if let Some(date) = attrs.date.format_iso8601() {
                map.insert("date".to_string(), date.into());
            }
        }
    }
    if let Some(message) = attrs.error() {
        map.insert("error".to_string(), message.into());
    }
    serde_json::Value::Object(map)
}

/// Pretty JSON with every non-ASCII character escaped as UTF-16
/// `\uXXXX` units, so the output is plain ASCII end to end.
pub fn to_ascii_json(value: &serde_json::Value) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter::new());
    value.serialize(&mut ser)?;
    Ok(String::from_utf8(out).expect("ASCII-escaped output"))
}

/// Pretty formatter with ASCII-only string fragments.
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl AsciiFormatter<'_> {
    fn new() -> Self {
        AsciiFormatter {
            inner: PrettyFormatter::new(),
        }
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: Option<&str>) -> Attributes {
        let mut attrs = Attributes::new();
        if let Some(u) = url {
            attrs.fill(Field::Url, u);
        }
        attrs
    }

    #[test]
    fn test_human_prints_fields() {
        colored::control::set_override(false);
        let mut attrs = record(Some("http://example.com/"));
        attrs.fill(Field::Application, "Safari");
        let mut out = Vec::new();
        let mut err = Vec::new();
        Renderer::new(1024)
            .human(&mut out, &mut err, "file.zip", &attrs)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("file.zip:\n"));
        assert!(text.contains("URL:"));
        assert!(text.contains("http://example.com/"));
        assert!(text.contains("Application:"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_human_error_goes_to_stderr_and_suppresses_fields() {
        colored::control::set_override(false);
        let mut attrs = record(Some("http://example.com/"));
        attrs.record_error("attribute size mismatch");
        let mut out = Vec::new();
        let mut err = Vec::new();
        Renderer::new(1024)
            .human(&mut out, &mut err, "file.zip", &attrs)
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "file.zip: attribute size mismatch\n"
        );
    }

    #[test]
    fn test_human_silent_for_empty_record() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        let mut err = Vec::new();
        Renderer::new(1024)
            .human(&mut out, &mut err, "file.zip", &record(None))
            .unwrap();
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_truncation_appends_byte_count() {
        let renderer = Renderer::new(10);
        let long = "abcdefghijKLMNOP";
        assert_eq!(renderer.truncate(long), "abcdefghij... (16 bytes)");
        assert_eq!(renderer.truncate("short"), "short");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let renderer = Renderer::new(5);
        // 'é' is two bytes; byte 5 would split the second one.
        let value = "abcdéfgh";
        let truncated = renderer.truncate(value);
        assert!(truncated.starts_with("abcd..."));
    }

    #[test]
    fn test_json_object_fields_and_error() {
        let mut attrs = record(Some("http://example.com/"));
        attrs.date.set_integer(0);
        attrs.record_error("partial failure");
        let obj = json_object(&attrs);
        assert_eq!(obj["url"], "http://example.com/");
        assert_eq!(obj["date"], "1970-01-01T00:00:00Z");
        assert_eq!(obj["error"], "partial failure");
        assert!(obj.get("referrer").is_none());
    }

    #[test]
    fn test_ascii_json_escapes_non_ascii() {
        let value = serde_json::json!({ "url": "http://exämple/🎁" });
        let text = to_ascii_json(&value).unwrap();
        assert!(text.is_ascii());
        assert!(text.contains("\\u00e4"), "{text}");
        // Surrogate pair for the emoji.
        assert!(text.contains("\\ud83c\\udf81"), "{text}");
    }

    #[test]
    fn test_ascii_json_escapes_control_characters() {
        let value = serde_json::json!({ "subject": "line\nbreak\u{1}" });
        let text = to_ascii_json(&value).unwrap();
        assert!(text.contains("\\n"));
        assert!(text.contains("\\u0001"));
    }
}
