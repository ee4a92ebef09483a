//! Rendering entries into output lines: plain-text and JSON

use crate::entry::{Entry, MapData};
use serde_json::Value;
use std::fmt::Write as FmtWrite;

/// Display width channel names are padded or truncated to in plain-text
/// headers. Channel names may be longer in code; only this many characters
/// appear in the log.
pub const CHANNEL_DISPLAY_WIDTH: usize = 5;

/// The string written for a single level of indentation
pub const INDENT_UNIT: &str = "  ";

/// Renders one entry into complete output lines.
///
/// Implementations do no filtering; the caller guarantees the entry already
/// passed the channel/level filter. Returned lines include their
/// terminators.
pub trait LogFormatter: Send + Sync {
    /// Render an entry into one or more output lines
    fn format_entry(&self, entry: &Entry) -> Vec<String>;
}

/// Human-readable formatter.
///
/// Each message line is prefixed with a header of the form
/// `timestamp [<service>] [CHANL:LEVL[:thread]] ` followed by the entry's
/// indentation. Structured map data is appended as `key: value` lines
/// reusing the same header, with nested maps indented one further unit.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextFormatter;

impl PlainTextFormatter {
    fn header(entry: &Entry) -> String {
        let mut header = entry.timestamp_str();
        if !entry.service_name.is_empty() {
            let _ = write!(header, " <{}>", entry.service_name);
        }
        let channel: String = entry.channel.chars().take(CHANNEL_DISPLAY_WIDTH).collect();
        let _ = write!(
            header,
            " [{channel:<width$}:{}",
            entry.level.code(),
            width = CHANNEL_DISPLAY_WIDTH
        );
        if let Some(thread_id) = &entry.thread_id {
            let _ = write!(header, ":{thread_id}");
        }
        header.push_str("] ");
        for _ in 0..entry.num_indent {
            header.push_str(INDENT_UNIT);
        }
        header
    }
}

impl LogFormatter for PlainTextFormatter {
    fn format_entry(&self, entry: &Entry) -> Vec<String> {
        let header = Self::header(entry);
        let mut out = Vec::new();
        for line in entry.message.lines() {
            out.push(format!("{header}{line}\n"));
        }
        if !entry.map_data.is_empty() {
            append_map_lines(&entry.map_data, &header, 0, true, &mut out);
        }
        out
    }
}

/// One `key: value` line per top-level map key, all sharing `header`.
/// Nested maps recurse with one extra indent unit; only the outermost level
/// carries line terminators.
fn append_map_lines(
    map: &MapData,
    header: &str,
    depth: usize,
    terminate: bool,
    out: &mut Vec<String>,
) {
    for (key, value) in map {
        let mut line = String::from(header);
        for _ in 0..depth {
            line.push_str(INDENT_UNIT);
        }
        let _ = write!(line, "{key}: {}", render_value(value, header, depth));
        if terminate {
            line.push('\n');
        }
        out.push(line);
    }
}

fn render_value(value: &Value, header: &str, depth: usize) -> String {
    match value {
        Value::Object(map) => {
            let mut lines = Vec::new();
            append_map_lines(map, header, depth + 1, false, &mut lines);
            format!("\n{}", lines.join("\n"))
        }
        // Compact JSON form: strings come out quoted and escaped, arrays
        // (nested objects included) stay on the key's line.
        _ => value.to_string(),
    }
}

/// Machine-parsable formatter: one compact JSON object per entry,
/// newline-terminated.
///
/// The object starts from the entry's map data and sets the reserved keys
/// `channel`, `level_str`, `timestamp` and `num_indent`, plus `message`,
/// `thread_id` and `service_name` when present. Reserved keys silently
/// overwrite caller-supplied keys of the same name.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatter;

impl LogFormatter for JsonFormatter {
    fn format_entry(&self, entry: &Entry) -> Vec<String> {
        let mut object = entry.map_data.clone();
        object.insert(
            "channel".to_string(),
            Value::String(entry.channel.clone()),
        );
        object.insert(
            "level_str".to_string(),
            Value::String(entry.level.as_str().to_string()),
        );
        object.insert("timestamp".to_string(), Value::String(entry.timestamp_str()));
        object.insert("num_indent".to_string(), Value::from(entry.num_indent));
        if !entry.message.is_empty() {
            object.insert("message".to_string(), Value::String(entry.message.clone()));
        }
        if let Some(thread_id) = &entry.thread_id {
            object.insert("thread_id".to_string(), Value::String(thread_id.clone()));
        }
        if !entry.service_name.is_empty() {
            object.insert(
                "service_name".to_string(),
                Value::String(entry.service_name.clone()),
            );
        }
        vec![format!("{}\n", Value::Object(object))]
    }
}
