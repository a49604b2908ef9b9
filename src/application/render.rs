//! Response rendering: raw JSON for scripts, labeled lines for people
//!
//! Rendering never fails. Fields missing from a response show a placeholder,
//! so a partial response is still displayed in full.

use serde_json::Value;

use crate::domain::schema::OutputLine;
use crate::domain::{Document, OutputSpec};

/// Shown for a field the response does not contain.
pub const PLACEHOLDER: &str = "<none>";

/// Render a response.
///
/// With `raw` the document is emitted as compact JSON, unmodified. Otherwise
/// each output line is rendered in declared order; a command without output
/// lines falls back to indented JSON.
pub fn render(response: &Document, output: &OutputSpec, raw: bool) -> String {
    if raw {
        return response.to_json_string();
    }
    if output.is_empty() {
        return response.to_json_pretty();
    }
    output
        .iter()
        .map(|line| render_line(response, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `## <label right-aligned to 20>: <formatted value>`
pub fn render_line(response: &Document, line: &OutputLine) -> String {
    let value = response
        .value(line.path)
        .map(display_value)
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let text = if line.format.contains("{}") {
        line.format.replacen("{}", &value, 1)
    } else {
        format!("{} {}", line.format, value)
    };
    format!("## {:>20}: {}", line.label, text)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: &[OutputLine] = &[
        OutputLine::new("name", "key name"),
        OutputLine::new("stats.elapsed", "elapsed").format("{} us"),
        OutputLine::new("names", "accounts"),
    ];

    #[test]
    fn test_render_line_pads_label() {
        let doc = Document::from_json_str(r#"{"name":"alice"}"#).unwrap();
        assert_eq!(
            render_line(&doc, &LINES[0]),
            "##             key name: alice"
        );
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let doc = Document::from_json_str(r#"{"name":"alice"}"#).unwrap();
        let text = render(&doc, LINES, false);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("elapsed: <none> us"));
        assert!(lines[2].ends_with("accounts: <none>"));
    }

    #[test]
    fn test_nested_and_array_values() {
        let doc =
            Document::from_json_str(r#"{"stats":{"elapsed":512},"names":["a","b"]}"#).unwrap();
        let text = render(&doc, LINES, false);
        assert!(text.contains("elapsed: 512 us"));
        assert!(text.contains("accounts: a, b"));
    }

    #[test]
    fn test_raw_is_compact_json() {
        let doc = Document::from_json_str(r#"{ "b": 1, "a": [true] }"#).unwrap();
        assert_eq!(render(&doc, LINES, true), r#"{"b":1,"a":[true]}"#);
    }

    #[test]
    fn test_empty_output_falls_back_to_json() {
        let doc = Document::from_json_str(r#"{"a":1}"#).unwrap();
        assert_eq!(render(&doc, &[], false), "{\n  \"a\": 1\n}");
    }
}
