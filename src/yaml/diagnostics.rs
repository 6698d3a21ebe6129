//! Diagnostics for malformed build files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A build file that failed to parse, with the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid build file: {message}")]
#[diagnostic(code(droneforge::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help: suggest(&message),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Byte offset of a 1-based line/column pair, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len().saturating_sub(1));
            return line_start + within;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

fn suggest(message: &str) -> Option<String> {
    let lower = message.to_lowercase();

    let hint = if lower.contains("tab") {
        "Indent with spaces; YAML does not allow tabs."
    } else if lower.contains("duplicate key") {
        "Each key may appear once per component. Remove the duplicate."
    } else if lower.contains("unknown variant") {
        "Category must be one of Motors, Propellers, Frames, Power, Electronics, Sensors, Cameras, Accessories."
    } else if lower.contains("missing field") {
        "Placed components need instance_id, id, name, category and specs."
    } else if lower.contains("invalid id prefix") || lower.contains("invalid ulid") {
        "Instance ids look like PLC-01HQ3K8Z9X0000000000000000."
    } else if lower.contains("mapping values are not allowed") || lower.contains("unexpected ':'") {
        "Quote values that contain ':' and check the indentation of the line above."
    } else if lower.contains("expected block end") {
        "Indentation is inconsistent around this line."
    } else {
        return None;
    };
    Some(hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "name: a\ncolors:\n  motors: x";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 8);
        assert_eq!(line_col_to_offset(source, 3, 3), 18);
        // past the end clamps to the last byte
        assert_eq!(line_col_to_offset(source, 9, 1), source.len() - 1);
    }

    #[test]
    fn test_suggestions() {
        assert!(suggest("found character that cannot start any token: tab").is_some());
        assert!(suggest("components[0].category: unknown variant `Rotors`").is_some());
        assert!(suggest("missing field `instance_id`").is_some());
        assert!(suggest("something else entirely").is_none());
    }

    #[test]
    fn test_from_serde_error_points_into_source() {
        let source = "name: racer\ncreated: [unclosed\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "racer.drone.yaml");
        assert!(!diag.message().is_empty());
    }
}
