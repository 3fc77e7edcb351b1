//! Post-processing of model output into renderable Mermaid text.

mod pert;

use std::error::Error;
use std::fmt;

use crate::api::ChartEnvelope;
use crate::chart::ChartType;

pub use pert::{rewrite_pert, PertEdge, PertGraph, PertNode};

const FENCE: &str = "```";

/// Placeholder the model has been seen to leave behind verbatim.
pub const PLACEHOLDER: &str = "\"remove this\"";

#[derive(Debug)]
pub enum NormalizeError {
    Envelope(serde_json::Error),
    Unsuccessful { message: Option<String> },
    DanglingEdge { from: String, to: String },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope(err) => write!(f, "response is not a chart envelope: {err}"),
            Self::Unsuccessful { message: Some(message) } => {
                write!(f, "relay reported failure: {message}")
            }
            Self::Unsuccessful { message: None } => write!(f, "relay returned no chart code"),
            Self::DanglingEdge { from, to } => {
                write!(f, "edge {from} --> {to} targets an undeclared task")
            }
        }
    }
}

impl Error for NormalizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Envelope(err) => Some(err),
            _ => None,
        }
    }
}

/// Turn a raw relay response body into diagram text for `chart_type`.
pub fn normalize(raw_envelope: &str, chart_type: ChartType) -> Result<String, NormalizeError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(raw_envelope).map_err(NormalizeError::Envelope)?;

    let code = match envelope.mermaid_code {
        Some(code) if envelope.success && !code.is_empty() => code,
        _ => {
            return Err(NormalizeError::Unsuccessful {
                message: envelope.message,
            })
        }
    };

    normalize_code(&code, chart_type)
}

/// Same as [`normalize`] but starting from already-unwrapped model text.
pub fn normalize_code(code: &str, chart_type: ChartType) -> Result<String, NormalizeError> {
    let mut code = remove_placeholder(&strip_fences(code));

    if chart_type == ChartType::Pert {
        code = rewrite_pert(&code)?;
    }

    Ok(ensure_keyword(&code, chart_type))
}

/// Remove wrapping markdown code fences and surrounding whitespace.
///
/// Nested fences are peeled until none remain, so a second pass is a no-op.
pub fn strip_fences(text: &str) -> String {
    let mut code = text.trim();

    loop {
        let mut next = code;
        if let Some(rest) = next.strip_prefix(FENCE) {
            // the rest of the opening line is the language tag
            next = rest.split_once('\n').map_or("", |(_, body)| body);
        }
        if let Some(rest) = next.strip_suffix(FENCE) {
            next = rest;
        }
        let next = next.trim();
        if next == code {
            return code.to_string();
        }
        code = next;
    }
}

pub fn remove_placeholder(text: &str) -> String {
    text.replace(PLACEHOLDER, "")
}

/// Prefix the chart keyword on its own line unless the text already starts with it.
pub fn ensure_keyword(text: &str, chart_type: ChartType) -> String {
    let keyword = chart_type.keyword();
    if text.starts_with(keyword) {
        text.to_string()
    } else {
        format!("{keyword}\n{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(code: &str) -> String {
        serde_json::to_string(&ChartEnvelope::generated(code)).unwrap()
    }

    #[test]
    fn strips_language_fence() {
        let text = "```mermaid\ngantt\n  title Plan\n```";
        assert_eq!(strip_fences(text), "gantt\n  title Plan");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        assert_eq!(strip_fences("  ```\ngantt\n```  \n"), "gantt");
    }

    #[test]
    fn fence_stripping_is_idempotent() {
        for text in [
            "```mermaid\ngantt\n```",
            "```mermaid\n```mermaid\ngantt\n```\n```",
            "gantt\n  section A",
            "```",
            "```mermaid",
            "",
        ] {
            let once = strip_fences(text);
            assert_eq!(strip_fences(&once), once, "input: {text:?}");
        }
    }

    #[test]
    fn removes_every_placeholder() {
        assert_eq!(
            remove_placeholder("a \"remove this\" b\"remove this\""),
            "a  b"
        );
    }

    #[test]
    fn keeps_text_that_already_has_keyword() {
        let raw = envelope("```mermaid\ngantt\n  title Launch\n```");

        assert_eq!(
            normalize(&raw, ChartType::Gantt).unwrap(),
            "gantt\n  title Launch"
        );
    }

    #[test]
    fn prepends_keyword_exactly_once() {
        let once = ensure_keyword("title Launch", ChartType::Gantt);
        let twice = ensure_keyword(&once, ChartType::Gantt);

        assert_eq!(once, "gantt\ntitle Launch");
        assert_eq!(twice, once);
    }

    #[test]
    fn normalizing_normalized_gantt_is_stable() {
        let first = normalize_code("title Launch", ChartType::Gantt).unwrap();
        let second = normalize_code(&first, ChartType::Gantt).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn pert_output_is_rewritten_then_prefixed() {
        let raw = envelope("```mermaid\nA: 3\nB: 2\nA --> B\n```");

        let out = normalize(&raw, ChartType::Pert).unwrap();

        assert!(out.starts_with("pert\ngraph LR\n"));
        assert!(out.contains("    A[A]\n"));
        assert!(out.contains("    B[B]\n"));
        assert!(out.contains("    A --> B\n"));
        assert!(out.contains("    A -- 2d --> B\n"));
    }

    #[test]
    fn pert_dangling_edge_is_an_error() {
        let raw = envelope("A: 3\nA --> Missing");

        let err = normalize(&raw, ChartType::Pert).unwrap_err();

        assert!(matches!(err, NormalizeError::DanglingEdge { .. }));
    }

    #[test]
    fn unsuccessful_envelope_is_rejected() {
        let raw = r#"{"success":false,"message":"Error generating chart code."}"#;

        let err = normalize(raw, ChartType::Gantt).unwrap_err();

        assert!(matches!(
            err,
            NormalizeError::Unsuccessful { message: Some(ref m) } if m == "Error generating chart code."
        ));
    }

    #[test]
    fn missing_code_is_rejected() {
        let err = normalize(r#"{"success":true}"#, ChartType::Gantt).unwrap_err();
        assert!(matches!(err, NormalizeError::Unsuccessful { message: None }));
    }

    #[test]
    fn non_json_is_rejected() {
        let err = normalize("<html>bad gateway</html>", ChartType::Gantt).unwrap_err();
        assert!(matches!(err, NormalizeError::Envelope(_)));
        assert!(err.source().is_some());
    }
}
