//! Response normalization
//!
//! Different backend versions put the answer in different places. Each
//! known shape is a variant of `ResponseShape`; they are probed in priority
//! order and the first non-empty string wins. The winning text is then
//! stripped of trailing metadata and any bibliography the model appended.

use serde_json::Value;

/// Headings that introduce a reference list
const BIBLIOGRAPHY_HEADINGS: &[&str] = &[
    "references",
    "reference",
    "bibliography",
    "works cited",
    "daftar pustaka",
    "referensi",
];

/// Line prefixes of metadata footers some backends append
const METADATA_PREFIXES: &[&str] = &["sources:", "source:", "confidence:", "model:", "tokens:"];

/// Nesting limit for JSON-encoded answers inside `result.content[0].text`
const MAX_NESTED_DEPTH: usize = 2;

/// Known places an answer can appear in a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{ "answer": "..." }`
    Answer,
    /// `{ "content": "..." }`
    Content,
    /// `{ "text": "..." }`
    Text,
    /// `{ "result": { "content": [ { "text": "..." } ] } }`, text possibly JSON-encoded
    NestedResult,
}

impl ResponseShape {
    /// Probe order
    pub const ALL: [ResponseShape; 4] = [
        ResponseShape::Answer,
        ResponseShape::Content,
        ResponseShape::Text,
        ResponseShape::NestedResult,
    ];

    fn extract(self, value: &Value, depth: usize) -> Option<String> {
        match self {
            ResponseShape::Answer => non_empty_str(value.get("answer")?),
            ResponseShape::Content => non_empty_str(value.get("content")?),
            ResponseShape::Text => non_empty_str(value.get("text")?),
            ResponseShape::NestedResult => {
                let text = non_empty_str(value.get("result")?.get("content")?.get(0)?.get("text")?)?;
                if depth < MAX_NESTED_DEPTH
                    && let Ok(inner) = serde_json::from_str::<Value>(&text)
                    && inner.is_object()
                {
                    return probe(&inner, depth + 1).map(|(_, text)| text);
                }
                Some(text)
            }
        }
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn probe(value: &Value, depth: usize) -> Option<(ResponseShape, String)> {
    ResponseShape::ALL
        .into_iter()
        .find_map(|shape| shape.extract(value, depth).map(|text| (shape, text)))
}

/// Find the answer in a response body and return it cleaned up
///
/// Returns `None` when no shape yields text, or the text is empty after
/// cleanup.
pub fn extract_answer(value: &Value) -> Option<String> {
    let (shape, raw) = probe(value, 0)?;
    log::debug!("Answer found via {:?}", shape);

    let cleaned = strip_bibliography(&strip_trailing_metadata(&raw));
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Drop trailing metadata footers: HTML comments, `[[meta ...]]` blocks and
/// `Sources:`-style lines
pub fn strip_trailing_metadata(text: &str) -> String {
    let mut text = text.trim_end().to_string();

    loop {
        if text.ends_with("-->")
            && let Some(start) = text.rfind("<!--")
        {
            text.truncate(start);
            text = text.trim_end().to_string();
            continue;
        }

        // Only a block opening its own line; `[[links]]` inside prose stay
        if text.ends_with("]]")
            && let Some(start) = text.rfind("[[")
            && (start == 0 || text[..start].ends_with('\n'))
        {
            text.truncate(start);
            text = text.trim_end().to_string();
            continue;
        }

        let last_line_start = text.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let last_line = text[last_line_start..].trim().to_lowercase();
        if last_line_start > 0 && METADATA_PREFIXES.iter().any(|p| last_line.starts_with(p)) {
            text.truncate(last_line_start);
            text = text.trim_end().to_string();
            continue;
        }

        break;
    }

    text
}

/// Cut everything from a trailing reference-list heading onwards
pub fn strip_bibliography(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let heading_line = lines
        .iter()
        .rposition(|line| is_bibliography_heading(line))
        .filter(|&idx| idx > 0);

    match heading_line {
        Some(idx) => lines[..idx].join("\n").trim_end().to_string(),
        None => text.to_string(),
    }
}

fn is_bibliography_heading(line: &str) -> bool {
    let label = line
        .trim()
        .trim_start_matches('#')
        .trim_matches(|c: char| c == '*' || c == '_' || c == ':' || c.is_whitespace())
        .to_lowercase();
    BIBLIOGRAPHY_HEADINGS.contains(&label.as_str())
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod response_tests;
