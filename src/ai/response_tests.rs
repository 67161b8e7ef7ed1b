//! Tests for response normalization

use super::*;
use serde_json::json;

#[test]
fn test_answer_field() {
    assert_eq!(
        extract_answer(&json!({"answer": "Hello world"})),
        Some("Hello world".to_string())
    );
}

#[test]
fn test_answer_takes_priority_over_content() {
    let body = json!({"content": "second", "answer": "first", "text": "third"});
    assert_eq!(extract_answer(&body), Some("first".to_string()));
}

#[test]
fn test_empty_answer_falls_through_to_content() {
    let body = json!({"answer": "   ", "content": "from content"});
    assert_eq!(extract_answer(&body), Some("from content".to_string()));
}

#[test]
fn test_non_string_answer_falls_through() {
    let body = json!({"answer": {"nested": true}, "text": "from text"});
    assert_eq!(extract_answer(&body), Some("from text".to_string()));
}

#[test]
fn test_nested_result_shape() {
    let body = json!({"result": {"content": [{"type": "text", "text": "nested answer"}]}});
    assert_eq!(extract_answer(&body), Some("nested answer".to_string()));
}

#[test]
fn test_nested_result_with_json_encoded_text() {
    let inner = json!({"answer": "decoded answer"}).to_string();
    let body = json!({"result": {"content": [{"text": inner}]}});
    assert_eq!(extract_answer(&body), Some("decoded answer".to_string()));
}

#[test]
fn test_nested_result_with_json_array_text_is_kept_verbatim() {
    let body = json!({"result": {"content": [{"text": "[1, 2]"}]}});
    assert_eq!(extract_answer(&body), Some("[1, 2]".to_string()));
}

#[test]
fn test_no_known_shape() {
    assert_eq!(extract_answer(&json!({"status": "ok"})), None);
    assert_eq!(extract_answer(&json!("bare string")), None);
    assert_eq!(extract_answer(&json!({"result": {"content": []}})), None);
}

#[test]
fn test_strips_trailing_bibliography() {
    let body = json!({
        "answer": "Body paragraph.\n\n## References\n1. Doe, J. (2020). A paper."
    });
    assert_eq!(extract_answer(&body), Some("Body paragraph.".to_string()));
}

#[test]
fn test_strips_bold_daftar_pustaka() {
    let text = "Isi tulisan.\n\n**Daftar Pustaka:**\n- Item";
    assert_eq!(strip_bibliography(text), "Isi tulisan.");
}

#[test]
fn test_bibliography_heading_only_answer_is_kept() {
    assert_eq!(strip_bibliography("References\nnothing else"), "References\nnothing else");
}

#[test]
fn test_reference_word_inside_sentence_is_not_a_heading() {
    let text = "See the references below for details.";
    assert_eq!(strip_bibliography(text), text);
}

#[test]
fn test_strips_html_comment_metadata() {
    let text = "Generated text.\n<!-- meta: {\"model\": \"x\"} -->";
    assert_eq!(strip_trailing_metadata(text), "Generated text.");
}

#[test]
fn test_strips_metadata_lines() {
    let text = "Generated text.\n\nSources: node-1, node-2\nConfidence: 0.82";
    assert_eq!(strip_trailing_metadata(text), "Generated text.");
}

#[test]
fn test_metadata_only_in_middle_is_kept() {
    let text = "Sources: are discussed here.\nAnd the text continues.";
    assert_eq!(strip_trailing_metadata(text), text);
}

#[test]
fn test_answer_consisting_only_of_metadata_is_none() {
    let body = json!({"answer": "<!-- meta -->"});
    assert_eq!(extract_answer(&body), None);
}

#[test]
fn test_metadata_then_bibliography_both_removed() {
    let body = json!({
        "content": "Main text here.\n\nBibliography\n- A\n<!-- trace-id: 42 -->"
    });
    assert_eq!(extract_answer(&body), Some("Main text here.".to_string()));
}

#[test]
fn test_strips_bracketed_meta_footer() {
    let body = json!({"answer": "Deep learning scales well.\n[[meta model=x tokens=42]]"});
    assert_eq!(
        extract_answer(&body),
        Some("Deep learning scales well.".to_string())
    );
}

#[test]
fn test_trailing_wiki_link_in_sentence_is_kept() {
    let text = "See also [[Graph theory]]";
    assert_eq!(strip_trailing_metadata(text), text);
}
