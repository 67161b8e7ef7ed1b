//! Tests for prompt generation

use super::*;
use crate::ai::context::analyze;
use crate::document::{Block, Document};
use insta::assert_snapshot;

fn context_for(blocks: Vec<Block>, cursor: &str) -> CursorContext {
    let document = Document::new(blocks);
    analyze(&document, cursor).unwrap()
}

#[test]
fn test_under_heading_prompt_snapshot() {
    let context = context_for(
        vec![
            Block::heading("Introduction", 1).with_id("h"),
            Block::empty_paragraph().with_id("p"),
        ],
        "p",
    );

    let prompt = build_prompt(&context, "Graph neural networks", Behavior::Add);
    assert_snapshot!(prompt.trim_end(), @r#"
    You are an academic writing assistant embedded in a document editor.
    Write in a formal academic register. Return only the text to insert, without preamble, without repeating headings, and without a reference list.

    ## Topic
    Graph neural networks

    ## Preceding Context
    # Introduction

    ## Task
    The cursor is in the first, still empty paragraph under the heading "Introduction".
    Write one or two paragraphs that open this section and match its title.
    "#);
}

#[test]
fn test_heading_prompt_mentions_heading() {
    let context = context_for(vec![Block::heading("Methods", 2).with_id("h")], "h");
    let prompt = build_prompt(&context, "", Behavior::ContentCursor);

    assert!(prompt.contains("The cursor is on the heading \"Methods\" (level 2)"));
    assert!(prompt.contains("placed directly below the heading"));
    assert!(!prompt.contains("## Topic"));
}

#[test]
fn test_paragraph_prompt_continues_existing_text() {
    let context = context_for(
        vec![
            Block::heading("Results", 1),
            Block::paragraph("Accuracy improved by").with_id("p"),
        ],
        "p",
    );
    let prompt = build_prompt(&context, "benchmarks", Behavior::Cursor);

    assert!(prompt.contains("Continue the following paragraph"));
    assert!(prompt.contains("\"Accuracy improved by\""));
    assert!(prompt.contains("Section: \"Results\""));
}

#[test]
fn test_list_prompt() {
    let context = context_for(
        vec![Block::heading("Steps", 1), Block::bullet("Collect data").with_id("b")],
        "b",
    );
    let prompt = build_prompt(&context, "", Behavior::Add);

    assert!(prompt.contains("inside a list item in the section \"Steps\""));
    assert!(prompt.contains("Current item: \"Collect data\""));
}

#[test]
fn test_rewrite_prompt_ignores_cursor_task() {
    let context = context_for(
        vec![Block::heading("Draft", 1), Block::paragraph("old").with_id("p")],
        "p",
    );
    let prompt = build_prompt(&context, "Climate models", Behavior::Rewrite);

    assert!(prompt.contains("replacing the current draft"));
    assert!(prompt.contains("section titled \"Draft\""));
    assert!(!prompt.contains("Continue the following paragraph"));
    assert!(!prompt.contains("## Preceding Context"));
}

#[test]
fn test_behavior_from_str() {
    assert_eq!("rewrite".parse::<Behavior>(), Ok(Behavior::Rewrite));
    assert_eq!("ADD".parse::<Behavior>(), Ok(Behavior::Add));
    assert_eq!("content-cursor".parse::<Behavior>(), Ok(Behavior::ContentCursor));
    assert_eq!("content_cursor".parse::<Behavior>(), Ok(Behavior::ContentCursor));
    assert!("sideways".parse::<Behavior>().is_err());
}

#[test]
fn test_behavior_display_round_trips() {
    for behavior in [
        Behavior::Rewrite,
        Behavior::Add,
        Behavior::Cursor,
        Behavior::ContentCursor,
    ] {
        assert_eq!(behavior.to_string().parse::<Behavior>(), Ok(behavior));
    }
}
