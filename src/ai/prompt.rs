//! Prompt template generation
//!
//! Builds the question sent to the generation endpoint from the cursor
//! context, the user's topic and the requested behavior. Each context type
//! has its own template; getting the classification right matters more than
//! anything else for the quality of what comes back.

use std::fmt;
use std::str::FromStr;

use super::context::{ContextType, CursorContext};

/// Where generated text lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Behavior {
    /// Replace the whole document
    Rewrite,
    /// Insert at the cursor
    #[default]
    Add,
    /// Same placement as `Add`, kept for the slash-menu command name
    Cursor,
    /// Insert under the heading that governs the cursor
    ContentCursor,
}

impl Behavior {
    pub fn as_str(self) -> &'static str {
        match self {
            Behavior::Rewrite => "rewrite",
            Behavior::Add => "add",
            Behavior::Cursor => "cursor",
            Behavior::ContentCursor => "content_cursor",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Behavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rewrite" => Ok(Behavior::Rewrite),
            "add" => Ok(Behavior::Add),
            "cursor" => Ok(Behavior::Cursor),
            "content_cursor" | "content-cursor" => Ok(Behavior::ContentCursor),
            other => Err(format!(
                "unknown behavior '{}' (expected rewrite, add, cursor or content_cursor)",
                other
            )),
        }
    }
}

/// Build the prompt for a generation request
pub fn build_prompt(context: &CursorContext, topic: &str, behavior: Behavior) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an academic writing assistant embedded in a document editor.\n");
    prompt.push_str("Write in a formal academic register. Return only the text to insert, ");
    prompt.push_str("without preamble, without repeating headings, and without a reference list.\n\n");

    let topic = topic.trim();
    if !topic.is_empty() {
        prompt.push_str("## Topic\n");
        prompt.push_str(topic);
        prompt.push_str("\n\n");
    }

    if behavior == Behavior::Rewrite {
        push_rewrite_instructions(&mut prompt, context);
        return prompt;
    }

    if !context.preceding.is_empty() {
        prompt.push_str("## Preceding Context\n");
        prompt.push_str(&context.preceding);
        prompt.push_str("\n\n");
    }

    prompt.push_str("## Task\n");
    match context.context_type {
        ContextType::Judul => push_heading_task(&mut prompt, context, behavior),
        ContextType::UnderJudul => push_under_heading_task(&mut prompt, context),
        ContextType::Paragraph => push_paragraph_task(&mut prompt, context, behavior),
        ContextType::List => push_list_task(&mut prompt, context),
        ContextType::General => push_general_task(&mut prompt, context),
    }

    prompt
}

fn push_rewrite_instructions(prompt: &mut String, context: &CursorContext) {
    prompt.push_str("## Task\n");
    prompt.push_str("Write a complete document on the topic above, replacing the current draft.\n");
    prompt.push_str("Use markdown headings (#, ##) for sections and plain paragraphs for body text.\n");
    if let Some(heading) = &context.heading {
        prompt.push_str(&format!(
            "The current draft has a section titled \"{}\"; keep a section with that title.\n",
            heading.text
        ));
    }
}

fn push_heading_task(prompt: &mut String, context: &CursorContext, behavior: Behavior) {
    let title = &context.current_text;
    prompt.push_str(&format!(
        "The cursor is on the heading \"{}\" (level {}).\n",
        title,
        context.heading.as_ref().map(|h| h.level).unwrap_or(1)
    ));
    prompt.push_str("Write the opening paragraph of this section. ");
    prompt.push_str("Do not restate the heading itself.\n");
    if behavior == Behavior::ContentCursor {
        prompt.push_str("The text will be placed directly below the heading.\n");
    }
}

fn push_under_heading_task(prompt: &mut String, context: &CursorContext) {
    let title = context
        .heading
        .as_ref()
        .map(|h| h.text.as_str())
        .unwrap_or_default();
    prompt.push_str(&format!(
        "The cursor is in the first, still empty paragraph under the heading \"{}\".\n",
        title
    ));
    prompt.push_str("Write one or two paragraphs that open this section and match its title.\n");
}

fn push_paragraph_task(prompt: &mut String, context: &CursorContext, behavior: Behavior) {
    if let Some(heading) = &context.heading {
        prompt.push_str(&format!("Section: \"{}\".\n", heading.text));
    }

    let current = context.current_text.trim();
    if current.is_empty() {
        prompt.push_str("Write the next paragraph of this section.\n");
    } else {
        prompt.push_str("Continue the following paragraph seamlessly, starting exactly where it stops:\n");
        prompt.push_str(&format!("\"{}\"\n", current));
        prompt.push_str("Do not repeat the existing text.\n");
    }

    if behavior == Behavior::ContentCursor {
        prompt.push_str("The text will be placed under the section heading.\n");
    }
}

fn push_list_task(prompt: &mut String, context: &CursorContext) {
    prompt.push_str("The cursor is inside a list item");
    if let Some(heading) = &context.heading {
        prompt.push_str(&format!(" in the section \"{}\"", heading.text));
    }
    prompt.push_str(".\n");
    let current = context.current_text.trim();
    if !current.is_empty() {
        prompt.push_str(&format!("Current item: \"{}\"\n", current));
    }
    prompt.push_str("Complete this item in one concise sentence that fits the list.\n");
}

fn push_general_task(prompt: &mut String, context: &CursorContext) {
    prompt.push_str("Write a short, self-contained paragraph on the topic");
    if let Some(heading) = &context.heading {
        prompt.push_str(&format!(" for the section \"{}\"", heading.text));
    }
    prompt.push_str(".\n");
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod prompt_tests;
