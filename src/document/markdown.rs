//! Markdown conversion
//!
//! Generated text comes back as lightweight markdown. Rewrites turn it into
//! blocks; export turns a document back into markdown for the CLI.

use super::{Block, BlockType, Document, InlineContent, InlineSpan, Styles, extract_text};

/// Parse generated markdown into blocks
///
/// Recognises `#` headings, `-`/`*` bullets, `1.` numbered items and
/// `- [ ]` check items. Consecutive plain lines are merged into one
/// paragraph; blank lines end a paragraph.
pub fn blocks_from_markdown(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(block) = parse_structural_line(line) {
            flush_paragraph(&mut paragraph, &mut blocks);
            blocks.push(block);
        } else {
            paragraph.push(line);
        }
    }
    flush_paragraph(&mut paragraph, &mut blocks);

    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    let joined = lines.join(" ");
    blocks.push(Block::new(BlockType::Paragraph, parse_inline(&joined)));
    lines.clear();
}

fn parse_structural_line(line: &str) -> Option<Block> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) && line[hashes..].starts_with(' ') {
        let mut block = Block::new(BlockType::Heading, parse_inline(line[hashes..].trim()));
        block.level = hashes.min(3) as u8;
        return Some(block);
    }

    for (prefix, checked) in [("- [ ] ", false), ("- [x] ", true), ("- [X] ", true)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            let block = Block::new(BlockType::CheckListItem, parse_inline(rest.trim()));
            return Some(block.with_checked(checked));
        }
    }

    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(Block::new(BlockType::BulletListItem, parse_inline(rest.trim())));
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && line[digits..].starts_with(". ") {
        return Some(Block::new(
            BlockType::NumberedListItem,
            parse_inline(line[digits + 2..].trim()),
        ));
    }

    None
}

/// Split a line into spans, honouring `**bold**`, `*italic*` and `` `code` ``
pub fn parse_inline(text: &str) -> Vec<InlineContent> {
    let mut spans = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let next = [("**", Marker::Bold), ("`", Marker::Code), ("*", Marker::Italic)]
            .into_iter()
            .filter_map(|(delim, marker)| {
                let start = rest.find(delim)?;
                let after = &rest[start + delim.len()..];
                let len = after.find(delim)?;
                (len > 0).then_some((start, delim, marker, len))
            })
            .min_by_key(|(start, delim, _, _)| (*start, usize::MAX - delim.len()));

        let Some((start, delim, marker, len)) = next else {
            push_span(&mut spans, rest, Styles::default());
            break;
        };

        push_span(&mut spans, &rest[..start], Styles::default());
        let inner_start = start + delim.len();
        push_span(&mut spans, &rest[inner_start..inner_start + len], marker.styles());
        rest = &rest[inner_start + len + delim.len()..];
    }

    spans
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Bold,
    Italic,
    Code,
}

impl Marker {
    fn styles(self) -> Styles {
        let mut styles = Styles::default();
        match self {
            Marker::Bold => styles.bold = true,
            Marker::Italic => styles.italic = true,
            Marker::Code => styles.code = true,
        }
        styles
    }
}

fn push_span(spans: &mut Vec<InlineContent>, text: &str, styles: Styles) {
    if !text.is_empty() {
        spans.push(InlineContent::Text(InlineSpan::styled(text, styles)));
    }
}

/// Render a document as markdown, one block per paragraph
pub fn to_markdown(document: &Document) -> String {
    let mut out = Vec::new();
    let mut number = 0;

    for block in document.blocks() {
        if block.block_type == BlockType::NumberedListItem {
            number += 1;
        } else {
            number = 0;
        }

        let text = extract_text(block);
        let line = match block.block_type {
            BlockType::Heading => format!("{} {}", "#".repeat(block.level.max(1) as usize), text),
            BlockType::BulletListItem => format!("- {}", text),
            BlockType::NumberedListItem => format!("{}. {}", number, text),
            BlockType::CheckListItem if block.checked => format!("- [x] {}", text),
            BlockType::CheckListItem => format!("- [ ] {}", text),
            BlockType::Paragraph if text.is_empty() => continue,
            BlockType::Paragraph => text,
            BlockType::Other => continue,
        };
        out.push(line);
    }

    out.join("\n\n")
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod markdown_tests;
