use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html, Selector};
use std::collections::VecDeque;

// ── Constants ────────────────────────────────────────────────────────────────

/// Elements whose text never counts as visible content.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

// ── Lazy statics ─────────────────────────────────────────────────────────────

static BODY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

static INLINE_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("document has no <body> element")]
    MissingBody,
}

// ── Block model ──────────────────────────────────────────────────────────────

/// One structural unit of page content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    BulletItem { text: String },
    NumberItem { text: String },
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Block::BulletItem { text: text.into() }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Block::NumberItem { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Block::Heading { text, .. }
            | Block::Paragraph { text }
            | Block::BulletItem { text }
            | Block::NumberItem { text } => text,
        }
    }
}

/// The closed set of tags the extractor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Heading(u8),
    Paragraph,
    BulletList,
    NumberedList,
    Other,
}

impl TagKind {
    fn of(name: &str) -> Self {
        match name {
            "h1" => TagKind::Heading(1),
            "h2" => TagKind::Heading(2),
            "h3" => TagKind::Heading(3),
            "p" => TagKind::Paragraph,
            "ul" => TagKind::BulletList,
            "ol" => TagKind::NumberedList,
            _ => TagKind::Other,
        }
    }
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Lazy depth-first walk over `<body>` yielding blocks in document order.
///
/// The walk visits every element below `<body>`, including the descendants of
/// matched elements. A list only contributes its direct `<li>` children; a
/// nested list is picked up again when the walk reaches it.
pub struct Blocks<'a> {
    elements: Box<dyn Iterator<Item = ElementRef<'a>> + 'a>,
    pending: VecDeque<Block>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        loop {
            if let Some(block) = self.pending.pop_front() {
                return Some(block);
            }

            let el = self.elements.next()?;
            match TagKind::of(el.value().name()) {
                TagKind::Heading(level) => return Some(Block::heading(level, visible_text(el))),
                TagKind::Paragraph => {
                    let text = visible_text(el);
                    if !text.is_empty() {
                        return Some(Block::paragraph(text));
                    }
                }
                TagKind::BulletList => {
                    self.pending
                        .extend(list_items(el).map(|item| Block::bullet(visible_text(item))));
                }
                TagKind::NumberedList => {
                    self.pending
                        .extend(list_items(el).map(|item| Block::number(visible_text(item))));
                }
                TagKind::Other => {}
            }
        }
    }
}

pub fn extract_blocks(document: &Html) -> Result<Blocks<'_>, ExtractionError> {
    let body = document
        .select(&BODY_SEL)
        .next()
        .ok_or(ExtractionError::MissingBody)?;

    Ok(Blocks {
        elements: Box::new(body.descendants().filter_map(ElementRef::wrap)),
        pending: VecDeque::new(),
    })
}

/// Every visible text node of the whole document, one per line.
pub fn raw_text(document: &Html) -> String {
    let mut parts = Vec::new();
    collect_text_nodes(document.root_element(), &mut parts);
    let joined = parts.join("\n");
    let lines = LINE_BREAK_RE.replace_all(&joined, "\n");
    INLINE_WS_RE.replace_all(&lines, " ").trim().to_string()
}

// ── DOM utility helpers ──────────────────────────────────────────────────────

fn list_items<'a>(list: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    list.children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
}

/// Concatenated descendant text with whitespace collapsed and trimmed.
fn visible_text(el: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    collect_text_nodes(el, &mut parts);
    normalize_text(&parts.concat())
}

/// Text nodes below `el` in document order, skipping hidden subtrees.
/// Walks with an explicit stack so nesting depth never touches the call stack.
fn collect_text_nodes<'a>(el: ElementRef<'a>, out: &mut Vec<&'a str>) {
    if HIDDEN_TAGS.contains(&el.value().name()) {
        return;
    }
    let mut stack = vec![el.children()];
    while let Some(children) = stack.last_mut() {
        let Some(child) = children.next() else {
            stack.pop();
            continue;
        };
        match child.value() {
            Node::Text(text) => out.push(&text.text),
            Node::Element(element) => {
                if !HIDDEN_TAGS.contains(&element.name()) {
                    stack.push(child.children());
                }
            }
            _ => {}
        }
    }
}

/// Collapse whitespace runs to a single space and trim.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
