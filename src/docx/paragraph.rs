//! WordprocessingML paragraphs and runs.
//!
//! A paragraph's text is the concatenation of its direct runs' text. Inside a
//! run, `w:t` contributes its content, `w:tab` a tab and `w:br`/`w:cr` a line
//! break; everything else (drawings, field chars) contributes nothing.
//!
//! Elements are matched by qualified name with the conventional `w:` prefix.
//! Word and LibreOffice always bind WordprocessingML to `w`; a part that binds
//! it to another prefix has no recognised paragraphs and is left untouched.

use super::xml::{Element, Node};

pub const W_BODY: &[u8] = b"w:body";
pub const W_P: &[u8] = b"w:p";
pub const W_R: &[u8] = b"w:r";
pub const W_T: &[u8] = b"w:t";
pub const W_TAB: &[u8] = b"w:tab";
pub const W_BR: &[u8] = b"w:br";
pub const W_CR: &[u8] = b"w:cr";
pub const W_RPR: &[u8] = b"w:rPr";
pub const W_TBL: &[u8] = b"w:tbl";
pub const W_TR: &[u8] = b"w:tr";
pub const W_TC: &[u8] = b"w:tc";

pub fn run_text(run: &Element) -> String {
    let mut text = String::new();
    for child in run.child_elements() {
        match child.name() {
            W_T => text.push_str(&child.text()),
            W_TAB => text.push('\t'),
            W_BR | W_CR => text.push('\n'),
            _ => {}
        }
    }
    text
}

/// Joined run text, or `None` when the paragraph has no runs
pub fn paragraph_text(paragraph: &Element) -> Option<String> {
    let mut runs = paragraph.children_named(W_R).peekable();
    runs.peek()?;
    Some(runs.map(run_text).collect())
}

/// Replace a run's content with `text`, keeping its formatting (`w:rPr`)
pub fn set_run_text(run: &mut Element, text: &str) {
    run.children
        .retain(|node| matches!(node, Node::Element(el) if el.is(W_RPR)));

    let mut pending = String::new();
    for c in text.chars() {
        match c {
            '\t' | '\n' => {
                flush_text(run, &mut pending);
                let name = if c == '\t' { "w:tab" } else { "w:br" };
                run.children.push(Node::Element(Element::new(name)));
            }
            _ => pending.push(c),
        }
    }
    flush_text(run, &mut pending);
}

fn flush_text(run: &mut Element, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let t = Element::new("w:t")
        .with_attribute("xml:space", "preserve")
        .with_text(std::mem::take(pending));
    run.children.push(Node::Element(t));
}

/// Empty every run and put `text` into the first one.
///
/// Formatting boundaries after the first run are lost; the runs themselves
/// stay in place so the paragraph keeps its shape.
pub fn set_paragraph_text(paragraph: &mut Element, text: &str) {
    let mut first = true;
    for run in paragraph.children_named_mut(W_R) {
        set_run_text(run, if first { text } else { "" });
        first = false;
    }
}

/// Paragraphs of a document body: top-level paragraphs first, then each
/// top-level table's cells row by row.
pub fn body_paragraphs(body: &Element) -> Vec<&Element> {
    let mut paragraphs: Vec<&Element> = body.children_named(W_P).collect();
    for table in body.children_named(W_TBL) {
        for row in table.children_named(W_TR) {
            for cell in row.children_named(W_TC) {
                paragraphs.extend(cell.children_named(W_P));
            }
        }
    }
    paragraphs
}

pub fn body_paragraphs_mut(body: &mut Element) -> Vec<&mut Element> {
    let mut paragraphs = Vec::new();
    let mut cell_paragraphs = Vec::new();
    for child in body.child_elements_mut() {
        if child.is(W_P) {
            paragraphs.push(child);
        } else if child.is(W_TBL) {
            for row in child.children_named_mut(W_TR) {
                for cell in row.children_named_mut(W_TC) {
                    cell_paragraphs.extend(cell.children_named_mut(W_P));
                }
            }
        }
    }
    paragraphs.extend(cell_paragraphs);
    paragraphs
}
