//! Rebuild markdown-like source text from a parsed [`Document`]
//!
//! Nested markup collapses to the text of the outermost span, so
//! `**a *b***` comes back as `**a b**`. Literal markers that never became
//! spans are copied as plain text.

use super::inline::Inline;
use super::{Block, Document, TableCells};

pub fn to_markdown(document: &Document) -> String {
    let mut out = String::new();
    for (index, block) in document.blocks().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_block(block, &mut out);
    }
    out.trim().to_string()
}

fn write_block(block: &Block, out: &mut String) {
    match block {
        Block::Line(nodes) => nodes.iter().for_each(|node| write_inline(node, out)),
        Block::Heading { content, .. } => {
            out.push('\n');
            out.push_str(&super::inline::text_content(content));
            out.push('\n');
        }
        Block::Table(table) => {
            write_row(&table.header, out);
            out.push_str(&vec!["---"; table.header.len()].join("\t"));
            out.push('\n');
            table.body.iter().for_each(|row| write_row(row, out));
        }
    }
}

fn write_row(cells: &TableCells, out: &mut String) {
    let texts: Vec<String> = cells
        .iter()
        .map(|cell| super::inline::text_content(cell).trim().to_string())
        .collect();
    out.push_str(&texts.join("\t"));
    out.push('\n');
}

fn write_inline(node: &Inline, out: &mut String) {
    match node {
        Inline::Text(text) => out.push_str(text),
        Inline::Strong(_) => {
            out.push_str("**");
            out.push_str(&node.text_content());
            out.push_str("**");
        }
        Inline::Emphasis(_) => {
            out.push('*');
            out.push_str(&node.text_content());
            out.push('*');
        }
        Inline::Code(text) => {
            out.push('`');
            out.push_str(text);
            out.push('`');
        }
    }
}
