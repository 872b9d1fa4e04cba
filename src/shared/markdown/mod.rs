//! Lightweight markdown for model replies
//!
//! Supports pipe tables, `#`..`###` headings and inline bold, italic and code
//! spans. Rendering happens in a fixed order: tables over the whole text, then
//! headings, then inline spans on whatever is left. The output is raw HTML and
//! is NOT escaped.

pub mod copy;
pub mod inline;
pub mod table;

pub use copy::to_markdown;
pub use inline::{Inline, format_inline};
pub use table::{Segment, TableBlock, TableParser};

/// One row of a table, one node list per cell
pub type TableCells = Vec<Vec<Inline>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: TableCells,
    pub body: Vec<TableCells>,
}

impl From<&TableBlock> for Table {
    fn from(block: &TableBlock) -> Self {
        let cells = |row: &[String]| -> TableCells {
            row.iter().map(|cell| inline::tokenize(cell)).collect()
        };
        Self {
            header: cells(block.header()),
            body: block.body().iter().map(|row| cells(row.as_slice())).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Any line that is neither a heading nor part of a table
    Line(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let blocks = table::split_segments(text)
            .iter()
            .map(|segment| match segment {
                Segment::Table(block) => Block::Table(Table::from(block)),
                Segment::Line(line) => match heading(line) {
                    Some((level, content)) => Block::Heading {
                        level,
                        content: inline::tokenize(content),
                    },
                    None => Block::Line(inline::tokenize(line)),
                },
            })
            .collect();
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn to_html(&self) -> String {
        self.blocks
            .iter()
            .map(block_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Source-like text for the clipboard
    pub fn to_markdown(&self) -> String {
        copy::to_markdown(self)
    }
}

/// Render a whole reply to HTML
pub fn render_markdown(text: &str) -> String {
    Document::parse(text).to_html()
}

/// Longest prefix wins so `### a` is never read as a level 1 heading
fn heading(line: &str) -> Option<(u8, &str)> {
    [(3, "### "), (2, "## "), (1, "# ")]
        .into_iter()
        .find_map(|(level, prefix)| {
            line.strip_prefix(prefix)
                .filter(|content| !content.is_empty())
                .map(|content| (level, content))
        })
}

fn block_html(block: &Block) -> String {
    match block {
        Block::Line(nodes) => inline::render_inline(nodes),
        Block::Heading { level, content } => format!(
            r#"<h{level} class="md-h{level}">{}</h{level}>"#,
            inline::render_inline(content)
        ),
        Block::Table(table) => table_html(table),
    }
}

fn table_html(table: &Table) -> String {
    let mut html = String::from(r#"<table class="md-table"><thead><tr>"#);
    for cell in &table.header {
        html.push_str(r#"<th class="md-th">"#);
        html.push_str(&inline::render_inline(cell));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead>");

    if !table.body.is_empty() {
        html.push_str("<tbody>");
        for row in &table.body {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(r#"<td class="md-td">"#);
                html.push_str(&inline::render_inline(cell));
                html.push_str("</td>");
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody>");
    }

    html.push_str("</table>");
    html
}
