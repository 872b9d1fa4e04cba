//! Pipe table detection
//!
//! Lines are fed one at a time through a two-state machine. Consecutive
//! candidate rows collapse into a single [`TableBlock`]; everything else is
//! passed through as a [`Segment::Line`] at its original position.

/// Rows of trimmed, non-empty cell strings. Row 0 is the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    rows: Vec<Vec<String>>,
}

impl TableBlock {
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Output of the table pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Line(String),
    Table(TableBlock),
}

#[derive(Debug, Default)]
enum State {
    #[default]
    OutsideTable,
    InsideTable(Vec<Vec<String>>),
}

#[derive(Debug, Default)]
pub struct TableParser {
    state: State,
    segments: Vec<Segment>,
}

impl TableParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if !trimmed.contains('|') {
            self.close_table();
            self.segments.push(Segment::Line(line.to_string()));
            return;
        }

        let cells = split_row(trimmed);
        if is_separator(&cells) {
            return;
        }

        if let State::InsideTable(rows) = &mut self.state {
            rows.push(cells);
        } else {
            self.state = State::InsideTable(vec![cells]);
        }
    }

    pub fn finish(mut self) -> Vec<Segment> {
        self.close_table();
        self.segments
    }

    fn close_table(&mut self) {
        if let State::InsideTable(rows) = std::mem::take(&mut self.state) {
            // Entering InsideTable always carries a row, guard anyway
            if !rows.is_empty() {
                self.segments.push(Segment::Table(TableBlock { rows }));
            }
        }
    }
}

/// Split a whole text blob into lines and tables
pub fn split_segments(text: &str) -> Vec<Segment> {
    let mut parser = TableParser::new();
    text.split('\n').for_each(|line| parser.push_line(line));
    parser.finish()
}

fn split_row(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every cell is made of `-` and `:` only. A row with no cells counts too.
fn is_separator(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|cell| cell.chars().all(|c| c == '-' || c == ':'))
}
