//! Inline span tokenizer for `**bold**`, `*italic*` and `` `code` ``
//!
//! Spans are resolved in three passes, bold first, then italic, then code.
//! Each pass only looks at literal text left by the passes before it, so a
//! later span can sit inside an earlier one but never straddle its edge.

/// One inline node of a rendered line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Code(String),
}

impl Inline {
    /// Text without any markup, like a DOM node's `textContent`
    pub fn text_content(&self) -> String {
        match self {
            Inline::Text(text) | Inline::Code(text) => text.clone(),
            Inline::Strong(children) | Inline::Emphasis(children) => text_content(children),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children) => {
                out.push_str("<strong>");
                children.iter().for_each(|child| child.write_html(out));
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                children.iter().for_each(|child| child.write_html(out));
                out.push_str("</em>");
            }
            Inline::Code(text) => {
                out.push_str(r#"<code class="md-code">"#);
                out.push_str(text);
                out.push_str("</code>");
            }
        }
    }
}

/// Concatenated `textContent` of a node list
pub fn text_content(nodes: &[Inline]) -> String {
    nodes.iter().map(Inline::text_content).collect()
}

/// Tokenize one line into inline nodes
pub fn tokenize(line: &str) -> Vec<Inline> {
    let bold: Vec<Inline> = split_spans(line, "**")
        .into_iter()
        .map(|piece| match piece {
            Piece::Plain(text) => Inline::Text(text.to_string()),
            Piece::Span(text) => strong(text),
        })
        .collect();

    let italic = expand_text(bold, "*", emphasis);
    expand_text(italic, "`", code)
}

/// Render inline nodes as HTML. Text is emitted verbatim, not escaped.
pub fn render_inline(nodes: &[Inline]) -> String {
    let mut out = String::new();
    nodes.iter().for_each(|node| node.write_html(&mut out));
    out
}

/// Tokenize and render a single line
pub fn format_inline(line: &str) -> String {
    render_inline(&tokenize(line))
}

enum Piece<'a> {
    Plain(&'a str),
    Span(&'a str),
}

/// Split on non-greedy `marker content marker` spans with non-empty content.
///
/// When the first opening marker has no closing partner, no later opener can
/// have one either, so scanning stops there.
fn split_spans<'a>(text: &'a str, marker: &str) -> Vec<Piece<'a>> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(marker) {
        let content_start = open + marker.len();
        let Some(first) = rest[content_start..].chars().next() else {
            break;
        };
        let search_from = content_start + first.len_utf8();
        let Some(close_offset) = rest[search_from..].find(marker) else {
            break;
        };
        let close = search_from + close_offset;

        if open > 0 {
            pieces.push(Piece::Plain(&rest[..open]));
        }
        pieces.push(Piece::Span(&rest[content_start..close]));
        rest = &rest[close + marker.len()..];
    }

    if !rest.is_empty() {
        pieces.push(Piece::Plain(rest));
    }
    pieces
}

/// Run one span pass over every literal text node, at any depth
fn expand_text(nodes: Vec<Inline>, marker: &str, wrap: fn(&str) -> Inline) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Text(text) => {
                for piece in split_spans(&text, marker) {
                    match piece {
                        Piece::Plain(plain) => out.push(Inline::Text(plain.to_string())),
                        Piece::Span(span) => out.push(wrap(span)),
                    }
                }
            }
            Inline::Strong(children) => out.push(Inline::Strong(expand_text(children, marker, wrap))),
            Inline::Emphasis(children) => {
                out.push(Inline::Emphasis(expand_text(children, marker, wrap)))
            }
            code @ Inline::Code(_) => out.push(code),
        }
    }
    out
}

fn strong(text: &str) -> Inline {
    Inline::Strong(vec![Inline::Text(text.to_string())])
}

fn emphasis(text: &str) -> Inline {
    Inline::Emphasis(vec![Inline::Text(text.to_string())])
}

fn code(text: &str) -> Inline {
    Inline::Code(text.to_string())
}
