//! # Highlighter
//!
//! Regex-driven token highlighting for config files.
//!
//! Highlighting is an interval merge: each rule of the format's table runs
//! over the raw text in table order and claims the spans it matches. Text
//! claimed by an earlier rule is invisible to later ones: a match that
//! overlaps a claim is dropped and the search resumes past the claim (or one
//! character further when the match began in unclaimed text), so a rejected
//! match never hides tokens after it. The text is then walked
//! once, emitting escaped plain runs and escaped token runs in position
//! order. Escaping happens on output, so no rule can inject markup.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::syntax::rules::{rules_for, Token};

/// A claimed byte range of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub token: Token,
}

/// A run of source text, highlighted or plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub token: Option<Token>,
}

/// Escape `&`, `<` and `>` for inclusion in markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn overlaps_claimed(claimed: &BTreeMap<usize, (usize, Token)>, range: &Range<usize>) -> bool {
    // Claimed ranges never overlap each other, so only the last one starting
    // before `range.end` can reach into `range`.
    claimed
        .range(..range.end)
        .next_back()
        .is_some_and(|(_, (end, _))| *end > range.start)
}

/// End of the claimed span containing `pos`, if any.
fn claim_containing(claimed: &BTreeMap<usize, (usize, Token)>, pos: usize) -> Option<usize> {
    claimed
        .range(..=pos)
        .next_back()
        .map(|(_, (end, _))| *end)
        .filter(|end| *end > pos)
}

/// Byte offset of the char after the one starting at `pos`.
fn next_char(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(pos + 1, |c| pos + c.len_utf8())
}

/// Compute the non-overlapping token spans of `text`, sorted by position.
pub fn spans(text: &str, format: &str) -> Vec<Span> {
    let mut claimed: BTreeMap<usize, (usize, Token)> = BTreeMap::new();

    for rule in rules_for(format) {
        let mut pos = 0;
        while pos <= text.len() {
            let Some(caps) = rule.pattern.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let range = caps.name("tok").unwrap_or(whole).range();

            if !range.is_empty() && !overlaps_claimed(&claimed, &range) {
                claimed.insert(range.start, (range.end, rule.token));
                pos = if whole.is_empty() {
                    next_char(text, whole.end())
                } else {
                    whole.end()
                };
                continue;
            }

            pos = match claim_containing(&claimed, whole.start()) {
                Some(end) => end,
                None if whole.start() < text.len() => next_char(text, whole.start()),
                None => break,
            };
        }
    }

    claimed
        .into_iter()
        .map(|(start, (end, token))| Span {
            range: start..end,
            token,
        })
        .collect()
}

/// Split `text` into plain and highlighted runs covering it exactly.
pub fn segments<'a>(text: &'a str, format: &str) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut pos = 0;

    for span in spans(text, format) {
        if span.range.start > pos {
            out.push(Segment {
                text: &text[pos..span.range.start],
                token: None,
            });
        }
        out.push(Segment {
            text: &text[span.range.clone()],
            token: Some(span.token),
        });
        pos = span.range.end;
    }
    if pos < text.len() {
        out.push(Segment {
            text: &text[pos..],
            token: None,
        });
    }

    out
}

/// Segments grouped by source line. Tokens spanning a newline (block
/// comments, multi-line strings) are split across the lines they touch.
/// The result always has [`line_count`] entries.
pub fn lines<'a>(text: &'a str, format: &str) -> Vec<Vec<Segment<'a>>> {
    let mut lines = vec![Vec::new()];

    for segment in segments(text, format) {
        for (i, piece) in segment.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !piece.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push(Segment {
                        text: piece,
                        token: segment.token,
                    });
                }
            }
        }
    }

    lines
}

/// Number of display lines in `text` (a trailing newline opens an empty line).
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Highlight `text` as markup: escaped text with tokens wrapped in
/// `<span class="hl-*">`.
pub fn highlight(text: &str, format: &str) -> String {
    let mut markup = String::with_capacity(text.len() + text.len() / 2);

    for segment in segments(text, format) {
        let escaped = escape_html(segment.text);
        match segment.token {
            Some(token) => {
                markup.push_str("<span class=\"");
                markup.push_str(token.css_class());
                markup.push_str("\">");
                markup.push_str(&escaped);
                markup.push_str("</span>");
            }
            None => markup.push_str(&escaped),
        }
    }

    markup
}

/// Line-number gutter markup: one `<span>n</span>` per display line.
pub fn gutter(text: &str) -> String {
    (1..=line_count(text))
        .map(|n| format!("<span>{n}</span>"))
        .collect()
}
