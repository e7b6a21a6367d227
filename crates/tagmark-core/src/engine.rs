use std::ops::Range;

use tracing::trace;

use crate::line::{Line, resolve_escapes};
use crate::search::{
    find_closing_paren, find_unescaped, find_unescaped_where, is_escaped, replace_first,
};
use crate::style::{AsymmetricOptions, StyleDescriptor, TARGET_PLACEHOLDER, TagShape};

/// How the end of a candidate span was located.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Terminator {
    /// A second copy of the indicator.
    Indicator,
    /// The character ending a bare word; it is re-emitted after the close markup.
    WordEnd(char),
    /// A bare word that runs to the end of the line, or up to a trailing lone escape marker.
    EndOfLine,
    /// The `)` matching a `(` directly after the indicator.
    Paren,
    /// `](destination)` of an explicit link; the field is the index of the final `)`.
    LinkDestination(usize),
}

/// Checks that can invalidate a candidate span.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Rule {
    /// Nothing between the delimiters.
    Empty,
    /// The indicator must start a word.
    Boundary,
    /// The content starts with the indicator's first character, so a later indicator in the
    /// same run should be used instead.
    Chained,
    /// Content starts or ends with whitespace. Never applied to parenthesised spans.
    WhitespaceEdge,
    /// Content is only fill characters and escape markers.
    FillOnly,
}

#[derive(Clone, Debug)]
struct Candidate {
    open: usize,
    content: Range<usize>,
    terminator: Terminator,
    target: Option<Range<usize>>,
}

enum Scan {
    Stop,
    Invalid { open: usize },
    Found(Candidate),
}

/// A style descriptor compiled for one pass over a document.
#[derive(Clone, Debug)]
pub struct TagEngine {
    indicator: Vec<char>,
    open: String,
    close: String,
    fill: Option<char>,
    shape: TagShape,
    rules: Vec<Rule>,
    escape: char,
}

impl TagEngine {
    pub fn new(style: &StyleDescriptor, escape: char) -> Self {
        let rules = match style.shape {
            TagShape::Symmetric => vec![Rule::Empty, Rule::Chained, Rule::WhitespaceEdge, Rule::FillOnly],
            TagShape::Asymmetric(options) => asymmetric_rules(options),
            TagShape::Link => vec![Rule::Empty, Rule::WhitespaceEdge, Rule::FillOnly],
        };
        Self {
            indicator: style.indicator.chars().collect(),
            open: style.open.clone(),
            close: style.close.clone(),
            fill: style.fill,
            shape: style.shape,
            rules,
            escape,
        }
    }

    /// Rewrites every valid span in the line, left to right, in a single pass.
    pub fn process_line(&self, line: &mut Line) {
        if self.indicator.is_empty() {
            return;
        }
        let buffer = line.buffer_mut();
        let mut index = 0usize;
        while index + self.min_remaining() <= buffer.len() {
            match self.scan(buffer, index) {
                Scan::Stop => break,
                Scan::Invalid { open } => index = open + 1,
                Scan::Found(candidate) => {
                    if self.is_valid(buffer, &candidate) {
                        index = self.apply(buffer, &candidate);
                    } else {
                        index = candidate.open + 1;
                    }
                }
            }
        }
    }

    fn min_remaining(&self) -> usize {
        match self.shape {
            TagShape::Symmetric => self.indicator.len() * 2,
            TagShape::Asymmetric(_) | TagShape::Link => self.indicator.len() + 1,
        }
    }

    fn retains_indicator(&self) -> bool {
        matches!(self.shape, TagShape::Asymmetric(options) if options.retain_indicator)
    }

    fn scan(&self, buffer: &[char], index: usize) -> Scan {
        let Some(open) = find_unescaped(buffer, &self.indicator, index, self.escape) else {
            return Scan::Stop;
        };
        let after = open + self.indicator.len();
        match self.shape {
            TagShape::Symmetric => {
                match find_unescaped(buffer, &self.indicator, after, self.escape) {
                    Some(close) => Scan::Found(Candidate {
                        open,
                        content: after..close,
                        terminator: Terminator::Indicator,
                        target: None,
                    }),
                    None => Scan::Stop,
                }
            }
            TagShape::Asymmetric(_) => {
                if after >= buffer.len() {
                    return Scan::Stop;
                }
                if buffer[after] == '(' {
                    return match find_closing_paren(buffer, after, self.escape) {
                        Some(close) => Scan::Found(Candidate {
                            open,
                            content: after + 1..close,
                            terminator: Terminator::Paren,
                            target: None,
                        }),
                        None => Scan::Invalid { open },
                    };
                }
                let candidate = match find_unescaped_where(buffer, after, self.escape, ends_word) {
                    Some(end) => Candidate {
                        open,
                        content: after..end,
                        terminator: Terminator::WordEnd(buffer[end]),
                        target: None,
                    },
                    None => {
                        let mut end = buffer.len();
                        // A lone marker at the end of the line stays literal, outside the span.
                        if buffer[end - 1] == self.escape && !is_escaped(buffer, end - 1, self.escape) {
                            end -= 1;
                        }
                        Candidate {
                            open,
                            content: after..end,
                            terminator: Terminator::EndOfLine,
                            target: None,
                        }
                    }
                };
                Scan::Found(candidate)
            }
            TagShape::Link => {
                let Some(middle) = find_unescaped(buffer, &[']', '('], after, self.escape) else {
                    return Scan::Stop;
                };
                // The last opening indicator before `](` starts the link text.
                let mut open = open;
                while let Some(next) = find_unescaped(buffer, &self.indicator, open + 1, self.escape)
                    .filter(|&next| next + self.indicator.len() <= middle)
                {
                    open = next;
                }
                match find_closing_paren(buffer, middle + 1, self.escape) {
                    Some(close) => Scan::Found(Candidate {
                        open,
                        content: open + self.indicator.len()..middle,
                        terminator: Terminator::LinkDestination(close),
                        target: Some(middle + 2..close),
                    }),
                    None => Scan::Invalid { open },
                }
            }
        }
    }

    fn is_valid(&self, buffer: &[char], candidate: &Candidate) -> bool {
        !self.rules.iter().any(|&rule| self.violates(rule, buffer, candidate))
    }

    fn violates(&self, rule: Rule, buffer: &[char], candidate: &Candidate) -> bool {
        let content = &buffer[candidate.content.clone()];
        match rule {
            Rule::Empty => {
                content.is_empty()
                    || candidate.target.as_ref().is_some_and(|target| target.is_empty())
            }
            Rule::Boundary => candidate.open > 0 && !buffer[candidate.open - 1].is_whitespace(),
            Rule::Chained => content.first() == self.indicator.first(),
            Rule::WhitespaceEdge => {
                candidate.terminator != Terminator::Paren
                    && (content.first().is_some_and(|ch| ch.is_whitespace())
                        || content.last().is_some_and(|ch| ch.is_whitespace()))
            }
            Rule::FillOnly => content
                .iter()
                .all(|&ch| Some(ch) == self.fill || ch == self.escape),
        }
    }

    /// Rewrites a validated span and returns the index just past the inserted close markup.
    fn apply(&self, buffer: &mut Vec<char>, candidate: &Candidate) -> usize {
        let target = self.target_text(buffer, candidate);
        let open_markup: Vec<char> = self.expand(&self.open, target.as_deref()).chars().collect();
        let close_markup: Vec<char> = self.expand(&self.close, target.as_deref()).chars().collect();

        let mut open_target = self.indicator.clone();
        let mut open_replacement = open_markup;
        if candidate.terminator == Terminator::Paren {
            open_target.push('(');
        }
        if self.retains_indicator() {
            let indicator: String = self.indicator.iter().collect();
            open_replacement.extend(self.escape_literal(&indicator).chars());
        }

        let start = replace_first(buffer, &open_target, &open_replacement, candidate.open, self.escape);
        debug_assert_eq!(start, candidate.open);
        let mut close_at = candidate.content.end - open_target.len() + open_replacement.len();

        if self.retains_indicator() {
            // The visible text is part of the emitted markup; escape it like the target.
            let content_start = start + open_replacement.len();
            let visible = resolve_escapes(&buffer[content_start..close_at], self.escape);
            let escaped: Vec<char> = self.escape_literal(&visible).chars().collect();
            let escaped_len = escaped.len();
            buffer.splice(content_start..close_at, escaped);
            close_at = content_start + escaped_len;
        }

        let close_start = match candidate.terminator {
            Terminator::Indicator => {
                replace_first(buffer, &self.indicator, &close_markup, close_at, self.escape)
            }
            Terminator::WordEnd(ch) => {
                let mut replacement = close_markup.clone();
                replacement.push(ch);
                replace_first(buffer, &[ch], &replacement, close_at, self.escape)
            }
            Terminator::EndOfLine => {
                buffer.splice(close_at..close_at, close_markup.iter().copied());
                close_at
            }
            Terminator::Paren => replace_first(buffer, &[')'], &close_markup, close_at, self.escape),
            Terminator::LinkDestination(paren) => {
                let end = paren + close_at - candidate.content.end;
                let destination: Vec<char> = buffer[close_at..=end].to_vec();
                replace_first(buffer, &destination, &close_markup, close_at, self.escape)
            }
        };

        trace!(
            indicator = %self.indicator.iter().collect::<String>(),
            open = start,
            close = close_start,
            "tagged span"
        );
        close_start + close_markup.len()
    }

    fn target_text(&self, buffer: &[char], candidate: &Candidate) -> Option<String> {
        if !self.open.contains(TARGET_PLACEHOLDER) && !self.close.contains(TARGET_PLACEHOLDER) {
            return None;
        }
        let range = candidate.target.clone().unwrap_or_else(|| candidate.content.clone());
        let mut target = resolve_escapes(&buffer[range], self.escape);
        if self.retains_indicator() && candidate.target.is_none() {
            target.insert_str(0, &self.indicator.iter().collect::<String>());
        }
        Some(target)
    }

    fn expand(&self, markup: &str, target: Option<&str>) -> String {
        match target {
            Some(target) => markup.replace(TARGET_PLACEHOLDER, &self.escape_literal(target)),
            None => markup.to_string(),
        }
    }

    /// Escapes everything but alphanumerics so no later processor can match an indicator
    /// inside emitted text.
    fn escape_literal(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len() * 2);
        for ch in text.chars() {
            if !ch.is_alphanumeric() {
                escaped.push(self.escape);
            }
            escaped.push(ch);
        }
        escaped
    }
}

/// A bare word ends at whitespace or where earlier markup begins.
fn ends_word(ch: char) -> bool {
    ch.is_whitespace() || ch == '<'
}

fn asymmetric_rules(options: AsymmetricOptions) -> Vec<Rule> {
    let mut rules = vec![Rule::Empty];
    if options.require_boundary {
        rules.push(Rule::Boundary);
    }
    if options.chained_rule {
        rules.push(Rule::Chained);
    }
    rules.push(Rule::WhitespaceEdge);
    rules.push(Rule::FillOnly);
    rules
}
