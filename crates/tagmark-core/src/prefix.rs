use crate::line::Line;
use crate::settings::{HeaderStyle, Markup, OrderedListStyle, UnorderedListStyle};

const MAX_ORDERED_DIGITS: usize = 9;

/// ATX headers (`## Title`) and setext headers (a title underlined with `===` or `---`).
///
/// A setext underline is dropped from the output and never processed again.
pub fn headers(lines: &mut [Line], style: &HeaderStyle) {
    let max_level = style.levels.len();
    let mut converted = vec![false; lines.len()];

    for i in 1..lines.len() {
        if lines[i].skip_further_processing()
            || lines[i - 1].skip_further_processing()
            || converted[i - 1]
        {
            continue;
        }
        let Some(level) = setext_level(lines[i].buffer()) else {
            continue;
        };
        let Some(markup) = style.levels.get(level - 1) else {
            continue;
        };
        let title = lines[i - 1].buffer();
        if title.iter().all(|ch| ch.is_whitespace()) || atx_level(title, max_level).is_some() {
            continue;
        }
        let content = trim(title).to_vec();
        wrap(&mut lines[i - 1], markup, &content);
        converted[i - 1] = true;
        lines[i].set_drop_from_output(true);
        lines[i].set_skip_further_processing(true);
    }

    for (line, converted) in lines.iter_mut().zip(converted) {
        if converted || line.skip_further_processing() {
            continue;
        }
        let Some((level, start)) = atx_level(line.buffer(), max_level) else {
            continue;
        };
        let content = trim(&line.buffer()[start..]).to_vec();
        wrap(line, &style.levels[level - 1], &content);
    }
}

/// `- item`, `* item` and `+ item`, keeping indentation.
pub fn unordered_lists(lines: &mut [Line], style: &UnorderedListStyle) {
    for line in lines.iter_mut().filter(|line| !line.skip_further_processing()) {
        let buffer = line.buffer();
        let indent = leading_indent(buffer);
        let is_item = matches!(buffer.get(indent), Some('-' | '*' | '+'))
            && buffer.get(indent + 1) == Some(&' ');
        if !is_item {
            continue;
        }
        let mut out = buffer[..indent].to_vec();
        out.extend(style.open.chars());
        out.extend(style.bullet.chars());
        if !style.bullet.is_empty() {
            out.push(' ');
        }
        out.extend_from_slice(&buffer[indent + 2..]);
        out.extend(style.close.chars());
        *line.buffer_mut() = out;
    }
}

/// `1. item` and `1) item`.
pub fn ordered_lists(lines: &mut [Line], style: &OrderedListStyle) {
    for line in lines.iter_mut().filter(|line| !line.skip_further_processing()) {
        let buffer = line.buffer();
        let indent = leading_indent(buffer);
        let digits = buffer[indent..]
            .iter()
            .take_while(|ch| ch.is_ascii_digit())
            .count();
        if digits == 0 || digits > MAX_ORDERED_DIGITS {
            continue;
        }
        let delimiter = indent + digits;
        if !matches!(buffer.get(delimiter), Some('.' | ')')) || buffer.get(delimiter + 1) != Some(&' ')
        {
            continue;
        }
        let mut out = buffer[..indent].to_vec();
        out.extend(style.open.chars());
        if style.keep_number {
            out.extend_from_slice(&buffer[indent..delimiter + 2]);
        }
        out.extend_from_slice(&buffer[delimiter + 2..]);
        out.extend(style.close.chars());
        *line.buffer_mut() = out;
    }
}

fn atx_level(buffer: &[char], max_level: usize) -> Option<(usize, usize)> {
    let level = buffer.iter().take_while(|&&ch| ch == '#').count();
    if level == 0 || level > max_level || buffer.get(level) != Some(&' ') {
        return None;
    }
    let start = level + buffer[level..].iter().take_while(|&&ch| ch == ' ').count();
    Some((level, start))
}

fn setext_level(buffer: &[char]) -> Option<usize> {
    let underline = trim(buffer);
    if underline.len() < 3 {
        return None;
    }
    if underline.iter().all(|&ch| ch == '=') {
        Some(1)
    } else if underline.iter().all(|&ch| ch == '-') {
        Some(2)
    } else {
        None
    }
}

fn leading_indent(buffer: &[char]) -> usize {
    buffer
        .iter()
        .take_while(|&&ch| ch == ' ' || ch == '\t')
        .count()
}

fn trim(chars: &[char]) -> &[char] {
    let start = chars.iter().take_while(|ch| ch.is_whitespace()).count();
    let end = chars.len()
        - chars[start..]
            .iter()
            .rev()
            .take_while(|ch| ch.is_whitespace())
            .count();
    &chars[start..end]
}

fn wrap(line: &mut Line, markup: &Markup, content: &[char]) {
    let mut out: Vec<char> = markup.open.chars().collect();
    out.extend_from_slice(content);
    out.extend(markup.close.chars());
    *line.buffer_mut() = out;
}
