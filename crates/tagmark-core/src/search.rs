/// Returns true when an odd-length run of escape markers sits directly before `index`.
pub fn is_escaped(buffer: &[char], index: usize, escape: char) -> bool {
    let run = buffer[..index.min(buffer.len())]
        .iter()
        .rev()
        .take_while(|&&ch| ch == escape)
        .count();
    run % 2 == 1
}

/// Finds the first occurrence of `needle` at or after `start` that is not escaped.
pub fn find_unescaped(buffer: &[char], needle: &[char], start: usize, escape: char) -> Option<usize> {
    if needle.is_empty() || start >= buffer.len() || needle.len() > buffer.len() - start {
        return None;
    }
    (start..=buffer.len() - needle.len())
        .find(|&i| buffer[i..i + needle.len()] == *needle && !is_escaped(buffer, i, escape))
}

/// Finds the first unescaped character at or after `start` matching `predicate`.
pub fn find_unescaped_where(
    buffer: &[char],
    start: usize,
    escape: char,
    predicate: impl Fn(char) -> bool,
) -> Option<usize> {
    (start..buffer.len()).find(|&i| predicate(buffer[i]) && !is_escaped(buffer, i, escape))
}

/// Finds the `)` matching the `(` at `open`, counting nested unescaped parentheses.
pub fn find_closing_paren(buffer: &[char], open: usize, escape: char) -> Option<usize> {
    let mut depth = 0usize;
    for i in open..buffer.len() {
        if is_escaped(buffer, i, escape) {
            continue;
        }
        match buffer[i] {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Replaces the first unescaped `target` at or after `from` and returns the index where
/// `replacement` now begins.
///
/// Callers only replace what a previous search found, so a missing target is a bug.
pub fn replace_first(
    buffer: &mut Vec<char>,
    target: &[char],
    replacement: &[char],
    from: usize,
    escape: char,
) -> usize {
    let Some(start) = find_unescaped(buffer, target, from, escape) else {
        unreachable!(
            "replace target {:?} missing at or after {}",
            target.iter().collect::<String>(),
            from
        );
    };
    buffer.splice(start..start + target.len(), replacement.iter().copied());
    start
}
