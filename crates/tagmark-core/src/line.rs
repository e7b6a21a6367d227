/// One source line being rewritten by the pipeline.
///
/// The buffer is indexed by `char` so cursor arithmetic never lands inside a UTF-8 sequence.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Line {
    buffer: Vec<char>,
    skip_further_processing: bool,
    drop_from_output: bool,
}

impl Line {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: text.chars().collect(),
            skip_further_processing: false,
            drop_from_output: false,
        }
    }

    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Vec<char> {
        &mut self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn skip_further_processing(&self) -> bool {
        self.skip_further_processing
    }

    pub fn set_skip_further_processing(&mut self, skip: bool) {
        self.skip_further_processing = skip;
    }

    pub fn drop_from_output(&self) -> bool {
        self.drop_from_output
    }

    pub fn set_drop_from_output(&mut self, drop: bool) {
        self.drop_from_output = drop;
    }

    /// Produces the final text, resolving escapes.
    ///
    /// An escape marker makes the next character literal, so a doubled marker yields one.
    /// A marker at the very end of the line has nothing to escape and is kept.
    pub fn finish(&self, escape: char) -> String {
        resolve_escapes(&self.buffer, escape)
    }
}

pub(crate) fn resolve_escapes(chars: &[char], escape: char) -> String {
    let mut out = String::with_capacity(chars.len());
    let mut iter = chars.iter().copied();
    while let Some(ch) = iter.next() {
        if ch == escape {
            if let Some(next) = iter.next() {
                out.push(next);
                continue;
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::Line;

    #[test]
    fn finish_strips_single_escapes() {
        let line = Line::new("\\*literal\\*");
        assert_eq!(line.finish('\\'), "*literal*");
    }

    #[test]
    fn finish_keeps_one_of_a_doubled_escape() {
        let line = Line::new("a\\\\b");
        assert_eq!(line.finish('\\'), "a\\b");
    }

    #[test]
    fn finish_keeps_trailing_escape() {
        let line = Line::new("end\\");
        assert_eq!(line.finish('\\'), "end\\");
    }

    #[test]
    fn indexes_are_per_char() {
        let line = Line::new("ß*é*");
        assert_eq!(line.len(), 4);
        assert_eq!(line.buffer()[1], '*');
    }

    #[test]
    fn flags_default_off() {
        let mut line = Line::new("x");
        assert!(!line.skip_further_processing());
        assert!(!line.drop_from_output());
        line.set_drop_from_output(true);
        line.set_skip_further_processing(true);
        assert!(line.skip_further_processing());
        assert!(line.drop_from_output());
    }
}
