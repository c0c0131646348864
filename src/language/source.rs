//! Line-level scanning helpers that skip over string and byte literals.

use std::str::CharIndices;

/// Yields `(byte offset, char)` for every character outside a `"..."` or
/// `'...'` literal. Quote characters themselves are not yielded.
pub struct Unquoted<'a> {
    chars: CharIndices<'a>,
    quote: Option<char>,
}

impl<'a> Unquoted<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices(),
            quote: None,
        }
    }
}

impl Iterator for Unquoted<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, ch) = self.chars.next()?;
            match self.quote {
                Some(_) if ch == '\\' => {
                    self.chars.next();
                }
                Some(quote) if ch == quote => self.quote = None,
                Some(_) => {}
                None if ch == '"' || ch == '\'' => self.quote = Some(ch),
                None => return Some((idx, ch)),
            }
        }
    }
}

/// Net brace movement of a line: `(opened, closed)`.
pub fn brace_counts(line: &str) -> (usize, usize) {
    Unquoted::new(line).fold((0, 0), |(open, close), (_, ch)| match ch {
        '{' => (open + 1, close),
        '}' => (open, close + 1),
        _ => (open, close),
    })
}

/// Index of the line whose `}` closes the block opened at the end of `lines[open]`.
pub fn find_scope_end(lines: &[String], open: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, line) in lines.iter().enumerate().skip(open + 1) {
        for (_, ch) in Unquoted::new(line) {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Byte offset of the bracket closing the one at `open`, counting `()`, `[]`
/// and `{}` together.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in Unquoted::new(text).skip_while(|(idx, _)| *idx < open) {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on `separator` where it is outside brackets and literals.
/// An all-whitespace input yields no parts.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0isize;
    let mut start = 0;
    for (idx, ch) in Unquoted::new(text) {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ch if ch == separator && depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + ch.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Offset of a lone `=` (not part of `==`, `!=`, `<=`, `>=`) outside literals
/// and brackets.
pub fn find_assignment(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut depth = 0isize;
    for (idx, ch) in Unquoted::new(line) {
        match ch {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '=' if depth == 0 => {
                let before = idx.checked_sub(1).map(|i| bytes[i]);
                let after = bytes.get(idx + 1).copied();
                let compound = matches!(before, Some(b'=' | b'!' | b'<' | b'>'))
                    || after == Some(b'=');
                if !compound {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// True when `text` starts with the word `keyword` followed by whitespace,
/// a bracket, or nothing.
pub fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    match text.strip_prefix(keyword) {
        Some(rest) => rest
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == '(' || c == '{'),
        None => false,
    }
}
