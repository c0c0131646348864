use crate::language::{
    errors::{CompileError, CompileResult, ErrorKind},
    token::{closer_for, is_operator_char, operator},
};

/// Splits one expression into tokens. Calls, indexing and aggregate literals
/// (`f(a, b)`, `grid[i][j]`, `[1, 2]`) stay whole so they can be parsed
/// recursively later.
pub fn scan(expression: &str, line: usize) -> CompileResult<Vec<String>> {
    Scanner::new(expression, line).run()
}

struct Scanner<'a> {
    src: &'a str,
    chars: std::str::Chars<'a>,
    current: Option<char>,
    offset: usize,
    line: usize,
    buffer: String,
    brackets: Vec<char>,
    tokens: Vec<String>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str, line: usize) -> Self {
        let mut chars = src.chars();
        let current = chars.next();
        Self {
            src,
            chars,
            current,
            offset: 0,
            line,
            buffer: String::new(),
            brackets: Vec::new(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> CompileResult<Vec<String>> {
        while let Some(ch) = self.current {
            match ch {
                '"' | '\'' => {
                    self.flush();
                    let literal = self.lex_literal(ch)?;
                    self.tokens.push(literal);
                }
                '(' | '{' | '[' if !self.buffer.is_empty() => self.lex_group()?,
                '[' => self.lex_group()?,
                '(' | '{' => {
                    self.brackets.push(ch);
                    self.tokens.push(ch.to_string());
                    self.bump();
                }
                ')' | '}' | ']' => {
                    self.flush();
                    match self.brackets.pop() {
                        Some(open) if closer_for(open) == ch => {
                            self.tokens.push(ch.to_string());
                            self.bump();
                        }
                        _ => return Err(self.error(
                            ErrorKind::UnbalancedBrackets,
                            format!("`{ch}` has no matching opening bracket"),
                        )),
                    }
                }
                ch if ch.is_whitespace() => {
                    self.flush();
                    self.bump();
                }
                ch if is_operator_char(ch) => self.lex_operator()?,
                _ => {
                    self.buffer.push(ch);
                    self.bump();
                }
            }
        }
        self.flush();
        if let Some(open) = self.brackets.last() {
            return Err(self.error(
                ErrorKind::UnbalancedBrackets,
                format!("`{open}` is never closed"),
            ));
        }
        Ok(self.tokens)
    }

    fn bump(&mut self) -> Option<char> {
        if let Some(ch) = self.current {
            self.offset += ch.len_utf8();
        }
        self.current = self.chars.next();
        self.current
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.push(std::mem::take(&mut self.buffer));
        }
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> CompileError {
        CompileError::new(kind, self.line, message)
    }

    /// Copies a quoted literal verbatim, escapes included.
    fn lex_literal(&mut self, quote: char) -> CompileResult<String> {
        let mut literal = String::from(quote);
        self.bump();
        while let Some(ch) = self.current {
            literal.push(ch);
            self.bump();
            if ch == '\\' {
                if let Some(escaped) = self.current {
                    literal.push(escaped);
                    self.bump();
                }
            } else if ch == quote {
                return Ok(literal);
            }
        }
        Err(self.error(
            ErrorKind::UnterminatedLiteral,
            format!("literal starting with {quote} is never closed"),
        ))
    }

    /// Appends a bracketed group to the pending buffer, consuming through its
    /// matching close bracket.
    fn lex_group(&mut self) -> CompileResult<()> {
        let mut stack = Vec::new();
        while let Some(ch) = self.current {
            match ch {
                '"' | '\'' => {
                    let literal = self.lex_literal(ch)?;
                    self.buffer.push_str(&literal);
                    continue;
                }
                '(' | '{' | '[' => stack.push(ch),
                ')' | '}' | ']' => match stack.pop() {
                    Some(open) if closer_for(open) == ch => {}
                    _ => {
                        return Err(self.error(
                            ErrorKind::UnbalancedBrackets,
                            format!("`{ch}` does not match the bracket it closes"),
                        ))
                    }
                },
                _ => {}
            }
            self.buffer.push(ch);
            self.bump();
            if stack.is_empty() {
                return Ok(());
            }
        }
        Err(self.error(
            ErrorKind::UnbalancedBrackets,
            format!("`{}` is never closed", self.buffer),
        ))
    }

    fn lex_operator(&mut self) -> CompileResult<()> {
        let rest = &self.src[self.offset..];
        match operator(rest) {
            Ok((remaining, op)) => {
                self.flush();
                for _ in 0..rest.len() - remaining.len() {
                    self.bump();
                }
                self.tokens.push(op.symbol().to_string());
                Ok(())
            }
            Err(_) => {
                let ch = rest.chars().next().unwrap_or_default();
                Err(self.error(
                    ErrorKind::InvalidOperator,
                    format!("`{ch}` is not an operator"),
                )
                .with_help("use `&&`, `||` or `==`"))
            }
        }
    }
}
