use super::ScopeBuilder;
use crate::language::{
    ast::{Clause, ClauseKind, Jump, Loop, Selection, Statement},
    errors::{CompileError, CompileResult, ErrorKind},
    expression::{Checker, Expression},
    scope::{Scope, ScopeKind},
    source::starts_with_keyword,
    types::Primitive,
};

/// Strips `keyword` and the trailing `{` from a block header, returning the
/// text between them.
fn clause_header<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let rest = text.trim().strip_prefix(keyword)?;
    let inner = rest.strip_suffix('{')?;
    Some(inner.trim())
}

impl ScopeBuilder {
    fn condition(&self, scope: &Scope, text: &str, line: usize) -> CompileResult<Expression> {
        let condition = Checker::new(&scope.tables, line).expression(text)?;
        if condition.ty != Primitive::Bool {
            return Err(CompileError::new(
                ErrorKind::NonBooleanCondition,
                line,
                format!("condition `{text}` has type {}, expected bool", condition.ty),
            ));
        }
        Ok(condition)
    }

    /// Parses an `if` chain starting on line `open`, following `} else if`
    /// and `} else` continuations.
    pub(super) fn selection(&mut self, scope: &mut Scope, open: usize) -> CompileResult<usize> {
        let malformed = |line: usize, message: String| {
            CompileError::new(ErrorKind::MalformedConditional, line, message)
                .with_help("Syntax: if <condition> {")
        };
        let text = self.lines[open].trim().to_string();
        let condition_text = clause_header(&text, "if")
            .filter(|condition| !condition.is_empty())
            .ok_or_else(|| malformed(open + 1, format!("malformed conditional `{text}`")))?;
        let mut kind = ClauseKind::If(self.condition(scope, condition_text, open + 1)?);
        let mut header = open;
        let mut clauses = Vec::new();

        loop {
            let body = scope.enter_child(ScopeKind::Selection);
            let (body, close) = self.block(body, header)?;
            let closed_else = matches!(kind, ClauseKind::Else);
            clauses.push(Clause { kind, body });

            let rest = self.after_closer(close);
            let line = close + 1;
            if rest.is_empty() {
                header = close;
                break;
            }
            if !starts_with_keyword(&rest, "else") {
                return Err(CompileError::new(
                    ErrorKind::UnexpectedToken,
                    line,
                    format!("unexpected `{rest}` after `}}`"),
                ));
            }
            if closed_else {
                return Err(CompileError::new(
                    ErrorKind::MisplacedElse,
                    line,
                    "an `else` block must be the last clause of its `if`",
                ));
            }
            let continuation = rest["else".len()..].trim();
            kind = if continuation == "{" {
                ClauseKind::Else
            } else if starts_with_keyword(continuation, "if") {
                let condition_text = clause_header(continuation, "if")
                    .filter(|condition| !condition.is_empty())
                    .ok_or_else(|| malformed(line, format!("malformed `else if` in `{rest}`")))?;
                ClauseKind::ElseIf(self.condition(scope, condition_text, line)?)
            } else {
                return Err(malformed(
                    line,
                    format!("`else` takes no condition; write `else if` in `{rest}`"),
                ));
            };
            header = close;
        }

        // Only the final clause closes the chain; the others continue on the
        // `} else` line.
        if let Some(last) = clauses.last_mut() {
            last.body.push(Statement::ScopeCloser);
        }
        tracing::trace!(clauses = clauses.len(), line = open + 1, "selection");
        scope.push(Statement::Selection(Selection { clauses }));
        Ok(header + 1)
    }

    pub(super) fn loop_block(&mut self, scope: &mut Scope, open: usize) -> CompileResult<usize> {
        let line = open + 1;
        let text = self.lines[open].trim().to_string();
        let condition_text = clause_header(&text, "loop")
            .filter(|condition| !condition.is_empty())
            .ok_or_else(|| {
                CompileError::new(
                    ErrorKind::MalformedLoop,
                    line,
                    format!("malformed loop `{text}`"),
                )
                .with_help("Syntax: loop <condition> {")
            })?;
        let condition = self.condition(scope, condition_text, line)?;

        let body = scope.enter_child(ScopeKind::Loop);
        let (mut body, close) = self.block(body, open)?;
        self.expect_plain_close(close)?;
        if !body.statements.iter().any(Statement::breaks_loop) {
            return Err(CompileError::new(
                ErrorKind::NoExitCondition,
                line,
                "loop has no `break` and would never terminate",
            )
            .with_help("add a `break` inside the loop body"));
        }
        body.push(Statement::ScopeCloser);
        scope.push(Statement::Loop(Loop { condition, body }));
        Ok(close + 1)
    }

    pub(super) fn jump(&mut self, scope: &mut Scope, text: &str, jump: Jump, line: usize) -> CompileResult<()> {
        let keyword = match jump {
            Jump::Break => "break",
            Jump::Continue => "continue",
        };
        if text != keyword {
            return Err(CompileError::new(
                ErrorKind::UnexpectedToken,
                line,
                format!("`{keyword}` takes no operands, found `{text}`"),
            ));
        }
        if !scope.inside_loop() {
            return Err(CompileError::new(
                ErrorKind::BreakOutsideLoop,
                line,
                format!("`{keyword}` outside of a loop"),
            ));
        }
        scope.push(Statement::Jump(jump));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_headers_strip_keyword_and_brace() {
        assert_eq!(clause_header("if x < 3 {", "if"), Some("x < 3"));
        assert_eq!(clause_header("loop (running) {", "loop"), Some("(running)"));
        assert_eq!(clause_header("if {", "if"), Some(""));
        assert_eq!(clause_header("if x < 3", "if"), None);
    }
}
