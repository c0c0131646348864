mod control;
mod declarations;
mod function;
mod macros;

use crate::language::{
    ast::{Jump, Program},
    context::CompilationContext,
    errors::{CompileError, CompileResult, ErrorKind},
    scope::{Scope, ScopeKind},
    source::{find_assignment, find_scope_end, starts_with_keyword},
    token::identifier,
};
use nom::{character::complete::char, sequence::tuple};

/// Which statement parser handles a source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Blank,
    Function,
    Declaration,
    Assignment,
    Selection,
    Else,
    Loop,
    Jump(Jump),
    Macro,
    Closer,
    Return,
}

pub fn classify_line(text: &str) -> ItemKind {
    let text = text.trim();
    if text.is_empty() {
        ItemKind::Blank
    } else if starts_with_keyword(text, "function") {
        ItemKind::Function
    } else if starts_with_keyword(text, "let") {
        ItemKind::Declaration
    } else if starts_with_keyword(text, "if") {
        ItemKind::Selection
    } else if starts_with_keyword(text, "else") {
        ItemKind::Else
    } else if starts_with_keyword(text, "loop") {
        ItemKind::Loop
    } else if starts_with_keyword(text, "break") {
        ItemKind::Jump(Jump::Break)
    } else if starts_with_keyword(text, "continue") {
        ItemKind::Jump(Jump::Continue)
    } else if text.starts_with('}') {
        ItemKind::Closer
    } else if tuple((identifier, char::<_, nom::error::Error<&str>>('!'), char('(')))(text).is_ok() {
        ItemKind::Macro
    } else if find_assignment(text).is_some() {
        ItemKind::Assignment
    } else {
        ItemKind::Return
    }
}

/// Parses a comment-free source file into its scope tree.
pub fn parse(source: &str) -> CompileResult<Program> {
    let lines = source.lines().map(str::to_string).collect();
    ScopeBuilder::new(lines).build()
}

/// Walks source lines top-down, dispatching each to its statement parser
/// and descending into nested blocks.
pub struct ScopeBuilder {
    lines: Vec<String>,
    context: CompilationContext,
}

impl ScopeBuilder {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            context: CompilationContext::default(),
        }
    }

    pub fn build(mut self) -> CompileResult<Program> {
        let mut global = Scope::global();
        self.parse_lines(&mut global, 0, self.lines.len())?;
        if global.tables.function("main").is_none() {
            return Err(CompileError::new(
                ErrorKind::MissingMain,
                self.lines.len().max(1),
                "cannot transpile a file with no `main` function",
            )
            .with_help("add `function main() -> IO = {`"));
        }
        tracing::debug!(
            items = global.statements.len(),
            tuples = self.context.tuple_arities().len(),
            "parsed program"
        );
        Ok(Program {
            scope: global,
            context: self.context,
        })
    }

    /// Parses lines `start..end` into `scope`.
    fn parse_lines(&mut self, scope: &mut Scope, start: usize, end: usize) -> CompileResult<()> {
        let mut idx = start;
        while idx < end {
            let line = idx + 1;
            let text = self.lines[idx].trim().to_string();
            let kind = classify_line(&text);
            if scope.kind == ScopeKind::Global
                && !matches!(kind, ItemKind::Blank | ItemKind::Function | ItemKind::Closer)
            {
                return Err(CompileError::new(
                    ErrorKind::DisallowedTopLevel,
                    line,
                    format!("`{text}` is not allowed at file scope; only functions may be declared here"),
                ));
            }
            if scope.kind != ScopeKind::Global && kind == ItemKind::Function {
                return Err(CompileError::new(
                    ErrorKind::NestedFunction,
                    line,
                    "functions may only be declared at file scope",
                )
                .with_help("move this function out of the enclosing block"));
            }
            idx = match kind {
                ItemKind::Blank => idx + 1,
                ItemKind::Function => self.function(scope, idx)?,
                ItemKind::Selection => self.selection(scope, idx)?,
                ItemKind::Loop => self.loop_block(scope, idx)?,
                ItemKind::Jump(jump) => {
                    self.jump(scope, &text, jump, line)?;
                    idx + 1
                }
                ItemKind::Declaration => {
                    self.declaration(scope, &text, line)?;
                    idx + 1
                }
                ItemKind::Assignment => {
                    self.assignment(scope, &text, line)?;
                    idx + 1
                }
                ItemKind::Macro => {
                    self.macro_call(scope, &text, line)?;
                    idx + 1
                }
                ItemKind::Return => {
                    self.return_value(scope, &text, line)?;
                    self.ensure_nothing_follows(idx + 1, end)?;
                    end
                }
                ItemKind::Else => {
                    return Err(CompileError::new(
                        ErrorKind::MisplacedElse,
                        line,
                        "`else` must open on the same line that closes the previous block",
                    )
                    .with_help("write `} else {`"))
                }
                ItemKind::Closer => {
                    return Err(CompileError::new(
                        ErrorKind::UnexpectedToken,
                        line,
                        "`}` does not close any open block",
                    ))
                }
            };
        }
        Ok(())
    }

    /// Parses the block whose header sits on `open` into `body`, returning the
    /// filled scope and the index of its closing line.
    fn block(&mut self, mut body: Scope, open: usize) -> CompileResult<(Scope, usize)> {
        let close = find_scope_end(&self.lines, open).ok_or_else(|| {
            CompileError::new(
                ErrorKind::UnclosedScope,
                open + 1,
                "block is never closed with `}`",
            )
        })?;
        if !self.lines[close].trim_start().starts_with('}') {
            return Err(CompileError::new(
                ErrorKind::UnexpectedToken,
                close + 1,
                "a closing `}` must start its line",
            ));
        }
        self.parse_lines(&mut body, open + 1, close)?;
        tracing::trace!(
            kind = ?body.kind,
            depth = body.depth(),
            open = open + 1,
            close = close + 1,
            "block parsed"
        );
        Ok((body, close))
    }

    /// Text after the `}` on a closing line.
    fn after_closer(&self, close: usize) -> String {
        self.lines[close].trim()[1..].trim().to_string()
    }

    fn expect_plain_close(&self, close: usize) -> CompileResult<()> {
        let rest = self.after_closer(close);
        if rest.is_empty() {
            return Ok(());
        }
        let line = close + 1;
        if starts_with_keyword(&rest, "else") {
            return Err(CompileError::new(
                ErrorKind::MisplacedElse,
                line,
                "`else` can only follow the block of an `if`",
            ));
        }
        Err(CompileError::new(
            ErrorKind::UnexpectedToken,
            line,
            format!("unexpected `{rest}` after `}}`"),
        ))
    }

    fn ensure_nothing_follows(&self, from: usize, end: usize) -> CompileResult<()> {
        match (from..end).find(|idx| !self.lines[*idx].trim().is_empty()) {
            Some(idx) => Err(CompileError::new(
                ErrorKind::DeadCode,
                idx + 1,
                "unreachable code after the function's return expression",
            )),
            None => Ok(()),
        }
    }
}
