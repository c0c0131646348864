use super::ScopeBuilder;
use crate::language::{
    ast::{MacroCall, MacroKind, Statement},
    errors::{CompileError, CompileResult, ErrorKind},
    expression::Checker,
    scope::Scope,
    source::matching_close,
    token::identifier,
    types::Primitive,
};
use nom::{character::complete::char, sequence::terminated};

impl ScopeBuilder {
    /// `print!(e)`, `println!(e)` or `panic!("message")`.
    pub(super) fn macro_call(&mut self, scope: &mut Scope, text: &str, line: usize) -> CompileResult<()> {
        let (rest, name) = terminated(identifier, char('!'))(text).map_err(|_| {
            CompileError::new(
                ErrorKind::UnexpectedToken,
                line,
                format!("`{text}` is not a macro call"),
            )
        })?;
        let kind = MacroKind::from_name(name).ok_or_else(|| {
            CompileError::new(ErrorKind::UnknownMacro, line, format!("unknown macro `{name}!`"))
                .with_help("available macros are `print!`, `println!` and `panic!`")
        })?;
        if !rest.starts_with('(') || matching_close(rest, 0) != Some(rest.len() - 1) {
            return Err(CompileError::new(
                ErrorKind::UnexpectedToken,
                line,
                format!("`{name}!` must wrap its argument in parentheses"),
            ));
        }
        let inner = rest[1..rest.len() - 1].trim();
        if inner.is_empty() {
            return Err(CompileError::new(
                ErrorKind::EmptyExpression,
                line,
                format!("`{name}!` needs an argument"),
            ));
        }

        let argument = Checker::new(&scope.tables, line).expression(inner)?;
        match kind {
            MacroKind::Panic if argument.ty != Primitive::String => {
                return Err(CompileError::new(
                    ErrorKind::TypeMismatch,
                    line,
                    format!("`panic!` expects a string message, found {}", argument.ty),
                ))
            }
            MacroKind::Panic => {}
            MacroKind::Print | MacroKind::Println => self.context.require_import("fmt"),
        }
        scope.push(Statement::Macro(MacroCall { kind, argument }));
        Ok(())
    }
}
