use super::ScopeBuilder;
use crate::language::{
    ast::{FunctionDef, ReturnValue, Statement},
    errors::{CompileError, CompileResult, ErrorKind},
    expression::Checker,
    scope::{Descriptor, Function, Parameter, Scope, ScopeKind},
    source::{matching_close, split_top_level},
    token::identifier_problem,
    types::{parse_annotation, Primitive, TypeAnnotation},
};
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{char, space0, space1},
    combinator::eof,
    sequence::{terminated, tuple},
    IResult,
};

struct FunctionHeader<'a> {
    name: &'a str,
    params: &'a str,
    returns: &'a str,
}

/// `-> R = {` after the parameter list.
fn return_clause(input: &str) -> IResult<&str, &str> {
    let (input, (_, _, _, returns, _, _, _, _, _)) = tuple((
        space0,
        tag("->"),
        space0,
        take_till1(|c: char| c == '='),
        char('='),
        space0,
        char('{'),
        space0,
        eof,
    ))(input)?;
    Ok((input, returns.trim()))
}

fn function_header(text: &str) -> Option<FunctionHeader<'_>> {
    let (rest, _) = terminated(tag::<_, _, nom::error::Error<&str>>("function"), space1)(text).ok()?;
    let (rest, name) =
        take_till1::<_, _, nom::error::Error<&str>>(|c: char| c == '(' || c.is_whitespace())(rest).ok()?;
    let rest = rest.trim_start();
    if !rest.starts_with('(') {
        return None;
    }
    let close = matching_close(rest, 0)?;
    let (_, returns) = return_clause(&rest[close + 1..]).ok()?;
    Some(FunctionHeader {
        name,
        params: &rest[1..close],
        returns,
    })
}

fn header_help() -> &'static str {
    "Syntax: function <name>(<param>: <type>, ...) -> <type> = {"
}

impl ScopeBuilder {
    /// Parses the function opened on line `open` and returns the index just
    /// past its closing brace.
    pub(super) fn function(&mut self, scope: &mut Scope, open: usize) -> CompileResult<usize> {
        let line = open + 1;
        let text = self.lines[open].trim().to_string();
        let malformed = |message: String| CompileError::new(ErrorKind::MalformedFunction, line, message);
        let header = function_header(&text)
            .ok_or_else(|| malformed(format!("malformed function header `{text}`")).with_help(header_help()))?;
        if let Some(problem) = identifier_problem(header.name) {
            return Err(CompileError::new(ErrorKind::InvalidIdentifier, line, problem));
        }
        scope.tables.ensure_free(header.name, line)?;

        let params = self.parameters(header.params, line)?;
        let returns = parse_annotation(header.returns, line, &mut self.context)
            .map_err(|err| err.with_kind(ErrorKind::MalformedFunction))?;
        let is_main = header.name == "main";
        if is_main && !returns.is_io() {
            return Err(malformed("`main` must return IO".into()));
        }
        if is_main && !params.is_empty() {
            return Err(malformed("`main` takes no parameters".into()));
        }
        if !is_main && returns.is_io() {
            return Err(malformed(format!(
                "only `main` may return IO; `{}` must return a value",
                header.name
            )));
        }

        let signature = Function {
            name: header.name.to_string(),
            params,
            returns: returns.clone(),
        };
        let mut body = scope.enter_child(ScopeKind::Function);
        body.returns = Some(returns.clone());
        body.tables
            .declare(Descriptor::Function(signature.clone()), line)?;
        for param in &signature.params {
            body.tables.declare(param.descriptor(), line)?;
        }

        let (mut body, close) = self.block(body, open)?;
        self.expect_plain_close(close)?;
        if !returns.is_io() && !body.statements.last().is_some_and(Statement::is_return) {
            return Err(CompileError::new(
                ErrorKind::ReturnTypeMismatch,
                close + 1,
                format!("`{}` must end with an expression of type {returns}", signature.name),
            ));
        }
        body.push(Statement::ScopeCloser);

        scope
            .tables
            .declare(Descriptor::Function(signature.clone()), line)?;
        tracing::debug!(
            name = %signature.name,
            params = ?signature.params.iter().map(Parameter::kind).collect::<Vec<_>>(),
            returns = %signature.returns,
            "function"
        );
        scope.push(Statement::Function(FunctionDef { signature, body }));
        Ok(close + 1)
    }

    fn parameters(&mut self, text: &str, line: usize) -> CompileResult<Vec<Parameter>> {
        let mut params: Vec<Parameter> = Vec::new();
        for part in split_top_level(text, ',') {
            let Some((name, ty)) = part.split_once(':') else {
                return Err(CompileError::new(
                    ErrorKind::MalformedFunction,
                    line,
                    format!("parameter `{part}` needs a type, as in `{part}: int`"),
                ));
            };
            let name = name.trim();
            if let Some(problem) = identifier_problem(name) {
                return Err(CompileError::new(ErrorKind::InvalidIdentifier, line, problem));
            }
            if params.iter().any(|param| param.name == name) {
                return Err(CompileError::new(
                    ErrorKind::AlreadyDeclared,
                    line,
                    format!("parameter `{name}` is declared twice"),
                ));
            }
            let ty = parse_annotation(ty, line, &mut self.context)
                .map_err(|err| err.with_kind(ErrorKind::MalformedFunction))?;
            if ty.is_io() {
                return Err(CompileError::new(
                    ErrorKind::MalformedFunction,
                    line,
                    format!("parameter `{name}` cannot have type IO"),
                ));
            }
            params.push(Parameter {
                name: name.to_string(),
                ty,
            });
        }
        Ok(params)
    }

    /// A bare expression: the value of the enclosing function.
    pub(super) fn return_value(&mut self, scope: &mut Scope, text: &str, line: usize) -> CompileResult<()> {
        let Some(returns) = scope.returns.clone() else {
            return Err(CompileError::new(
                ErrorKind::ReturnOutsideFunction,
                line,
                format!("`{text}` is not a statement; only a function body may end with a value"),
            ));
        };
        let mismatch = |err: CompileError| match err.kind {
            ErrorKind::TypeMismatch => err.with_kind(ErrorKind::ReturnTypeMismatch),
            _ => err,
        };
        let checker = Checker::new(&scope.tables, line);
        let value = match &returns {
            TypeAnnotation::Primitive(Primitive::IO) => {
                return Err(CompileError::new(
                    ErrorKind::ReturnTypeMismatch,
                    line,
                    format!("`{text}` is not a statement, and an IO function returns no value"),
                ))
            }
            TypeAnnotation::Primitive(expected) => {
                let value = checker.expression(text)?;
                if value.ty != *expected {
                    return Err(CompileError::new(
                        ErrorKind::ReturnTypeMismatch,
                        line,
                        format!("function returns {expected}, but this expression is {}", value.ty),
                    ));
                }
                ReturnValue::Primitive(value)
            }
            TypeAnnotation::Array(expected) => {
                ReturnValue::Array(checker.array_expression(text, expected).map_err(mismatch)?)
            }
            TypeAnnotation::Tuple(expected) => {
                ReturnValue::Tuple(checker.tuple_expression(text, expected).map_err(mismatch)?)
            }
        };
        scope.push(Statement::Expression(value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_keeps_tuple_parameters_whole() {
        let header = function_header("function swap(p: (int, bool), n: int) -> (bool, int) = {").unwrap();
        assert_eq!(header.name, "swap");
        assert_eq!(header.params, "p: (int, bool), n: int");
        assert_eq!(header.returns, "(bool, int)");
    }

    #[test]
    fn header_requires_arrow_and_opening_brace() {
        assert!(function_header("function main() -> IO = {").is_some());
        assert!(function_header("function main() = {").is_none());
        assert!(function_header("function main() -> IO {").is_none());
        assert!(function_header("function main() -> IO = { x").is_none());
        assert!(function_header("function main -> IO = {").is_none());
    }
}
