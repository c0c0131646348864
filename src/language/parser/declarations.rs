use super::ScopeBuilder;
use crate::language::{
    ast::{Assignment, Declaration, Statement},
    errors::{CompileError, CompileResult, ErrorKind},
    expression::Checker,
    scope::{Array, Descriptor, Scope, Tuple, Variable},
    source::find_assignment,
    token::identifier_problem,
    types::{parse_annotation, Mutability, Primitive, TypeAnnotation},
};
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{char, space0, space1},
    combinator::opt,
    sequence::{delimited, terminated},
    IResult,
};

struct LetHeader<'a> {
    mutability: Mutability,
    name: &'a str,
    annotation: &'a str,
}

/// `let [mut] name: type =`, leaving the value as the remaining input.
fn let_header(input: &str) -> IResult<&str, LetHeader<'_>> {
    let (input, _) = tag("let")(input)?;
    let (input, _) = space1(input)?;
    let (input, mutable) = opt(terminated(tag("mut"), space1))(input)?;
    let (input, name) = take_till1(|c: char| c == ':' || c.is_whitespace())(input)?;
    let (input, _) = delimited(space0, char(':'), space0)(input)?;
    let (input, annotation) = take_till1(|c: char| c == '=')(input)?;
    let (input, _) = char('=')(input)?;
    let mutability = if mutable.is_some() {
        Mutability::Mutable
    } else {
        Mutability::Immutable
    };
    Ok((
        input,
        LetHeader {
            mutability,
            name,
            annotation: annotation.trim(),
        },
    ))
}

fn let_syntax_help() -> String {
    "Syntax: let [mut] <name>: <type> = <value>".into()
}

fn mut_help(name: &str) -> String {
    format!("Try: let mut {name}: ... to allow reassignment")
}

impl ScopeBuilder {
    pub(super) fn declaration(&mut self, scope: &mut Scope, text: &str, line: usize) -> CompileResult<()> {
        let (value, header) = let_header(text).map_err(|_| {
            CompileError::new(
                ErrorKind::MalformedDeclaration,
                line,
                format!("malformed declaration `{text}`"),
            )
            .with_help(let_syntax_help())
        })?;
        if value.trim().is_empty() {
            return Err(CompileError::new(
                ErrorKind::MalformedDeclaration,
                line,
                format!("`{}` is declared without a value", header.name),
            )
            .with_help(let_syntax_help()));
        }
        if let Some(problem) = identifier_problem(header.name) {
            return Err(CompileError::new(ErrorKind::InvalidIdentifier, line, problem));
        }
        scope.tables.ensure_free(header.name, line)?;
        let annotation = parse_annotation(header.annotation, line, &mut self.context)?;

        let name = header.name.to_string();
        let mutability = header.mutability;
        let checker = Checker::new(&scope.tables, line);
        let (descriptor, declaration) = match annotation {
            TypeAnnotation::Primitive(Primitive::IO) => {
                return Err(CompileError::new(
                    ErrorKind::MalformedDeclaration,
                    line,
                    "IO is only valid as the return type of `main`",
                ))
            }
            TypeAnnotation::Primitive(ty) => {
                let value = checker.expect(value, ty, &format!("`{name}`"))?;
                (
                    Descriptor::Variable(Variable {
                        name: name.clone(),
                        ty,
                        mutability,
                    }),
                    Declaration::Variable { name, ty, value },
                )
            }
            TypeAnnotation::Array(ty) => {
                let value = checker.array_expression(value, &ty)?;
                (
                    Descriptor::Array(Array {
                        name: name.clone(),
                        ty: ty.clone(),
                        mutability,
                    }),
                    Declaration::Array { name, ty, value },
                )
            }
            TypeAnnotation::Tuple(pattern) => {
                let value = checker.tuple_expression(value, &pattern)?;
                (
                    Descriptor::Tuple(Tuple {
                        name: name.clone(),
                        pattern: pattern.clone(),
                        mutability,
                    }),
                    Declaration::Tuple {
                        name,
                        pattern,
                        value,
                    },
                )
            }
        };
        scope.tables.declare(descriptor, line)?;
        scope.push(Statement::Declaration(declaration));
        Ok(())
    }

    pub(super) fn assignment(&mut self, scope: &mut Scope, text: &str, line: usize) -> CompileResult<()> {
        let malformed = |message: String| {
            CompileError::new(ErrorKind::MalformedAssignment, line, message)
        };
        let eq = find_assignment(text)
            .ok_or_else(|| malformed(format!("`{text}` is not an assignment")))?;
        let (target, value) = (text[..eq].trim(), text[eq + 1..].trim());
        if target.is_empty() || value.is_empty() {
            return Err(malformed(format!("`{text}` needs a target and a value")));
        }
        let immutable = |name: &str| {
            CompileError::new(
                ErrorKind::ImmutableAssignment,
                line,
                format!("cannot assign twice to immutable `{name}`"),
            )
            .with_help(mut_help(name))
        };

        let checker = Checker::new(&scope.tables, line);
        let assignment = if target.contains('[') {
            let target = checker.array_indexing(target)?;
            let mutable = scope
                .tables
                .array(&target.name)
                .is_some_and(|array| array.mutability.is_mutable());
            if !mutable {
                return Err(immutable(&target.name));
            }
            let value = checker.expect(value, target.ty, &format!("an element of `{}`", target.name))?;
            Assignment::Element { target, value }
        } else {
            if identifier_problem(target).is_some() {
                return Err(malformed(format!("cannot assign to `{target}`")));
            }
            match scope.tables.resolve(target, line)? {
                Descriptor::Variable(variable) => {
                    if !variable.mutability.is_mutable() {
                        return Err(immutable(&variable.name));
                    }
                    let value = checker.expect(value, variable.ty, &format!("`{}`", variable.name))?;
                    Assignment::Variable {
                        name: variable.name,
                        value,
                    }
                }
                Descriptor::Array(array) => {
                    if !array.mutability.is_mutable() {
                        return Err(immutable(&array.name));
                    }
                    let value = checker.array_expression(value, &array.ty)?;
                    Assignment::Array {
                        name: array.name,
                        value,
                    }
                }
                Descriptor::Tuple(tuple) => {
                    if !tuple.mutability.is_mutable() {
                        return Err(immutable(&tuple.name));
                    }
                    let value = checker.tuple_expression(value, &tuple.pattern)?;
                    Assignment::Tuple {
                        name: tuple.name,
                        value,
                    }
                }
                Descriptor::Function(function) => {
                    return Err(malformed(format!("cannot assign to function `{}`", function.name)))
                }
            }
        };
        scope.push(Statement::Assignment(assignment));
        Ok(())
    }
}
