use crate::language::{
    errors::{CompileResult, ErrorKind},
    expression::{Checker, Expression, FunctionCall},
    lexer::scan,
    scope::Descriptor,
    source::{matching_close, split_top_level},
    types::{Primitive, TuplePattern, TypeAnnotation},
};

#[derive(Clone, Debug, PartialEq)]
pub enum TupleExpression {
    Literal {
        pattern: TuplePattern,
        fields: Vec<Expression>,
    },
    Variable {
        name: String,
        pattern: TuplePattern,
    },
    Call(FunctionCall),
}

/// `name.N` reads field `N` of a tuple.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleIndexing {
    pub name: String,
    pub position: usize,
    pub ty: Primitive,
}

impl<'a> Checker<'a> {
    pub fn tuple_expression(
        &self,
        text: &str,
        expected: &TuplePattern,
    ) -> CompileResult<TupleExpression> {
        let text = text.trim();
        if text.starts_with('(') && matching_close(text, 0) == Some(text.len() - 1) {
            let parts = split_top_level(&text[1..text.len() - 1], ',');
            if parts.len() != expected.arity() {
                return Err(self.error(
                    ErrorKind::TypeMismatch,
                    format!(
                        "tuple literal has {} field(s) but {expected} needs {}",
                        parts.len(),
                        expected.arity()
                    ),
                ));
            }
            let fields = parts
                .iter()
                .zip(&expected.fields)
                .enumerate()
                .map(|(position, (part, ty))| {
                    let field = self.expression(part)?;
                    if field.ty != *ty {
                        return Err(self.error(
                            ErrorKind::TypeMismatch,
                            format!(
                                "tuple field {position} of {expected} expects {ty}, found {}",
                                field.ty
                            ),
                        ));
                    }
                    Ok(field)
                })
                .collect::<CompileResult<Vec<_>>>()?;
            return Ok(TupleExpression::Literal {
                pattern: expected.clone(),
                fields,
            });
        }

        let tokens = scan(text, self.line)?;
        let token = match tokens.as_slice() {
            [] => return Err(self.error(ErrorKind::EmptyExpression, "expected a tuple")),
            [token] => token.as_str(),
            _ => {
                return Err(self.error(
                    ErrorKind::TypeMismatch,
                    format!("`{text}` is not a tuple; tuples cannot be combined with operators"),
                ))
            }
        };
        if token.ends_with(')') && token.contains('(') {
            let call = self.call(token)?;
            if matches!(&call.returns, TypeAnnotation::Tuple(pattern) if pattern == expected) {
                return Ok(TupleExpression::Call(call));
            }
            return Err(self.error(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, but `{}` returns {}", call.name, call.returns),
            ));
        }
        match self.tables.resolve(token, self.line)? {
            Descriptor::Tuple(tuple) if tuple.pattern == *expected => Ok(TupleExpression::Variable {
                name: tuple.name,
                pattern: tuple.pattern,
            }),
            Descriptor::Tuple(tuple) => Err(self.error(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, but `{}` is {}", tuple.name, tuple.pattern),
            )),
            other => Err(self.error(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, but `{token}` is a {}", other.describe()),
            )),
        }
    }

    pub fn tuple_indexing(&self, token: &str) -> CompileResult<TupleIndexing> {
        let Some((name, field)) = token.split_once('.') else {
            return Err(self.error(
                ErrorKind::UnexpectedToken,
                format!("`{token}` is not a tuple field access"),
            ));
        };
        let position = match field.parse::<usize>() {
            Ok(position) if position.to_string() == field => position,
            _ => {
                return Err(self.error(
                    ErrorKind::UnexpectedToken,
                    format!("tuple field `{field}` must be a plain integer literal"),
                ))
            }
        };
        let tuple = match self.tables.resolve(name, self.line)? {
            Descriptor::Tuple(tuple) => tuple,
            other => {
                return Err(self.error(
                    ErrorKind::TypeMismatch,
                    format!("`{name}` is a {}, not a tuple", other.describe()),
                ))
            }
        };
        match tuple.pattern.fields.get(position) {
            Some(ty) => Ok(TupleIndexing {
                name: tuple.name,
                position,
                ty: *ty,
            }),
            None => Err(self.error(
                ErrorKind::IndexOutOfBounds,
                format!(
                    "`{name}` has {} field(s); `{token}` is out of bounds",
                    tuple.pattern.arity()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{
        scope::{SymbolTables, Tuple},
        types::Mutability,
    };

    fn tables() -> SymbolTables {
        let mut tables = SymbolTables::default();
        tables
            .declare(
                Descriptor::Tuple(Tuple {
                    name: "t".into(),
                    pattern: TuplePattern::new(vec![Primitive::Int, Primitive::Float]),
                    mutability: Mutability::Immutable,
                }),
                1,
            )
            .unwrap();
        tables
    }

    #[test]
    fn literals_match_arity_and_field_types() {
        let tables = tables();
        let checker = Checker::new(&tables, 2);
        let pattern = TuplePattern::new(vec![Primitive::Int, Primitive::Float]);
        let parsed = checker.tuple_expression("(4, 3.14)", &pattern).unwrap();
        assert!(matches!(parsed, TupleExpression::Literal { ref fields, .. } if fields.len() == 2));
        assert_eq!(
            checker.tuple_expression("(4)", &pattern).unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            checker.tuple_expression("(4, 3)", &pattern).unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
        assert!(matches!(
            checker.tuple_expression("t", &pattern),
            Ok(TupleExpression::Variable { .. })
        ));
    }

    #[test]
    fn field_access_is_bounded_by_arity() {
        let tables = tables();
        let checker = Checker::new(&tables, 2);
        let field = checker.tuple_indexing("t.1").unwrap();
        assert_eq!((field.position, field.ty), (1, Primitive::Float));
        assert_eq!(
            checker.tuple_indexing("t.2").unwrap_err().kind,
            ErrorKind::IndexOutOfBounds
        );
        assert_eq!(
            checker.tuple_indexing("t.01").unwrap_err().kind,
            ErrorKind::UnexpectedToken
        );
        assert_eq!(
            checker.tuple_indexing("u.0").unwrap_err().kind,
            ErrorKind::NotFound
        );
    }
}
