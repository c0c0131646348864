use crate::language::{
    errors::{CompileResult, ErrorKind},
    expression::{Checker, Expression, FunctionCall},
    lexer::scan,
    scope::Descriptor,
    source::{matching_close, split_top_level},
    token::identifier_problem,
    types::{ArrayType, Primitive, TypeAnnotation},
};

/// An array-valued expression. Arrays support no operators, so this is
/// always a literal, a name or a call.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayExpression {
    Literal { ty: ArrayType, items: Vec<ArrayItem> },
    Variable { name: String, ty: ArrayType },
    Call(FunctionCall),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArrayItem {
    Scalar(Expression),
    Row(Vec<ArrayItem>),
}

/// `name[i]...[k]` with one index per dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayIndexing {
    pub name: String,
    pub indices: Vec<Expression>,
    pub ty: Primitive,
}

impl<'a> Checker<'a> {
    pub fn array_expression(&self, text: &str, expected: &ArrayType) -> CompileResult<ArrayExpression> {
        let text = text.trim();
        if text.starts_with('[') {
            let items = self.array_literal(text, expected)?;
            return Ok(ArrayExpression::Literal {
                ty: expected.clone(),
                items,
            });
        }
        let tokens = scan(text, self.line)?;
        let token = match tokens.as_slice() {
            [] => return Err(self.error(ErrorKind::EmptyExpression, "expected an array")),
            [token] => token.as_str(),
            _ => {
                return Err(self.error(
                    ErrorKind::TypeMismatch,
                    format!("`{text}` is not an array; arrays cannot be combined with operators"),
                ))
            }
        };
        if token.ends_with(')') && token.contains('(') {
            let call = self.call(token)?;
            if matches!(&call.returns, TypeAnnotation::Array(ty) if ty == expected) {
                return Ok(ArrayExpression::Call(call));
            }
            return Err(self.error(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, but `{}` returns {}", call.name, call.returns),
            ));
        }
        match self.tables.lookup(token) {
            Some(Descriptor::Array(array)) if array.ty == *expected => Ok(ArrayExpression::Variable {
                name: array.name,
                ty: array.ty,
            }),
            Some(Descriptor::Array(array)) => Err(self.error(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, but `{}` is {}", array.name, array.ty),
            )),
            Some(other) => Err(self.error(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, but `{token}` is a {}", other.describe()),
            )),
            None if identifier_problem(token).is_none() => Err(self.error(
                ErrorKind::NotFound,
                format!("`{token}` is not declared in this scope"),
            )),
            None => Err(self.error(
                ErrorKind::TypeMismatch,
                format!("expected {expected}, found `{token}`"),
            )),
        }
    }

    fn array_literal(&self, text: &str, expected: &ArrayType) -> CompileResult<Vec<ArrayItem>> {
        if matching_close(text, 0) != Some(text.len() - 1) {
            return Err(self.error(
                ErrorKind::UnbalancedBrackets,
                format!("array literal `{text}` is not closed by its final `]`"),
            ));
        }
        let parts = split_top_level(&text[1..text.len() - 1], ',');
        let size = expected.dimensions.first().copied().unwrap_or_default();
        if parts.len() != size {
            return Err(self.error(
                ErrorKind::TypeMismatch,
                format!(
                    "array literal has {} element(s) but {expected} needs {size}",
                    parts.len()
                ),
            ));
        }
        match expected.row() {
            None => parts
                .iter()
                .map(|part| {
                    let element = self.expression(part)?;
                    if element.ty != expected.base {
                        return Err(self.error(
                            ErrorKind::TypeMismatch,
                            format!(
                                "array of {} cannot hold `{part}` of type {}",
                                expected.base, element.ty
                            ),
                        ));
                    }
                    Ok(ArrayItem::Scalar(element))
                })
                .collect(),
            Some(row) => parts
                .iter()
                .map(|part| {
                    if !part.starts_with('[') {
                        return Err(self.error(
                            ErrorKind::TypeMismatch,
                            format!("expected a row of type {row}, found `{part}`"),
                        ));
                    }
                    self.array_literal(part, &row).map(ArrayItem::Row)
                })
                .collect(),
        }
    }

    /// Parses `name[i][j]`, checking every literal index against its dimension.
    pub fn array_indexing(&self, token: &str) -> CompileResult<ArrayIndexing> {
        let open = token.find('[').unwrap_or(token.len());
        let name = &token[..open];
        let mut index_texts = Vec::new();
        let mut cursor = open;
        while cursor < token.len() {
            let close = match matching_close(token, cursor) {
                Some(close) if token[cursor..].starts_with('[') => close,
                _ => {
                    return Err(self.error(
                        ErrorKind::UnexpectedToken,
                        format!("`{token}` is not a well-formed index"),
                    ))
                }
            };
            index_texts.push(&token[cursor + 1..close]);
            cursor = close + 1;
        }
        let array = match self.tables.resolve(name, self.line)? {
            Descriptor::Array(array) => array,
            other => {
                return Err(self.error(
                    ErrorKind::TypeMismatch,
                    format!("`{name}` is a {} and cannot be indexed", other.describe()),
                ))
            }
        };
        if index_texts.len() != array.ty.dimensions.len() {
            return Err(self.error(
                ErrorKind::TypeMismatch,
                format!(
                    "`{name}` has {} dimension(s) but is indexed with {}",
                    array.ty.dimensions.len(),
                    index_texts.len()
                ),
            ));
        }
        let indices = index_texts
            .iter()
            .zip(&array.ty.dimensions)
            .map(|(text, size)| {
                let index = self.expect(text, Primitive::Int, "an array index")?;
                match index.int_constant() {
                    Some(value) if value < 0 || value >= *size as i64 => Err(self.error(
                        ErrorKind::IndexOutOfBounds,
                        format!("index {value} is out of bounds for `{name}` of type {}", array.ty),
                    )
                    .with_help(format!("valid indices run from 0 to {}", size.saturating_sub(1)))),
                    _ => Ok(index),
                }
            })
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(ArrayIndexing {
            name: array.name,
            indices,
            ty: array.ty.base,
        })
    }
}
