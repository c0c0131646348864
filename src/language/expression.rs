use crate::language::{
    collections::{ArrayExpression, ArrayIndexing},
    errors::{CompileError, CompileResult, ErrorKind},
    lexer::scan,
    scope::{Descriptor, SymbolTables},
    source::{matching_close, split_top_level},
    token::{classify, identifier_problem, is_byte_literal, numeric_literal, Operator, TokenClass},
    tuple::{TupleExpression, TupleIndexing},
    types::{Primitive, TypeAnnotation},
};

/// A resolved token of a primitive expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Literal { text: String, ty: Primitive },
    Variable { name: String, ty: Primitive },
    Call(FunctionCall),
    Index(ArrayIndexing),
    Field(TupleIndexing),
    Operator(Operator),
    Open(char),
    Close(char),
}

impl Term {
    pub fn value_type(&self) -> Option<Primitive> {
        match self {
            Term::Literal { ty, .. } | Term::Variable { ty, .. } => Some(*ty),
            Term::Call(call) => match call.returns {
                TypeAnnotation::Primitive(ty) => Some(ty),
                _ => None,
            },
            Term::Index(index) => Some(index.ty),
            Term::Field(field) => Some(field.ty),
            Term::Operator(_) | Term::Open(_) | Term::Close(_) => None,
        }
    }
}

/// A type-checked expression with exactly one primitive type.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub terms: Vec<Term>,
    pub ty: Primitive,
}

impl Expression {
    /// The value of an integer literal, optionally negated, used for
    /// compile-time bounds checks.
    pub fn int_constant(&self) -> Option<i64> {
        match self.terms.as_slice() {
            [Term::Literal {
                text,
                ty: Primitive::Int,
            }] => text.parse().ok(),
            [Term::Operator(Operator::Minus), Term::Literal {
                text,
                ty: Primitive::Int,
            }] => text.parse::<i64>().ok().map(|value| -value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub returns: TypeAnnotation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Argument {
    Primitive(Expression),
    Array(ArrayExpression),
    Tuple(TupleExpression),
}

fn is_zero_literal(terms: &[Term]) -> bool {
    match strip_enclosing(terms) {
        [Term::Literal { text, ty }] if ty.is_numeric() => text.chars().all(|c| c == '0' || c == '.'),
        _ => false,
    }
}

/// True when the operator at `idx` is used as a prefix operator.
pub fn is_unary_position(terms: &[Term], idx: usize) -> bool {
    idx == 0 || matches!(terms[idx - 1], Term::Operator(_) | Term::Open(_))
}

/// Resolves and type-checks expressions against one scope's tables.
pub struct Checker<'a> {
    pub(crate) tables: &'a SymbolTables,
    pub(crate) line: usize,
}

impl<'a> Checker<'a> {
    pub fn new(tables: &'a SymbolTables, line: usize) -> Self {
        Self { tables, line }
    }

    pub(crate) fn error(&self, kind: ErrorKind, message: impl Into<String>) -> CompileError {
        CompileError::new(kind, self.line, message)
    }

    pub fn expression(&self, text: &str) -> CompileResult<Expression> {
        let tokens = scan(text, self.line)?;
        if tokens.is_empty() {
            return Err(self.error(ErrorKind::EmptyExpression, "expected an expression"));
        }
        self.check_adjacency(&tokens)?;
        let terms = tokens
            .iter()
            .map(|token| self.resolve(token))
            .collect::<CompileResult<Vec<_>>>()?;
        let ty = self.infer(&terms)?;
        Ok(Expression { terms, ty })
    }

    /// Parses `text` and requires it to have type `expected`.
    pub fn expect(&self, text: &str, expected: Primitive, what: &str) -> CompileResult<Expression> {
        let expression = self.expression(text)?;
        if expression.ty != expected {
            return Err(self.error(
                ErrorKind::TypeMismatch,
                format!("{what} expects {expected}, found {}", expression.ty),
            ));
        }
        Ok(expression)
    }

    /// Every token must sit between neighbours that can legally surround it.
    fn check_adjacency(&self, tokens: &[String]) -> CompileResult<()> {
        let classes: Vec<TokenClass> = tokens.iter().map(|t| classify(t)).collect();
        let operand_follows = |next: Option<TokenClass>| match next {
            Some(TokenClass::Value) | Some(TokenClass::Open(_)) => true,
            Some(TokenClass::Operator(op)) => op.can_be_unary(),
            _ => false,
        };
        let operand_ends = |next: Option<TokenClass>| match next {
            None | Some(TokenClass::Close(_)) => true,
            Some(TokenClass::Operator(op)) => op.can_be_binary(),
            _ => false,
        };
        for (idx, class) in classes.iter().enumerate() {
            let prev = idx.checked_sub(1).map(|i| classes[i]);
            let next = classes.get(idx + 1).copied();
            let after_value = matches!(prev, Some(TokenClass::Value) | Some(TokenClass::Close(_)));
            let ok = match class {
                TokenClass::Operator(op) => {
                    let placed = if after_value {
                        op.can_be_binary()
                    } else {
                        op.can_be_unary()
                    };
                    placed && operand_follows(next)
                }
                TokenClass::Value => !after_value && operand_ends(next),
                TokenClass::Open(_) => !after_value && operand_follows(next),
                TokenClass::Close(_) => after_value && operand_ends(next),
            };
            if !ok {
                return Err(self.unexpected(tokens, idx, *class, next));
            }
        }
        Ok(())
    }

    fn unexpected(
        &self,
        tokens: &[String],
        idx: usize,
        class: TokenClass,
        next: Option<TokenClass>,
    ) -> CompileError {
        let token = &tokens[idx];
        match (class, next) {
            (TokenClass::Open(_), Some(TokenClass::Close(_))) => {
                self.error(ErrorKind::EmptyExpression, "empty brackets")
            }
            (TokenClass::Operator(_), None) => self.error(
                ErrorKind::UnexpectedToken,
                format!("operator `{token}` is missing a right-hand operand"),
            ),
            _ => {
                let pair = match (idx.checked_sub(1), tokens.get(idx + 1)) {
                    (_, Some(after)) => format!("{token} {after}"),
                    (Some(before), None) => format!("{} {token}", tokens[before]),
                    (None, None) => token.clone(),
                };
                self.error(
                    ErrorKind::UnexpectedToken,
                    format!("unexpected token sequence `{pair}`"),
                )
            }
        }
    }

    /// Resolves one value token against the scope.
    fn resolve(&self, token: &str) -> CompileResult<Term> {
        match classify(token) {
            TokenClass::Open(ch) => return Ok(Term::Open(ch)),
            TokenClass::Close(ch) => return Ok(Term::Close(ch)),
            TokenClass::Operator(op) => return Ok(Term::Operator(op)),
            TokenClass::Value => {}
        }
        let literal = |ty| {
            Ok(Term::Literal {
                text: token.to_string(),
                ty,
            })
        };
        let first = token.chars().next().unwrap_or_default();
        if first == '"' {
            return literal(Primitive::String);
        }
        if first == '\'' {
            if is_byte_literal(token) {
                return literal(Primitive::Byte);
            }
            return Err(self.error(
                ErrorKind::InvalidLiteral,
                format!("{token} is not a byte literal; bytes hold exactly one ASCII character"),
            ));
        }
        if token == "true" || token == "false" {
            return literal(Primitive::Bool);
        }
        if first.is_ascii_digit() {
            return match numeric_literal(token) {
                Some(Primitive::Int) if token.parse::<i64>().is_err() => Err(self.error(
                    ErrorKind::InvalidLiteral,
                    format!("`{token}` does not fit in an int"),
                )),
                Some(ty) => literal(ty),
                None => Err(self.error(
                    ErrorKind::InvalidLiteral,
                    format!("`{token}` is not a valid number"),
                )
                .with_help("numbers have no leading zeros and at most one decimal point")),
            };
        }
        if first == '[' {
            return Err(self.error(
                ErrorKind::TypeMismatch,
                format!("array literal `{token}` cannot be used as a primitive value"),
            ));
        }
        if !first.is_ascii_alphabetic() {
            return Err(self.error(
                ErrorKind::UnexpectedToken,
                format!("unexpected token `{token}`"),
            ));
        }

        match token.find(|c| matches!(c, '(' | '[' | '.')) {
            Some(idx) if token[idx..].starts_with('(') => {
                let call = self.call(token)?;
                match call.returns {
                    TypeAnnotation::Primitive(Primitive::IO) | TypeAnnotation::Array(_) | TypeAnnotation::Tuple(_) => {
                        Err(self.error(
                            ErrorKind::TypeMismatch,
                            format!(
                                "`{}` returns {} and cannot be used as a primitive value",
                                call.name, call.returns
                            ),
                        ))
                    }
                    TypeAnnotation::Primitive(_) => Ok(Term::Call(call)),
                }
            }
            Some(idx) if token[idx..].starts_with('[') => Ok(Term::Index(self.array_indexing(token)?)),
            Some(_) => Ok(Term::Field(self.tuple_indexing(token)?)),
            None => self.variable(token),
        }
    }

    fn variable(&self, name: &str) -> CompileResult<Term> {
        if let Some(problem) = identifier_problem(name) {
            return Err(self.error(ErrorKind::InvalidIdentifier, problem));
        }
        match self.tables.resolve(name, self.line)? {
            Descriptor::Variable(v) => Ok(Term::Variable {
                name: v.name,
                ty: v.ty,
            }),
            other => Err(self.error(
                ErrorKind::TypeMismatch,
                format!(
                    "`{name}` is a {} and cannot be used as a primitive value",
                    other.describe()
                ),
            )),
        }
    }

    /// Parses `name(arg, ...)` and checks arguments against the declared
    /// parameters, position by position.
    pub fn call(&self, token: &str) -> CompileResult<FunctionCall> {
        let open = token.find('(').unwrap_or(token.len());
        let name = &token[..open];
        if matching_close(token, open) != Some(token.len() - 1) {
            return Err(self.error(
                ErrorKind::UnexpectedToken,
                format!("`{token}` is not a well-formed call"),
            ));
        }
        let function = match self.tables.resolve(name, self.line)? {
            Descriptor::Function(function) => function,
            other => {
                return Err(self.error(
                    ErrorKind::TypeMismatch,
                    format!("`{name}` is a {}, not a function", other.describe()),
                ))
            }
        };
        let args = split_top_level(&token[open + 1..token.len() - 1], ',');
        if args.len() != function.params.len() {
            return Err(self.error(
                ErrorKind::ArgumentMismatch,
                format!(
                    "`{name}` expects {} argument(s) but received {}",
                    function.params.len(),
                    args.len()
                ),
            ));
        }
        let arguments = args
            .iter()
            .zip(&function.params)
            .enumerate()
            .map(|(position, (text, param))| match &param.ty {
                TypeAnnotation::Primitive(expected) => {
                    let expression = self.expression(text)?;
                    if expression.ty != *expected {
                        return Err(self.error(
                            ErrorKind::ArgumentMismatch,
                            format!(
                                "argument {} of `{name}` (`{}`) expects {expected}, found {}",
                                position + 1,
                                param.name,
                                expression.ty
                            ),
                        ));
                    }
                    Ok(Argument::Primitive(expression))
                }
                TypeAnnotation::Array(expected) => {
                    Ok(Argument::Array(self.array_expression(text, expected)?))
                }
                TypeAnnotation::Tuple(expected) => {
                    Ok(Argument::Tuple(self.tuple_expression(text, expected)?))
                }
            })
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(FunctionCall {
            name: function.name,
            arguments,
            returns: function.returns,
        })
    }

    /// Infers the single primitive type of a term sequence.
    fn infer(&self, terms: &[Term]) -> CompileResult<Primitive> {
        let terms = strip_enclosing(terms);
        match terms {
            [] => Err(self.error(ErrorKind::EmptyExpression, "empty expression")),
            [single] => single.value_type().ok_or_else(|| {
                self.error(
                    ErrorKind::EmptyExpression,
                    "expression has no value-producing term",
                )
            }),
            _ => self.infer_operators(terms),
        }
    }

    fn infer_operators(&self, terms: &[Term]) -> CompileResult<Primitive> {
        let mut binary: Vec<Primitive> = Vec::new();
        let mut unary: Vec<Primitive> = Vec::new();
        let mut idx = 0;
        while idx < terms.len() {
            match &terms[idx] {
                Term::Open(_) => {
                    idx = self.close_of(terms, idx)?;
                }
                Term::Operator(op) if is_unary_position(terms, idx) => {
                    let end = self.operand_end(terms, idx + 1)?;
                    let operand = self.infer(&terms[idx + 1..end])?;
                    record(&mut unary, self.unary_result(*op, operand)?);
                }
                Term::Operator(op) => {
                    let start = self.operand_start(terms, idx - 1)?;
                    let left = self.infer(&terms[start..idx])?;
                    let end = self.operand_end(terms, idx + 1)?;
                    let right = self.infer(&terms[idx + 1..end])?;
                    if *op == Operator::Slash && is_zero_literal(&terms[idx + 1..end]) {
                        return Err(self.error(
                            ErrorKind::DivisionByZero,
                            "division by a constant zero",
                        ));
                    }
                    record(&mut binary, self.binary_result(*op, left, right)?);
                }
                _ => {}
            }
            idx += 1;
        }
        let found = if binary.is_empty() { unary } else { binary };
        match found.as_slice() {
            [] => Err(self.error(ErrorKind::EmptyExpression, "expression has no operands")),
            [ty] => Ok(*ty),
            many => {
                let names = many
                    .iter()
                    .map(|ty| ty.keyword())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(self.error(
                    ErrorKind::MixedTypes,
                    format!("expression mixes result types {names}"),
                )
                .with_help("wrap sub-expressions in brackets so each operator sees one type"))
            }
        }
    }

    fn close_of(&self, terms: &[Term], open: usize) -> CompileResult<usize> {
        let mut depth = 0usize;
        for (idx, term) in terms.iter().enumerate().skip(open) {
            match term {
                Term::Open(_) => depth += 1,
                Term::Close(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(idx);
                    }
                }
                _ => {}
            }
        }
        Err(self.error(ErrorKind::UnbalancedBrackets, "bracket is never closed"))
    }

    /// Exclusive end of the operand starting at `start`, following prefix
    /// operators and bracket groups.
    fn operand_end(&self, terms: &[Term], start: usize) -> CompileResult<usize> {
        match terms.get(start) {
            Some(Term::Open(_)) => Ok(self.close_of(terms, start)? + 1),
            Some(Term::Operator(_)) => self.operand_end(terms, start + 1),
            Some(Term::Close(_)) | None => Err(self.error(
                ErrorKind::UnexpectedToken,
                "operator is missing an operand",
            )),
            Some(_) => Ok(start + 1),
        }
    }

    /// Start of the operand ending at `end` (inclusive).
    fn operand_start(&self, terms: &[Term], end: usize) -> CompileResult<usize> {
        match &terms[end] {
            Term::Close(_) => {
                let mut depth = 0usize;
                for idx in (0..=end).rev() {
                    match terms[idx] {
                        Term::Close(_) => depth += 1,
                        Term::Open(_) => {
                            depth -= 1;
                            if depth == 0 {
                                return Ok(idx);
                            }
                        }
                        _ => {}
                    }
                }
                Err(self.error(ErrorKind::UnbalancedBrackets, "bracket is never opened"))
            }
            Term::Operator(_) | Term::Open(_) => Err(self.error(
                ErrorKind::UnexpectedToken,
                "operator is missing a left-hand operand",
            )),
            _ => Ok(end),
        }
    }

    fn unary_result(&self, op: Operator, operand: Primitive) -> CompileResult<Primitive> {
        match op {
            Operator::Minus if operand.is_numeric() => Ok(operand),
            Operator::Bang if operand == Primitive::Bool => Ok(Primitive::Bool),
            Operator::Minus | Operator::Bang => Err(self.error(
                ErrorKind::TypeMismatch,
                format!("`{op}` cannot be applied to {operand}"),
            )),
            other => Err(self.error(
                ErrorKind::UnexpectedToken,
                format!("`{other}` is not a prefix operator"),
            )),
        }
    }

    fn binary_result(&self, op: Operator, left: Primitive, right: Primitive) -> CompileResult<Primitive> {
        let mismatch = |detail: &str| {
            Err(self.error(
                ErrorKind::TypeMismatch,
                format!("cannot apply `{op}` to {left} and {right}: {detail}"),
            ))
        };
        match op {
            Operator::Plus if left == Primitive::String && right == Primitive::String => {
                Ok(Primitive::String)
            }
            Operator::Plus | Operator::Minus | Operator::Star | Operator::Slash => {
                if !left.is_numeric() || !right.is_numeric() {
                    mismatch("arithmetic needs numeric operands")
                } else if left != right {
                    mismatch("int and float never mix implicitly")
                } else {
                    Ok(left)
                }
            }
            Operator::AndAnd | Operator::OrOr => {
                if left == Primitive::Bool && right == Primitive::Bool {
                    Ok(Primitive::Bool)
                } else {
                    mismatch("both sides must be bool")
                }
            }
            Operator::EqEq | Operator::BangEq | Operator::Lt | Operator::Gt | Operator::LtEq | Operator::GtEq => {
                if left != right {
                    mismatch("comparisons need operands of the same type")
                } else if op.is_ordering() && left == Primitive::Bool {
                    mismatch("bool values have no ordering")
                } else {
                    Ok(Primitive::Bool)
                }
            }
            Operator::Bang => Err(self.error(
                ErrorKind::UnexpectedToken,
                "`!` cannot join two operands",
            )),
        }
    }
}

fn record(found: &mut Vec<Primitive>, ty: Primitive) {
    if !found.contains(&ty) {
        found.push(ty);
    }
}

/// Drops bracket pairs that enclose the whole sequence.
fn strip_enclosing(mut terms: &[Term]) -> &[Term] {
    while let (Some(Term::Open(_)), Some(Term::Close(_))) = (terms.first(), terms.last()) {
        let mut depth = 0usize;
        let mut closes_at_end = false;
        for (idx, term) in terms.iter().enumerate() {
            match term {
                Term::Open(_) => depth += 1,
                Term::Close(_) => {
                    depth -= 1;
                    if depth == 0 {
                        closes_at_end = idx == terms.len() - 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        if !closes_at_end {
            break;
        }
        terms = &terms[1..terms.len() - 1];
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{
        scope::{Array, Function, Parameter, Tuple, Variable},
        types::{ArrayType, Mutability, TuplePattern},
    };

    fn tables() -> SymbolTables {
        let mut tables = SymbolTables::default();
        let var = |name: &str, ty| {
            Descriptor::Variable(Variable {
                name: name.into(),
                ty,
                mutability: Mutability::Mutable,
            })
        };
        tables.declare(var("n", Primitive::Int), 1).unwrap();
        tables.declare(var("x", Primitive::Float), 1).unwrap();
        tables.declare(var("flag", Primitive::Bool), 1).unwrap();
        tables.declare(var("name", Primitive::String), 1).unwrap();
        tables
            .declare(
                Descriptor::Array(Array {
                    name: "foo".into(),
                    ty: ArrayType::new(Primitive::Int, vec![3]),
                    mutability: Mutability::Immutable,
                }),
                1,
            )
            .unwrap();
        tables
            .declare(
                Descriptor::Tuple(Tuple {
                    name: "tup".into(),
                    pattern: TuplePattern::new(vec![Primitive::Int, Primitive::Float]),
                    mutability: Mutability::Immutable,
                }),
                1,
            )
            .unwrap();
        tables
            .declare(
                Descriptor::Function(Function {
                    name: "bar".into(),
                    params: vec![Parameter {
                        name: "values".into(),
                        ty: TypeAnnotation::Array(ArrayType::new(Primitive::Int, vec![3])),
                    }],
                    returns: TypeAnnotation::Primitive(Primitive::Bool),
                }),
                1,
            )
            .unwrap();
        tables
            .declare(
                Descriptor::Function(Function {
                    name: "baz".into(),
                    params: vec![
                        Parameter {
                            name: "a".into(),
                            ty: TypeAnnotation::Primitive(Primitive::Float),
                        },
                        Parameter {
                            name: "b".into(),
                            ty: TypeAnnotation::Primitive(Primitive::Int),
                        },
                    ],
                    returns: TypeAnnotation::Primitive(Primitive::Float),
                }),
                1,
            )
            .unwrap();
        tables
    }

    fn type_of(src: &str) -> CompileResult<Primitive> {
        let tables = tables();
        Checker::new(&tables, 9).expression(src).map(|e| e.ty)
    }

    fn error_kind(src: &str) -> ErrorKind {
        type_of(src).expect_err("expected an error").kind
    }

    #[test]
    fn infers_literal_types() {
        assert_eq!(type_of(r#""string test""#).unwrap(), Primitive::String);
        assert_eq!(type_of("'h'").unwrap(), Primitive::Byte);
        assert_eq!(type_of("3.25").unwrap(), Primitive::Float);
        assert_eq!(type_of("false").unwrap(), Primitive::Bool);
    }

    #[test]
    fn infers_compound_expressions() {
        assert_eq!(type_of("(1 + 1) == 2").unwrap(), Primitive::Bool);
        assert_eq!(type_of("foo[2]").unwrap(), Primitive::Int);
        assert_eq!(type_of("bar(foo)").unwrap(), Primitive::Bool);
        assert_eq!(
            type_of("baz(x, n) == (((6.5 + 1.0) > 3.14) || (true == false))").unwrap_err().kind,
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            type_of("(baz(x, n) > 1.5) == (((6.5 + 1.0) > 3.14) || (true == false))").unwrap(),
            Primitive::Bool
        );
        assert_eq!(type_of(r#""foo" + "bar""#).unwrap(), Primitive::String);
        assert_eq!(type_of("tup.1").unwrap(), Primitive::Float);
        assert_eq!(type_of("n + n * 2 - 1").unwrap(), Primitive::Int);
        assert_eq!(type_of("{n + 1} * 2").unwrap(), Primitive::Int);
    }

    #[test]
    fn handles_prefix_operators() {
        assert_eq!(type_of("-n").unwrap(), Primitive::Int);
        assert_eq!(type_of("-(x + 1.0)").unwrap(), Primitive::Float);
        assert_eq!(type_of("!flag").unwrap(), Primitive::Bool);
        assert_eq!(type_of("n * -2").unwrap(), Primitive::Int);
        assert_eq!(type_of("!flag && (n < 3)").unwrap(), Primitive::Bool);
        assert_eq!(type_of("((n))").unwrap(), Primitive::Int);
        assert_eq!(error_kind("!n"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("-flag"), ErrorKind::TypeMismatch);
    }

    #[test]
    fn rejects_ill_typed_operands() {
        assert_eq!(error_kind("flag + n"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("n + x"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("name - name"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("n && flag"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("flag < flag"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("n == name"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("n < n + 1"), ErrorKind::MixedTypes);
        assert_eq!(error_kind("baz(n, n)"), ErrorKind::ArgumentMismatch);
        assert_eq!(error_kind("baz(x)"), ErrorKind::ArgumentMismatch);
        assert_eq!(error_kind("n / 0"), ErrorKind::DivisionByZero);
        assert_eq!(error_kind("x / (0.0)"), ErrorKind::DivisionByZero);
        assert_eq!(error_kind("99999999999999999999"), ErrorKind::InvalidLiteral);
    }

    #[test]
    fn rejects_malformed_adjacency() {
        assert_eq!(error_kind("n n"), ErrorKind::UnexpectedToken);
        assert_eq!(error_kind("n +"), ErrorKind::UnexpectedToken);
        assert_eq!(error_kind("* n"), ErrorKind::UnexpectedToken);
        assert_eq!(error_kind("n ! flag"), ErrorKind::UnexpectedToken);
        assert_eq!(error_kind("(n) (n)"), ErrorKind::UnexpectedToken);
        assert_eq!(error_kind("()"), ErrorKind::EmptyExpression);
        assert_eq!(error_kind(""), ErrorKind::EmptyExpression);
    }

    #[test]
    fn resolves_names_and_literals() {
        assert_eq!(error_kind("missing + 1"), ErrorKind::NotFound);
        assert_eq!(error_kind("foo + 1"), ErrorKind::TypeMismatch);
        assert_eq!(error_kind("012"), ErrorKind::InvalidLiteral);
        assert_eq!(error_kind("'ab'"), ErrorKind::InvalidLiteral);
        assert_eq!(error_kind("foo[3]"), ErrorKind::IndexOutOfBounds);
        assert_eq!(error_kind("tup.2"), ErrorKind::IndexOutOfBounds);
        assert_eq!(error_kind("n(1)"), ErrorKind::TypeMismatch);
    }

    #[test]
    fn lone_int_literals_expose_their_value() {
        let tables = tables();
        let checker = Checker::new(&tables, 1);
        assert_eq!(checker.expression("2").unwrap().int_constant(), Some(2));
        assert_eq!(checker.expression("-1").unwrap().int_constant(), Some(-1));
        assert_eq!(checker.expression("n").unwrap().int_constant(), None);
    }
}
