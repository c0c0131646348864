use crate::language::{
    context::CompilationContext,
    errors::{CompileError, CompileResult, ErrorKind},
};
use nom::{
    branch::alt,
    character::complete::{alpha1, char, digit1, space0},
    combinator::{all_consuming, map, map_opt, map_res},
    multi::{many1, separated_list1},
    sequence::{delimited, pair},
    IResult,
};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Float,
    Bool,
    Byte,
    String,
    /// Only legal as the return type of `main`.
    IO,
}

impl Primitive {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(Primitive::Int),
            "float" => Some(Primitive::Float),
            "bool" => Some(Primitive::Bool),
            "byte" => Some(Primitive::Byte),
            "string" => Some(Primitive::String),
            "IO" => Some(Primitive::IO),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Float => "float",
            Primitive::Bool => "bool",
            Primitive::Byte => "byte",
            Primitive::String => "string",
            Primitive::IO => "IO",
        }
    }

    pub fn go_name(self) -> &'static str {
        match self {
            Primitive::Float => "float64",
            Primitive::IO => "",
            other => other.keyword(),
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Primitive::Int | Primitive::Float)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    Immutable,
    Mutable,
}

impl Mutability {
    pub fn is_mutable(self) -> bool {
        matches!(self, Mutability::Mutable)
    }
}

/// Element type plus fixed dimension sizes, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayType {
    pub base: Primitive,
    pub dimensions: Vec<usize>,
}

impl ArrayType {
    pub fn new(base: Primitive, dimensions: Vec<usize>) -> Self {
        Self { base, dimensions }
    }

    /// Type of one row, or `None` for a one-dimensional array.
    pub fn row(&self) -> Option<ArrayType> {
        if self.dimensions.len() > 1 {
            Some(ArrayType::new(self.base, self.dimensions[1..].to_vec()))
        } else {
            None
        }
    }

    pub fn go_name(&self) -> String {
        let mut out = String::new();
        for dim in &self.dimensions {
            out.push_str(&format!("[{dim}]"));
        }
        out.push_str(self.base.go_name());
        out
    }
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for dim in &self.dimensions {
            write!(f, "[{dim}]")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TuplePattern {
    pub fields: Vec<Primitive>,
}

impl TuplePattern {
    pub fn new(fields: Vec<Primitive>) -> Self {
        Self { fields }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn carrier_name(arity: usize) -> String {
        format!("tuple{arity}")
    }

    pub fn go_name(&self) -> String {
        let args = self
            .fields
            .iter()
            .map(|field| field.go_name())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}[{args}]", Self::carrier_name(self.arity()))
    }
}

impl fmt::Display for TuplePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .fields
            .iter()
            .map(|field| field.keyword())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({fields})")
    }
}

/// A written type. As a function's return type this is its return domain:
/// primitive, derived (array) or tuple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeAnnotation {
    Primitive(Primitive),
    Array(ArrayType),
    Tuple(TuplePattern),
}

impl TypeAnnotation {
    pub fn go_name(&self) -> String {
        match self {
            TypeAnnotation::Primitive(ty) => ty.go_name().to_string(),
            TypeAnnotation::Array(ty) => ty.go_name(),
            TypeAnnotation::Tuple(pattern) => pattern.go_name(),
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, TypeAnnotation::Primitive(Primitive::IO))
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnotation::Primitive(ty) => write!(f, "{ty}"),
            TypeAnnotation::Array(ty) => write!(f, "{ty}"),
            TypeAnnotation::Tuple(pattern) => write!(f, "{pattern}"),
        }
    }
}

fn primitive(input: &str) -> IResult<&str, Primitive> {
    map_opt(alpha1, |word: &str| match Primitive::from_keyword(word) {
        Some(Primitive::IO) | None => None,
        some => some,
    })(input)
}

fn dimension(input: &str) -> IResult<&str, usize> {
    delimited(char('['), map_res(digit1, |digits: &str| digits.parse::<usize>()), char(']'))(input)
}

fn array_type(input: &str) -> IResult<&str, ArrayType> {
    map(pair(primitive, many1(dimension)), |(base, dimensions)| {
        ArrayType::new(base, dimensions)
    })(input)
}

fn tuple_pattern(input: &str) -> IResult<&str, TuplePattern> {
    map(
        delimited(
            pair(char('('), space0),
            separated_list1(delimited(space0, char(','), space0), primitive),
            pair(space0, char(')')),
        ),
        TuplePattern::new,
    )(input)
}

fn io(input: &str) -> IResult<&str, Primitive> {
    map_opt(alpha1, |word: &str| (word == "IO").then_some(Primitive::IO))(input)
}

fn annotation(input: &str) -> IResult<&str, TypeAnnotation> {
    alt((
        map(tuple_pattern, TypeAnnotation::Tuple),
        map(array_type, TypeAnnotation::Array),
        map(primitive, TypeAnnotation::Primitive),
        map(io, TypeAnnotation::Primitive),
    ))(input)
}

/// Parses a type annotation such as `int`, `float[3][2]` or `(int, bool)`,
/// recording the arity of any tuple pattern so its carrier type is emitted.
pub fn parse_annotation(
    text: &str,
    line: usize,
    context: &mut CompilationContext,
) -> CompileResult<TypeAnnotation> {
    let text = text.trim();
    let (_, parsed) = all_consuming(annotation)(text).map_err(|_| {
        CompileError::new(
            ErrorKind::MalformedDeclaration,
            line,
            format!("`{text}` is not a valid type"),
        )
        .with_help(annotation_help())
    })?;
    if let TypeAnnotation::Tuple(pattern) = &parsed {
        context.require_tuple(pattern.arity());
    }
    Ok(parsed)
}

fn annotation_help() -> String {
    "types are `int`, `float`, `bool`, `byte`, `string`, arrays such as `int[3]`, or tuples such as `(int, float)`"
        .into()
}
