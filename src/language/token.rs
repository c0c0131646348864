use crate::language::types::Primitive;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1},
    combinator::{all_consuming, map, recognize, value},
    multi::many0,
    sequence::{pair, tuple},
    IResult,
};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    AndAnd,
    OrOr,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Bang,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
            Operator::EqEq => "==",
            Operator::BangEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::Bang => "!",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match all_consuming(operator)(symbol) {
            Ok((_, op)) => Some(op),
            Err(_) => None,
        }
    }

    /// `-` doubles as negation; `!` is only ever prefix.
    pub fn can_be_unary(self) -> bool {
        matches!(self, Operator::Minus | Operator::Bang)
    }

    pub fn can_be_binary(self) -> bool {
        !matches!(self, Operator::Bang)
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::Lt | Operator::Gt | Operator::LtEq | Operator::GtEq
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Longest match first, so `<=` wins over `<`.
pub fn operator(input: &str) -> IResult<&str, Operator> {
    alt((
        value(Operator::AndAnd, tag("&&")),
        value(Operator::OrOr, tag("||")),
        value(Operator::EqEq, tag("==")),
        value(Operator::BangEq, tag("!=")),
        value(Operator::LtEq, tag("<=")),
        value(Operator::GtEq, tag(">=")),
        value(Operator::Lt, tag("<")),
        value(Operator::Gt, tag(">")),
        value(Operator::Bang, tag("!")),
        value(Operator::Plus, tag("+")),
        value(Operator::Minus, tag("-")),
        value(Operator::Star, tag("*")),
        value(Operator::Slash, tag("/")),
    ))(input)
}

pub fn is_operator_char(ch: char) -> bool {
    matches!(ch, '+' | '-' | '*' | '/' | '&' | '|' | '=' | '!' | '<' | '>')
}

/// Coarse class of a scanned token, decided from its text alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenClass {
    Open(char),
    Close(char),
    Operator(Operator),
    Value,
}

pub fn classify(token: &str) -> TokenClass {
    match token {
        "(" => TokenClass::Open('('),
        "{" => TokenClass::Open('{'),
        ")" => TokenClass::Close(')'),
        "}" => TokenClass::Close('}'),
        other => match Operator::from_symbol(other) {
            Some(op) => TokenClass::Operator(op),
            None => TokenClass::Value,
        },
    }
}

pub fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '{' => '}',
        '[' => ']',
        other => other,
    }
}

const KEYWORDS: &[&str] = &[
    "function", "let", "mut", "if", "else", "loop", "break", "continue", "int", "float", "bool",
    "byte", "string", "IO", "true", "false", "arr", "vec",
];

const TARGET_RESERVED: &[&str] = &[
    "case", "chan", "const", "default", "defer", "fallthrough", "for", "func", "go", "goto",
    "import", "interface", "map", "package", "range", "return", "select", "struct", "switch",
    "type", "var", "nil", "fmt", "float64", "panic", "print", "println", "init",
];

/// Escapes Go accepts inside a rune literal.
const BYTE_ESCAPES: &[char] = &['a', 'b', 'f', 'n', 'r', 't', 'v', '\\', '\''];

pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, many0(alt((alphanumeric1, tag("_"))))))(input)
}

/// Why `name` cannot be used as an identifier, if it can't.
pub fn identifier_problem(name: &str) -> Option<String> {
    if all_consuming(identifier)(name).is_err() {
        return Some(format!(
            "`{name}` is not a valid identifier; identifiers start with a letter followed by letters, digits or `_`"
        ));
    }
    if KEYWORDS.contains(&name) || TARGET_RESERVED.contains(&name) {
        return Some(format!("`{name}` is a reserved word"));
    }
    if is_carrier_name(name) {
        return Some(format!("`{name}` collides with a generated tuple type"));
    }
    None
}

fn is_carrier_name(name: &str) -> bool {
    name.strip_prefix("tuple")
        .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

fn float_literal(input: &str) -> IResult<&str, (&str, &str)> {
    map(tuple((digit1, char('.'), digit1)), |(whole, _, frac)| (whole, frac))(input)
}

/// Type of a numeric literal, or `None` if it is malformed (leading zeros,
/// a second decimal point, stray characters).
pub fn numeric_literal(token: &str) -> Option<Primitive> {
    if let Ok((_, (whole, _))) = all_consuming(float_literal)(token) {
        return (whole.len() == 1 || !whole.starts_with('0')).then_some(Primitive::Float);
    }
    if let Ok((_, digits)) = all_consuming(digit1::<&str, nom::error::Error<&str>>)(token) {
        return (digits.len() == 1 || !digits.starts_with('0')).then_some(Primitive::Int);
    }
    None
}

/// A byte literal holds exactly one ASCII character or a one-character escape.
pub fn is_byte_literal(token: &str) -> bool {
    let Some(inner) = token
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    else {
        return false;
    };
    let mut chars = inner.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('\\'), Some(escaped), None) => BYTE_ESCAPES.contains(&escaped),
        (Some(ch), None, None) => ch.is_ascii() && ch != '\'' && ch != '\\',
        _ => false,
    }
}
