use std::fmt;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// Broad family an [`ErrorKind`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Syntax,
    Type,
    Scope,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Lex => "LexError",
            ErrorCategory::Syntax => "SyntaxError",
            ErrorCategory::Type => "TypeError",
            ErrorCategory::Scope => "ScopeError",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    UnterminatedLiteral,
    UnbalancedBrackets,
    InvalidOperator,
    InvalidLiteral,

    UnexpectedToken,
    InvalidIdentifier,
    MalformedDeclaration,
    MalformedAssignment,
    MalformedConditional,
    MisplacedElse,
    MalformedLoop,
    NoExitCondition,
    MalformedFunction,
    UnknownMacro,
    UnclosedScope,
    DeadCode,

    TypeMismatch,
    MixedTypes,
    EmptyExpression,
    NonBooleanCondition,
    ReturnTypeMismatch,
    ArgumentMismatch,
    IndexOutOfBounds,
    DivisionByZero,

    AlreadyDeclared,
    NotFound,
    ImmutableAssignment,
    BreakOutsideLoop,
    ReturnOutsideFunction,
    DisallowedTopLevel,
    NestedFunction,
    MissingMain,
}

impl ErrorKind {
    pub fn category(self) -> ErrorCategory {
        use ErrorKind::*;
        match self {
            UnterminatedLiteral | UnbalancedBrackets | InvalidOperator | InvalidLiteral => {
                ErrorCategory::Lex
            }
            UnexpectedToken | InvalidIdentifier | MalformedDeclaration | MalformedAssignment
            | MalformedConditional | MisplacedElse | MalformedLoop | NoExitCondition
            | MalformedFunction | UnknownMacro | UnclosedScope | DeadCode => ErrorCategory::Syntax,
            TypeMismatch | MixedTypes | EmptyExpression | NonBooleanCondition
            | ReturnTypeMismatch | ArgumentMismatch | IndexOutOfBounds | DivisionByZero => {
                ErrorCategory::Type
            }
            AlreadyDeclared | NotFound | ImmutableAssignment | BreakOutsideLoop
            | ReturnOutsideFunction | DisallowedTopLevel | NestedFunction | MissingMain => {
                ErrorCategory::Scope
            }
        }
    }

    /// Stable diagnostic code, e.g. `stella.alreadyDeclared`.
    pub fn code(self) -> String {
        let debug = format!("{self:?}");
        let mut chars = debug.chars();
        let head = chars
            .next()
            .map(|c| c.to_ascii_lowercase().to_string())
            .unwrap_or_default();
        format!("stella.{head}{}", chars.as_str())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} on line {line}: {message}", kind.category())]
pub struct CompileError {
    pub line: usize,
    pub kind: ErrorKind,
    pub message: String,
    pub help: Option<String>,
}

impl CompileError {
    pub fn new(kind: ErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Re-labels the error, keeping line and message.
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}
