use crate::language::{
    collections::{ArrayExpression, ArrayIndexing},
    context::CompilationContext,
    expression::Expression,
    scope::{Function, Scope},
    tuple::TupleExpression,
    types::{ArrayType, Primitive, TuplePattern},
};

/// A parsed file: the global scope plus what the emitter must generate for it.
#[derive(Clone, Debug)]
pub struct Program {
    pub scope: Scope,
    pub context: CompilationContext,
}

#[derive(Clone, Debug)]
pub enum Statement {
    Declaration(Declaration),
    Assignment(Assignment),
    Selection(Selection),
    Loop(Loop),
    Jump(Jump),
    Function(FunctionDef),
    Macro(MacroCall),
    /// A bare trailing expression: the function's return value.
    Expression(ReturnValue),
    ScopeCloser,
}

#[derive(Clone, Debug)]
pub enum Declaration {
    Variable {
        name: String,
        ty: Primitive,
        value: Expression,
    },
    Array {
        name: String,
        ty: ArrayType,
        value: ArrayExpression,
    },
    Tuple {
        name: String,
        pattern: TuplePattern,
        value: TupleExpression,
    },
}

#[derive(Clone, Debug)]
pub enum Assignment {
    Variable { name: String, value: Expression },
    Array { name: String, value: ArrayExpression },
    Tuple { name: String, value: TupleExpression },
    Element { target: ArrayIndexing, value: Expression },
}

/// An `if` chain. Every clause owns its block.
#[derive(Clone, Debug)]
pub struct Selection {
    pub clauses: Vec<Clause>,
}

#[derive(Clone, Debug)]
pub struct Clause {
    pub kind: ClauseKind,
    pub body: Scope,
}

#[derive(Clone, Debug)]
pub enum ClauseKind {
    If(Expression),
    ElseIf(Expression),
    Else,
}

#[derive(Clone, Debug)]
pub struct Loop {
    pub condition: Expression,
    pub body: Scope,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Jump {
    Break,
    Continue,
}

#[derive(Clone, Debug)]
pub struct FunctionDef {
    pub signature: Function,
    pub body: Scope,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MacroKind {
    Print,
    Println,
    Panic,
}

impl MacroKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(MacroKind::Print),
            "println" => Some(MacroKind::Println),
            "panic" => Some(MacroKind::Panic),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MacroCall {
    pub kind: MacroKind,
    pub argument: Expression,
}

#[derive(Clone, Debug)]
pub enum ReturnValue {
    Primitive(Expression),
    Array(ArrayExpression),
    Tuple(TupleExpression),
}

impl Statement {
    pub fn is_return(&self) -> bool {
        matches!(self, Statement::Expression(_))
    }

    /// True if a `break` for the innermost enclosing loop appears in this
    /// statement, looking through conditionals but not into nested loops.
    pub fn breaks_loop(&self) -> bool {
        match self {
            Statement::Jump(Jump::Break) => true,
            Statement::Selection(selection) => selection
                .clauses
                .iter()
                .any(|clause| clause.body.statements.iter().any(Statement::breaks_loop)),
            _ => false,
        }
    }
}
