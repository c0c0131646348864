use crate::language::{
    ast::{Assignment, ClauseKind, Declaration, Jump, MacroKind, Program, ReturnValue, Statement},
    collections::{ArrayExpression, ArrayIndexing, ArrayItem},
    expression::{is_unary_position, Argument, Expression, FunctionCall, Term},
    scope::Scope,
    tuple::{TupleExpression, TupleIndexing},
    types::TuplePattern,
};

/// Renders a checked node as Go source.
pub trait ToGo {
    fn to_go(&self) -> String;
}

impl ToGo for Expression {
    fn to_go(&self) -> String {
        let mut out = String::new();
        for (idx, term) in self.terms.iter().enumerate() {
            if idx > 0 && needs_space(&self.terms, idx) {
                out.push(' ');
            }
            out.push_str(&term.to_go());
        }
        out
    }
}

/// No space after an opening bracket, before a closing one, or after a
/// prefix operator.
fn needs_space(terms: &[Term], idx: usize) -> bool {
    let prev = &terms[idx - 1];
    let prefix = matches!(prev, Term::Operator(_)) && is_unary_position(terms, idx - 1);
    !(prefix || matches!(prev, Term::Open(_)) || matches!(terms[idx], Term::Close(_)))
}

impl ToGo for Term {
    fn to_go(&self) -> String {
        match self {
            Term::Literal { text, .. } => text.clone(),
            Term::Variable { name, .. } => name.clone(),
            Term::Call(call) => call.to_go(),
            Term::Index(index) => index.to_go(),
            Term::Field(field) => field.to_go(),
            Term::Operator(op) => op.symbol().to_string(),
            Term::Open(_) => "(".into(),
            Term::Close(_) => ")".into(),
        }
    }
}

impl ToGo for FunctionCall {
    fn to_go(&self) -> String {
        let args: Vec<_> = self.arguments.iter().map(ToGo::to_go).collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

impl ToGo for Argument {
    fn to_go(&self) -> String {
        match self {
            Argument::Primitive(expression) => expression.to_go(),
            Argument::Array(array) => array.to_go(),
            Argument::Tuple(tuple) => tuple.to_go(),
        }
    }
}

impl ToGo for ArrayExpression {
    fn to_go(&self) -> String {
        match self {
            ArrayExpression::Literal { ty, items } => format!("{}{}", ty.go_name(), row(items)),
            ArrayExpression::Variable { name, .. } => name.clone(),
            ArrayExpression::Call(call) => call.to_go(),
        }
    }
}

fn row(items: &[ArrayItem]) -> String {
    let items: Vec<_> = items.iter().map(ToGo::to_go).collect();
    format!("{{{}}}", items.join(", "))
}

impl ToGo for ArrayItem {
    fn to_go(&self) -> String {
        match self {
            ArrayItem::Scalar(expression) => expression.to_go(),
            ArrayItem::Row(items) => row(items),
        }
    }
}

impl ToGo for ArrayIndexing {
    fn to_go(&self) -> String {
        let mut out = self.name.clone();
        for index in &self.indices {
            out.push_str(&format!("[{}]", index.to_go()));
        }
        out
    }
}

impl ToGo for TupleExpression {
    fn to_go(&self) -> String {
        match self {
            TupleExpression::Literal { pattern, fields } => {
                let fields: Vec<_> = fields
                    .iter()
                    .enumerate()
                    .map(|(idx, field)| format!("v{idx}: {}", field.to_go()))
                    .collect();
                format!("{}{{{}}}", pattern.go_name(), fields.join(", "))
            }
            TupleExpression::Variable { name, .. } => name.clone(),
            TupleExpression::Call(call) => call.to_go(),
        }
    }
}

impl ToGo for TupleIndexing {
    fn to_go(&self) -> String {
        format!("{}.v{}", self.name, self.position)
    }
}

impl ToGo for ReturnValue {
    fn to_go(&self) -> String {
        match self {
            ReturnValue::Primitive(expression) => expression.to_go(),
            ReturnValue::Array(array) => array.to_go(),
            ReturnValue::Tuple(tuple) => tuple.to_go(),
        }
    }
}

/// Renders the whole program: header, imports, tuple carriers and functions.
/// Indentation is left to the formatter.
pub fn emit_program(program: &Program) -> String {
    let mut out = String::from("package main\n\n");
    let imports = program.context.imports();
    for import in imports {
        out.push_str(&format!("import \"{import}\"\n"));
    }
    if !imports.is_empty() {
        out.push('\n');
    }
    for arity in program.context.tuple_arities() {
        out.push_str(&tuple_carrier(*arity));
        out.push('\n');
    }

    let mut first = true;
    for statement in &program.scope.statements {
        if !first {
            out.push('\n');
        }
        first = false;
        let mut lines = Vec::new();
        emit_statement(&mut lines, statement);
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn tuple_carrier(arity: usize) -> String {
    let params: Vec<_> = (0..arity).map(|idx| format!("T{idx} any")).collect();
    let mut out = format!(
        "type {}[{}] struct {{\n",
        TuplePattern::carrier_name(arity),
        params.join(", ")
    );
    for idx in 0..arity {
        out.push_str(&format!("v{idx} T{idx}\n"));
    }
    out.push_str("}\n");
    out
}

fn emit_scope(lines: &mut Vec<String>, scope: &Scope) {
    for statement in &scope.statements {
        emit_statement(lines, statement);
    }
}

fn emit_statement(lines: &mut Vec<String>, statement: &Statement) {
    match statement {
        Statement::Declaration(declaration) => lines.push(match declaration {
            Declaration::Variable { name, ty, value } => {
                format!("var {name} {} = {}", ty.go_name(), value.to_go())
            }
            Declaration::Array { name, ty, value } => {
                format!("var {name} {} = {}", ty.go_name(), value.to_go())
            }
            Declaration::Tuple {
                name,
                pattern,
                value,
            } => format!("var {name} {} = {}", pattern.go_name(), value.to_go()),
        }),
        Statement::Assignment(assignment) => lines.push(match assignment {
            Assignment::Variable { name, value } => format!("{name} = {}", value.to_go()),
            Assignment::Array { name, value } => format!("{name} = {}", value.to_go()),
            Assignment::Tuple { name, value } => format!("{name} = {}", value.to_go()),
            Assignment::Element { target, value } => {
                format!("{} = {}", target.to_go(), value.to_go())
            }
        }),
        Statement::Selection(selection) => {
            for clause in &selection.clauses {
                lines.push(match &clause.kind {
                    ClauseKind::If(condition) => format!("if {} {{", condition.to_go()),
                    ClauseKind::ElseIf(condition) => format!("}} else if {} {{", condition.to_go()),
                    ClauseKind::Else => "} else {".to_string(),
                });
                emit_scope(lines, &clause.body);
            }
        }
        Statement::Loop(looped) => {
            lines.push(format!("for {} {{", looped.condition.to_go()));
            emit_scope(lines, &looped.body);
        }
        Statement::Jump(Jump::Break) => lines.push("break".into()),
        Statement::Jump(Jump::Continue) => lines.push("continue".into()),
        Statement::Function(function) => {
            let signature = &function.signature;
            let params: Vec<_> = signature
                .params
                .iter()
                .map(|param| format!("{} {}", param.name, param.ty.go_name()))
                .collect();
            let returns = if signature.returns.is_io() {
                String::new()
            } else {
                format!(" {}", signature.returns.go_name())
            };
            lines.push(format!(
                "func {}({}){returns} {{",
                signature.name,
                params.join(", ")
            ));
            emit_scope(lines, &function.body);
        }
        Statement::Macro(call) => {
            let target = match call.kind {
                MacroKind::Print => "fmt.Print",
                MacroKind::Println => "fmt.Println",
                MacroKind::Panic => "panic",
            };
            lines.push(format!("{target}({})", call.argument.to_go()));
        }
        Statement::Expression(value) => lines.push(format!("return {}", value.to_go())),
        Statement::ScopeCloser => lines.push("}".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carriers_are_generic_over_each_field() {
        assert_eq!(
            tuple_carrier(2),
            "type tuple2[T0 any, T1 any] struct {\nv0 T0\nv1 T1\n}\n"
        );
    }
}
