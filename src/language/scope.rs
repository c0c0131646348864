use crate::language::{
    ast::Statement,
    errors::{CompileError, CompileResult, ErrorKind},
    types::{ArrayType, Mutability, Primitive, TuplePattern, TypeAnnotation},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Selection,
    Loop,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: Primitive,
    pub mutability: Mutability,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Array {
    pub name: String,
    pub ty: ArrayType,
    pub mutability: Mutability,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tuple {
    pub name: String,
    pub pattern: TuplePattern,
    pub mutability: Mutability,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Variable,
    Array,
    Tuple,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeAnnotation,
}

impl Parameter {
    pub fn kind(&self) -> ParamKind {
        match self.ty {
            TypeAnnotation::Primitive(_) => ParamKind::Variable,
            TypeAnnotation::Array(_) => ParamKind::Array,
            TypeAnnotation::Tuple(_) => ParamKind::Tuple,
        }
    }

    /// Parameters bind like immutable declarations inside the body.
    pub fn descriptor(&self) -> Descriptor {
        let name = self.name.clone();
        let mutability = Mutability::Immutable;
        match &self.ty {
            TypeAnnotation::Primitive(ty) => Descriptor::Variable(Variable {
                name,
                ty: *ty,
                mutability,
            }),
            TypeAnnotation::Array(ty) => Descriptor::Array(Array {
                name,
                ty: ty.clone(),
                mutability,
            }),
            TypeAnnotation::Tuple(pattern) => Descriptor::Tuple(Tuple {
                name,
                pattern: pattern.clone(),
                mutability,
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub returns: TypeAnnotation,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Descriptor {
    Variable(Variable),
    Array(Array),
    Tuple(Tuple),
    Function(Function),
}

impl Descriptor {
    pub fn name(&self) -> &str {
        match self {
            Descriptor::Variable(v) => &v.name,
            Descriptor::Array(a) => &a.name,
            Descriptor::Tuple(t) => &t.name,
            Descriptor::Function(f) => &f.name,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Descriptor::Variable(_) => "variable",
            Descriptor::Array(_) => "array",
            Descriptor::Tuple(_) => "tuple",
            Descriptor::Function(_) => "function",
        }
    }
}

/// The four name tables of one scope. Backed by persistent maps, so copying
/// them into a child scope shares structure instead of duplicating entries.
#[derive(Clone, Debug, Default)]
pub struct SymbolTables {
    variables: im::HashMap<String, Variable>,
    arrays: im::HashMap<String, Array>,
    tuples: im::HashMap<String, Tuple>,
    functions: im::HashMap<String, Function>,
}

impl SymbolTables {
    pub fn declare(&mut self, descriptor: Descriptor, line: usize) -> CompileResult<()> {
        self.ensure_free(descriptor.name(), line)?;
        tracing::trace!(name = descriptor.name(), kind = descriptor.describe(), line, "declare");
        match descriptor {
            Descriptor::Variable(v) => {
                self.variables.insert(v.name.clone(), v);
            }
            Descriptor::Array(a) => {
                self.arrays.insert(a.name.clone(), a);
            }
            Descriptor::Tuple(t) => {
                self.tuples.insert(t.name.clone(), t);
            }
            Descriptor::Function(f) => {
                self.functions.insert(f.name.clone(), f);
            }
        }
        Ok(())
    }

    pub fn ensure_free(&self, name: &str, line: usize) -> CompileResult<()> {
        match self.lookup(name) {
            Some(existing) => Err(CompileError::new(
                ErrorKind::AlreadyDeclared,
                line,
                format!("`{name}` is already declared as a {}", existing.describe()),
            )),
            None => Ok(()),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Descriptor> {
        if let Some(v) = self.variables.get(name) {
            return Some(Descriptor::Variable(v.clone()));
        }
        if let Some(a) = self.arrays.get(name) {
            return Some(Descriptor::Array(a.clone()));
        }
        if let Some(t) = self.tuples.get(name) {
            return Some(Descriptor::Tuple(t.clone()));
        }
        self.functions
            .get(name)
            .map(|f| Descriptor::Function(f.clone()))
    }

    pub fn resolve(&self, name: &str, line: usize) -> CompileResult<Descriptor> {
        self.lookup(name).ok_or_else(|| {
            CompileError::new(
                ErrorKind::NotFound,
                line,
                format!("`{name}` is not declared in this scope"),
            )
        })
    }

    pub fn array(&self, name: &str) -> Option<&Array> {
        self.arrays.get(name)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }
}

/// One lexical scope and the statements parsed into it.
#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub tables: SymbolTables,
    pub statements: Vec<Statement>,
    /// Return domain of the function whose body this is.
    pub returns: Option<TypeAnnotation>,
    /// Kinds of the enclosing scopes, outermost first. Only used for
    /// context checks like "is this `break` inside a loop".
    enclosing: Vec<ScopeKind>,
}

impl Scope {
    pub fn global() -> Self {
        Self {
            kind: ScopeKind::Global,
            tables: SymbolTables::default(),
            statements: Vec::new(),
            returns: None,
            enclosing: Vec::new(),
        }
    }

    pub fn enter_child(&self, kind: ScopeKind) -> Scope {
        let mut enclosing = self.enclosing.clone();
        enclosing.push(self.kind);
        Scope {
            kind,
            tables: self.tables.clone(),
            statements: Vec::new(),
            returns: None,
            enclosing,
        }
    }

    pub fn depth(&self) -> usize {
        self.enclosing.len()
    }

    /// Walks outward until a function boundary looking for a loop.
    pub fn inside_loop(&self) -> bool {
        for kind in std::iter::once(&self.kind).chain(self.enclosing.iter().rev()) {
            match kind {
                ScopeKind::Loop => return true,
                ScopeKind::Function | ScopeKind::Global => return false,
                ScopeKind::Selection => {}
            }
        }
        false
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(name: &str, mutability: Mutability) -> Descriptor {
        Descriptor::Variable(Variable {
            name: name.into(),
            ty: Primitive::Int,
            mutability,
        })
    }

    #[test]
    fn names_are_unique_across_tables() {
        let mut tables = SymbolTables::default();
        tables
            .declare(
                Descriptor::Array(Array {
                    name: "data".into(),
                    ty: ArrayType::new(Primitive::Int, vec![2]),
                    mutability: Mutability::Immutable,
                }),
                1,
            )
            .unwrap();
        let err = tables.declare(int("data", Mutability::Mutable), 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyDeclared);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn child_tables_are_independent_copies() {
        let mut parent = Scope::global().enter_child(ScopeKind::Function);
        parent.tables.declare(int("outer", Mutability::Mutable), 1).unwrap();

        let mut child = parent.enter_child(ScopeKind::Selection);
        child.tables.declare(int("inner", Mutability::Immutable), 2).unwrap();
        parent.tables.declare(int("later", Mutability::Immutable), 3).unwrap();

        assert!(child.tables.lookup("outer").is_some());
        assert!(child.tables.lookup("later").is_none());
        assert!(parent.tables.lookup("inner").is_none());
        assert_eq!(
            parent.tables.resolve("inner", 4).unwrap_err().kind,
            ErrorKind::NotFound
        );
    }

    #[test]
    fn loop_context_stops_at_function_boundary() {
        let function = Scope::global().enter_child(ScopeKind::Function);
        let looped = function.enter_child(ScopeKind::Loop);
        let branch = looped.enter_child(ScopeKind::Selection);
        assert!(branch.inside_loop());
        assert!(!function.enter_child(ScopeKind::Selection).inside_loop());
        assert_eq!(branch.depth(), 3);
    }

    #[test]
    fn parameters_bind_immutably_by_kind() {
        let param = Parameter {
            name: "pair".into(),
            ty: TypeAnnotation::Tuple(TuplePattern::new(vec![Primitive::Int, Primitive::Bool])),
        };
        assert_eq!(param.kind(), ParamKind::Tuple);
        match param.descriptor() {
            Descriptor::Tuple(t) => assert!(!t.mutability.is_mutable()),
            other => panic!("unexpected descriptor {other:?}"),
        }
    }
}
