use std::collections::BTreeSet;

/// State accumulated across one compilation and read once by the emitter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompilationContext {
    imports: BTreeSet<&'static str>,
    tuple_arities: BTreeSet<usize>,
}

impl CompilationContext {
    pub fn require_import(&mut self, package: &'static str) {
        if self.imports.insert(package) {
            tracing::trace!(package, "import required");
        }
    }

    pub fn require_tuple(&mut self, arity: usize) {
        if self.tuple_arities.insert(arity) {
            tracing::trace!(arity, "tuple carrier required");
        }
    }

    pub fn imports(&self) -> &BTreeSet<&'static str> {
        &self.imports
    }

    pub fn tuple_arities(&self) -> &BTreeSet<usize> {
        &self.tuple_arities
    }
}
