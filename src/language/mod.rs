pub mod ast;
pub mod collections;
pub mod context;
pub mod emit;
pub mod errors;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod source;
pub mod token;
pub mod tuple;
pub mod types;

use context::CompilationContext;
use errors::CompileResult;

/// Unformatted Go output plus the context accumulated while producing it.
#[derive(Clone, Debug)]
pub struct Transpiled {
    pub code: String,
    pub context: CompilationContext,
}

/// Parses, checks and renders comment-free Stella source.
#[tracing::instrument(level = "debug", skip_all, fields(lines = source.lines().count()))]
pub fn transpile(source: &str) -> CompileResult<Transpiled> {
    let program = parser::parse(source)?;
    let code = emit::emit_program(&program);
    tracing::debug!(
        imports = program.context.imports().len(),
        tuples = program.context.tuple_arities().len(),
        bytes = code.len(),
        "transpiled"
    );
    Ok(Transpiled {
        code,
        context: program.context,
    })
}
