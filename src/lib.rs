pub mod language;
pub mod project;
pub mod tools;

#[cfg(test)]
mod tests;

use language::errors::CompileResult;

/// Full source-to-source pipeline: strip comments, parse and check,
/// emit Go, then indent it with `tab_size` spaces.
pub fn compile(source: &str, tab_size: usize) -> CompileResult<String> {
    let source = tools::comments::strip_comments(source);
    let transpiled = language::transpile(&source)?;
    Ok(tools::formatter::format_go(&transpiled.code, tab_size))
}
