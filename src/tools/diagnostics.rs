use crate::language::errors::CompileError;
use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone)]
#[error("{category}: [{code}] {message}")]
pub struct CompileDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    code: String,
    category: String,
    message: String,
    label: String,
}

impl CompileDiagnostic {
    pub fn from_error(path: &Path, source: &str, err: &CompileError) -> Self {
        Self {
            src: NamedSource::new(path.display().to_string(), source.to_string()),
            span: line_span(source, err.line),
            help: err.help.clone(),
            code: err.kind.code(),
            category: err.category().to_string(),
            message: err.message.clone(),
            label: format!("{} on line {}", err.kind, err.line),
        }
    }
}

/// Byte span of the 1-based `line`, without its indentation. Falls back to
/// the end of the file when the line is past it.
fn line_span(source: &str, line: usize) -> SourceSpan {
    let mut offset = 0;
    for (idx, text) in source.split('\n').enumerate() {
        if idx + 1 == line {
            let indent = text.len() - text.trim_start().len();
            let len = text.trim().len();
            return (offset + indent, len).into();
        }
        offset += text.len() + 1;
    }
    (source.len(), 0).into()
}

pub fn emit_compile_error(path: &Path, source: &str, err: &CompileError) {
    let diagnostic = CompileDiagnostic::from_error(path, source, err);
    eprintln!("{:?}", Report::new(diagnostic));
}
