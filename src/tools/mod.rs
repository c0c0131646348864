pub mod comments;
pub mod diagnostics;
pub mod formatter;
