use crate::language::source::brace_counts;

/// Re-indents generated Go by brace depth. Lines starting with `}` are
/// dedented before they are written, and runs of blank lines collapse to one.
pub fn format_go(code: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(code.len());
    let mut depth = 0usize;
    let mut blank = false;
    for line in code.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !blank && !out.is_empty() {
                out.push('\n');
            }
            blank = true;
            continue;
        }
        blank = false;

        let (opened, closed) = brace_counts(line);
        let leading = if line.starts_with('}') { 1 } else { 0 };
        let indent = depth.saturating_sub(leading);
        out.push_str(&" ".repeat(indent * tab_size));
        out.push_str(line);
        out.push('\n');
        depth = (depth + opened).saturating_sub(closed);
    }
    out
}
