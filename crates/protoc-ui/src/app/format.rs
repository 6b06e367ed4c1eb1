//! Display formatting for compiler output.

use crate::domain::model::ExecutionResult;

/// Column width used to hard-wrap compiler error output.
pub const DEFAULT_WRAP_WIDTH: usize = 600;

/// Split `text` into consecutive chunks of at most `width` characters.
///
/// Wrapping is by character count only and ignores word and line boundaries. Chunks always
/// end on a `char` boundary, and concatenating them yields `text` again. A width of zero is
/// treated as one.
pub fn chunk_columns(text: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut chunks = Vec::with_capacity(text.len() / width + 1);
    let mut rest = text;
    while let Some((split, _)) = rest.char_indices().nth(width) {
        let (head, tail) = rest.split_at(split);
        chunks.push(head);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}

/// Hard-wrap `text` at `width` characters, joining the chunks with newlines.
pub fn wrap_columns(text: &str, width: usize) -> String {
    chunk_columns(text, width).join("\n")
}

/// Compose the text shown after an invocation: wrapped stderr, a newline, then raw stdout.
pub fn render_report(result: &ExecutionResult, width: usize) -> String {
    format!("{}\n{}", wrap_columns(&result.stderr, width), result.stdout)
}
