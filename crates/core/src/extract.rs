use crate::error::ExtractError;

/// Return the parenthesised span opened at `open_index`, nested parens included.
///
/// `open_index` is a byte offset and must point at `(`.
pub fn extract_balanced(text: &str, open_index: usize) -> Result<&str, ExtractError> {
    extract_balanced_with(text, open_index, '(', ')')
}

/// Like [`extract_balanced`] for an arbitrary delimiter pair.
///
/// Scanning stops at the closer that empties the stack, so the returned span
/// covers the outermost pair and everything nested inside it. Delimiters
/// inside string literals are not special.
pub fn extract_balanced_with(
    text: &str,
    open_index: usize,
    open: char,
    close: char,
) -> Result<&str, ExtractError> {
    let rest = text
        .get(open_index..)
        .filter(|rest| rest.starts_with(open))
        .ok_or(ExtractError::NotAnOpener { index: open_index })?;

    let mut stack: Vec<usize> = Vec::new();
    let mut last_span = None;

    for (offset, ch) in rest.char_indices() {
        let pos = open_index + offset;
        if ch == open {
            stack.push(pos);
        } else if ch == close {
            if let Some(start) = stack.pop() {
                last_span = Some((start, pos + ch.len_utf8()));
            }
            if stack.is_empty() {
                break;
            }
        }
    }

    match last_span {
        Some((start, end)) if stack.is_empty() => Ok(&text[start..end]),
        _ => Err(ExtractError::Unbalanced {
            index: open_index,
            depth: stack.len(),
        }),
    }
}
