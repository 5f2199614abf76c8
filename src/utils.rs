//! Utility functions for string manipulation.

/// Find the nearest valid UTF-8 char boundary at or before the given byte index.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Truncate a string to approximately `max_len` bytes, ensuring valid UTF-8 boundaries.
#[inline]
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        &s[..floor_char_boundary(s, max_len)]
    }
}

/// Truncate a string to at most `max_chars` characters.
///
/// Previews of Japanese text are measured in characters, not bytes.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Render a capped bullet list with a trailing overflow line.
///
/// Returns the rendered lines and the number of items left out.
pub fn capped_lines<T, F>(items: &[T], cap: usize, render: F) -> (Vec<String>, usize)
where
    F: Fn(&T) -> String,
{
    let lines = items.iter().take(cap).map(render).collect();
    (lines, items.len().saturating_sub(cap))
}
