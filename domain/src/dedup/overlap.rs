//! Suffix/prefix overlap computation.

/// Length in bytes of the longest suffix of `buffer` that is also a prefix
/// of `token`.
///
/// Candidate lengths are scanned from `min(len(buffer), len(token))` down,
/// stopping at the first match. Only char boundaries of `token` are tried;
/// because UTF-8 is self-synchronising, a byte-level suffix match against a
/// valid `&str` also lands on a char boundary of `buffer`.
pub fn overlap_len(buffer: &str, token: &str) -> usize {
    let max = buffer.len().min(token.len());
    (1..=max)
        .rev()
        .filter(|&k| token.is_char_boundary(k))
        .find(|&k| buffer.ends_with(&token[..k]))
        .unwrap_or(0)
}

/// The part of `token` left after removing its overlap with `buffer`.
pub fn non_overlapping<'a>(buffer: &str, token: &'a str) -> &'a str {
    &token[overlap_len(buffer, token)..]
}
