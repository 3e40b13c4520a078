//! Shared utility functions.

/// Render a payload for a log line: control characters escaped, cut to
/// about `max_bytes` on a char boundary, with `...` when cut.
pub fn log_preview(s: &str, max_bytes: usize) -> String {
    let mut end = s.len().min(max_bytes);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut out: String = s[..end].escape_debug().collect();
    if end < s.len() {
        out.push_str("...");
    }
    out
}
