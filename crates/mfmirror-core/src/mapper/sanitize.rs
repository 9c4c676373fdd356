//! Path segment sanitization so mapped paths stay under `root/<host>`.

/// Makes one decoded path segment safe to use as a directory or file name.
///
/// - `.` and `..` become `_` and `__`
/// - NUL, `\` and control characters become `_`
pub(super) fn sanitize_segment(segment: &str) -> String {
    match segment {
        "." => return "_".to_string(),
        ".." => return "__".to_string(),
        _ => {}
    }
    segment
        .chars()
        .map(|c| if c == '\0' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}
