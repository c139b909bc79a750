//! Various utilities used by the Apollo build tooling

mod result_ext;
pub use result_ext::AnyhowResultExt;

pub type AnyResult<T = (), E = anyhow::Error> = anyhow::Result<T, E>;

/// Shorthand for `Ok(())`, cause it looks ugly
pub const fn ok<E>() -> Result<(), E> {
    Ok(())
}

/// Converts `\r\n` line endings to `\n` and makes sure non-empty text ends with a newline.
///
/// Used when comparing generated text against files that may have been touched by editors or
/// version control on other platforms. Blank lines are significant and kept as they are.
///
/// ## Example
/// ```
/// use apollo_utils::normalize_line_endings;
/// assert_eq!(normalize_line_endings("a\r\nb"), "a\nb\n");
/// assert_eq!(normalize_line_endings("a\n\n"), "a\n\n");
/// assert_eq!(normalize_line_endings(""), "");
/// ```
pub fn normalize_line_endings(text: &str) -> String {
    let mut normalized = text.replace("\r\n", "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}
