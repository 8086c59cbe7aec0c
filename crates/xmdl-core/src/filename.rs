//! Linux-safe path components derived from remote track and album titles.

/// Fallback when a sanitized title comes out empty.
const DEFAULT_COMPONENT: &str = "untitled";

/// Longest component we will produce, in bytes (below Linux NAME_MAX, with
/// headroom for an extension appended by the caller).
const MAX_LEN: usize = 200;

/// Sanitizes a remote title for use as a single path component.
///
/// Titles are human-facing, so interior spaces are kept; only characters
/// that break paths are replaced:
///
/// - NUL, `/`, `\` and control characters become `_`
/// - leading/trailing spaces, dots, and replacement underscores are trimmed
/// - the result is capped at a char boundary below NAME_MAX
/// - an empty result falls back to `"untitled"`
pub fn sanitize_component(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    let capped = if trimmed.len() > MAX_LEN {
        let mut take = MAX_LEN;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        &trimmed[..take]
    } else {
        trimmed
    };

    if capped.is_empty() {
        DEFAULT_COMPONENT.to_string()
    } else {
        capped.to_string()
    }
}
