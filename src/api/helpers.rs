//! Small formatting helpers for request logging and error messages.

/// Maximum number of characters of a response body kept in errors.
pub(crate) const BODY_SNIPPET_LEN: usize = 500;
/// Shorter limit for decoded values quoted next to a serde path.
pub(crate) const VALUE_SNIPPET_LEN: usize = 200;

/// Trim `text` to `max` characters, appending `...` when truncated.
pub(crate) fn snippet(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        let mut out: String = text.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

/// Name of a GraphQL operation, e.g. `OpenPulls` for `query OpenPulls { .. }`.
///
/// Anonymous documents and mutations are labelled by their first 64
/// characters instead.
pub(crate) fn operation_label(query: &str) -> String {
    let name = query
        .trim_start()
        .strip_prefix("query")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .and_then(|rest| {
            rest.split(|c: char| c.is_whitespace() || c == '(' || c == '{')
                .find(|s| !s.is_empty())
        });
    name.map_or_else(|| snippet(query.trim(), 64), str::to_owned)
}
