//! Plan text tokenization
//!
//! Keyword matching is case-insensitive, so comparisons run against a
//! lowercased copy. The original casing of argument tokens is preserved
//! for grounding because identifiers may be case-sensitive in the
//! planning domain.

/// Split a line into non-empty tokens on the given delimiter.
///
/// An empty input line yields an empty sequence, not an error.
pub fn split(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Lowercased copy of a token for keyword comparison
pub fn normalize(token: &str) -> String {
    token.to_lowercase()
}

/// Strip surrounding parentheses from a token. Planner output wraps
/// condition expressions in parens; the tokens in between keep them
/// attached after whitespace splitting.
pub fn strip_parens(token: &str) -> &str {
    token.trim_matches(|c| c == '(' || c == ')')
}
