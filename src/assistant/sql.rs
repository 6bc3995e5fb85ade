//! Keyword heuristic deciding whether a query can run without confirmation.
//!
//! This is substring matching, not parsing. A column named `update_count` or
//! a string literal containing `drop` rejects an otherwise harmless select,
//! and anything that starts with `select` and avoids the keywords passes.

/// Keywords that indicate writes, CTEs or routine definitions.
const DISALLOWED_PATTERNS: &[&str] = &[
    "insert",
    "update",
    "delete",
    "alter",
    "drop",
    "create",
    "truncate",
    "replace",
    "with",
    "function",
    "procedure",
];

/// Words that contain a disallowed keyword but are harmless on their own.
const ALLOWED_PATTERNS: &[&str] = &["inserted"];

pub fn is_read_only_select(query: &str) -> bool {
    let normalized = query.trim().to_lowercase();

    if !normalized.starts_with("select") {
        return false;
    }

    !DISALLOWED_PATTERNS.iter().any(|pattern| {
        let explained_by_allowed = ALLOWED_PATTERNS
            .iter()
            .any(|allowed| normalized.contains(allowed) && allowed.contains(pattern));

        !explained_by_allowed && normalized.contains(pattern)
    })
}
