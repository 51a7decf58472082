//! Utility functions for mapping operations.

/// Normalizes text for comparison by lowercasing and replacing separators
/// and unit markers with spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\', '(', ')', '#', ':'], " ")
        .replace("m²", " ")
        .replace("m2", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
