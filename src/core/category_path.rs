//! Category text normalization into hierarchical paths
//!
//! `"Transporte > Apps > Uber"` becomes `["transporte", "apps", "uber"]`.
//! Segments are lowercased, accent-stripped and reduced to `[a-z0-9 ]`, so
//! `"Alimentação"` and `"alimentacao"` land in the same bucket.

use crate::types::PATH_SEPARATOR;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Segment used when nothing usable is left of the category text
pub const FALLBACK_SEGMENT: &str = "outros";

/// Display label paired with [`FALLBACK_SEGMENT`]
pub const FALLBACK_DISPLAY: &str = "Outros";

const HIERARCHY_DELIMITERS: [char; 3] = ['>', '/', ':'];

/// Normalize without the fallback; may return an empty string
fn normalize_raw(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let stripped: String = lowered
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a single path segment
///
/// An empty result becomes `"outros"`.
pub fn normalize_segment(raw: &str) -> String {
    let normalized = normalize_raw(raw);
    if normalized.is_empty() {
        FALLBACK_SEGMENT.to_string()
    } else {
        normalized
    }
}

/// Split category text on `>`, `/` or `:` and normalize every piece
///
/// Pieces that normalize to nothing are dropped; the result is never empty.
pub fn to_path(raw: &str) -> Vec<String> {
    let path: Vec<String> = raw
        .split(HIERARCHY_DELIMITERS)
        .map(normalize_raw)
        .filter(|segment| !segment.is_empty())
        .collect();

    if path.is_empty() {
        vec![FALLBACK_SEGMENT.to_string()]
    } else {
        path
    }
}

/// Human-readable label for the same category text
///
/// Keeps the original spelling of every piece that survives normalization.
pub fn display_label(raw: &str) -> String {
    let pieces: Vec<&str> = raw
        .split(HIERARCHY_DELIMITERS)
        .map(str::trim)
        .filter(|piece| !normalize_raw(piece).is_empty())
        .collect();

    if pieces.is_empty() {
        FALLBACK_DISPLAY.to_string()
    } else {
        pieces.join(PATH_SEPARATOR)
    }
}

/// Join path segments into an aggregation key
pub fn join_path(segments: &[String]) -> String {
    segments.join(PATH_SEPARATOR)
}
