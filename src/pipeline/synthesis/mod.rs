//! Confidence banding, urgency assessment and recommendation composition.

pub mod confidence;
pub mod recommendations;
pub mod urgency;

pub use confidence::*;
pub use recommendations::*;
pub use urgency::*;

/// Lowercased text for keyword scans. Typographic apostrophes are folded so
/// "can’t breathe" matches "can't breathe".
pub fn keyword_text(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// True when any keyword occurs as a substring of `haystack`.
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}
