//! Classifier response post-processing
//!
//! The model is asked for a bare label name but sometimes answers with its
//! numbered marker. Normalization trims the response, rewrites a recognized
//! marker prefix to its canonical label, and accepts only an exact member of
//! the canonical set. Anything else is rejected and never stored.

use issuemine_common::Topic;

/// Normalize a raw classifier response into a canonical topic, or reject it.
pub fn normalize_response(raw: &str) -> Option<Topic> {
    let trimmed = raw.trim();

    // The closing paren keeps the three markers disjoint, so checking them
    // in (i), (ii), (iii) order cannot mis-rewrite a longer marker.
    let label = Topic::ALL
        .into_iter()
        .find(|t| trimmed.starts_with(t.marker()))
        .map(|t| t.as_str())
        .unwrap_or(trimmed);

    Topic::from_canonical(label)
}
