//! Camera direction labels.
//!
//! Labels are free text such as "南向北", "往北", "雙向" or "東西向". They are
//! matched by substring: any cardinal glyph (or English word) anywhere in
//! the label counts, and a label naming no direction at all is treated as
//! covering every direction.

use serde::Serialize;
use speedcam_domain::Cardinal;

/// Markers for cameras that enforce both directions.
const BIDIRECTIONAL_MARKERS: [&str; 2] = ["雙向", "往返"];
const BIDIRECTIONAL_WORDS: [&str; 4] = ["bidirectional", "both ways", "both-ways", "two-way"];

/// Parsed direction label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cardinals", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectionLabel {
    /// No recognizable direction; matches any heading
    Omnidirectional,
    /// Explicit two-way marker; matches any heading
    Bidirectional,
    Single(Cardinal),
    /// Several cardinal tokens, in N/E/S/W order
    Multiple(Vec<Cardinal>),
}

impl DirectionLabel {
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let lower = label.to_lowercase();

        if BIDIRECTIONAL_MARKERS.iter().any(|m| label.contains(m))
            || BIDIRECTIONAL_WORDS.iter().any(|w| lower.contains(w))
        {
            return Self::Bidirectional;
        }

        let mut found: Vec<Cardinal> = Cardinal::ALL
            .into_iter()
            .filter(|c| label.contains(c.glyph()) || lower.contains(c.word()))
            .collect();

        match found.len() {
            0 => Self::Omnidirectional,
            1 => Self::Single(found.remove(0)),
            _ => Self::Multiple(found),
        }
    }

    /// Whether a vehicle travelling towards `heading` is covered.
    #[must_use]
    pub fn matches(&self, heading: Cardinal) -> bool {
        match self {
            Self::Omnidirectional | Self::Bidirectional => true,
            Self::Single(c) => *c == heading,
            Self::Multiple(cs) => cs.contains(&heading),
        }
    }
}
