use std::fmt;

use serde::{Deserialize, Serialize};

use super::Position;
use crate::ArtworkId;

/// Reading speed of the narration voice, in words per minute
pub const NARRATION_WORDS_PER_MINUTE: f64 = 140.0;

/// Broad artwork category used to diversify a tour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkType {
    Painting,
    Sculpture,
    Photography,
    Other,
}

impl ArtworkType {
    /// Classifies an artwork from its materials and technique description
    pub fn classify(materials: &str) -> Self {
        let materials = materials.to_lowercase();
        let mentions = |keys: &[&str]| keys.iter().any(|key| materials.contains(key));

        if mentions(&["oil", "canvas", "paint", "huile", "toile", "peinture"]) {
            Self::Painting
        } else if mentions(&["bronze", "marble", "sculpt", "marbre"]) {
            Self::Sculpture
        } else if mentions(&["photo", "gelatin", "argentique"]) {
            Self::Photography
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for ArtworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Painting => "painting",
            Self::Sculpture => "sculpture",
            Self::Photography => "photography",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// A point of interest of the museum with its pre-computed narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ArtworkId,
    pub title: String,
    pub position: Position,
    pub narration_text: String,
    /// Authoritative narration length, supplied with the catalogue
    pub narration_duration_seconds: f64,
    #[serde(rename = "type")]
    pub kind: ArtworkType,
}

/// Estimated narration length of a text read at
/// [`NARRATION_WORDS_PER_MINUTE`]
#[allow(clippy::cast_precision_loss)]
pub fn estimate_narration_seconds(text: &str) -> f64 {
    let words = text.split_whitespace().count();
    words as f64 / NARRATION_WORDS_PER_MINUTE * 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_materials() {
        assert_eq!(ArtworkType::classify("Oil on canvas"), ArtworkType::Painting);
        assert_eq!(ArtworkType::classify("Huile sur toile"), ArtworkType::Painting);
        assert_eq!(ArtworkType::classify("Cast BRONZE"), ArtworkType::Sculpture);
        assert_eq!(
            ArtworkType::classify("silver gelatin print"),
            ArtworkType::Photography
        );
        assert_eq!(ArtworkType::classify(""), ArtworkType::Other);
        assert_eq!(ArtworkType::classify("tapestry"), ArtworkType::Other);
    }

    #[test]
    fn narration_estimate_uses_word_count() {
        let text = vec!["word"; 140].join(" ");
        assert!((estimate_narration_seconds(&text) - 60.0).abs() < 1e-9);
        assert_eq!(estimate_narration_seconds("   "), 0.0);
    }

    #[test]
    fn kind_serializes_as_type() {
        let artwork = Artwork {
            id: 7,
            title: "Still life".to_string(),
            position: Position::new(1.0, 2.0, 3, 0),
            narration_text: String::new(),
            narration_duration_seconds: 90.0,
            kind: ArtworkType::Sculpture,
        };
        let value = serde_json::to_value(&artwork).unwrap();
        assert_eq!(value["type"], "sculpture");
    }
}
