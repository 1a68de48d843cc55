//! The canonical study item and its small value types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SubjectId
// ---------------------------------------------------------------------------

/// Opaque subject identifier, unique within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SubjectId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The three kinds of learnable unit.
///
/// Declaration order is the canonical iteration order for grouped data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Radical,
    Kanji,
    Vocabulary,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Radical, Self::Kanji, Self::Vocabulary];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Radical => "radical",
            Self::Kanji => "kanji",
            Self::Vocabulary => "vocabulary",
        }
    }

    /// Whether items of this category carry readings.
    #[must_use]
    pub const fn has_readings(self) -> bool {
        matches!(self, Self::Kanji | Self::Vocabulary)
    }

    /// Upper-case tag used in report headings.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Radical => "RADICAL",
            Self::Kanji => "KANJI",
            Self::Vocabulary => "VOCABULARY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    /// Accepts the API object names (`radical`, `kanji`, `vocabulary`,
    /// `kana_vocabulary`) and their plural forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radical" | "radicals" => Ok(Self::Radical),
            "kanji" => Ok(Self::Kanji),
            "vocabulary" | "kana_vocabulary" => Ok(Self::Vocabulary),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Accuracy / IncorrectCounts
// ---------------------------------------------------------------------------

/// Meaning and reading accuracy, each in `0..=100`.
///
/// Defaults to 100/100: no review history is not evidence of struggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accuracy {
    pub meaning_pct: u8,
    pub reading_pct: u8,
}

impl Accuracy {
    pub const PERFECT: u8 = 100;

    /// Build from optional percentages, substituting 100 for absent values
    /// and clamping the rest into range.
    #[must_use]
    pub fn from_optional(meaning: Option<u8>, reading: Option<u8>) -> Self {
        Self {
            meaning_pct: meaning.unwrap_or(Self::PERFECT).min(Self::PERFECT),
            reading_pct: reading.unwrap_or(Self::PERFECT).min(Self::PERFECT),
        }
    }

    /// Whether either side is strictly below `threshold`.
    #[must_use]
    pub const fn below(self, threshold: u8) -> bool {
        self.meaning_pct < threshold || self.reading_pct < threshold
    }
}

impl Default for Accuracy {
    fn default() -> Self {
        Self {
            meaning_pct: Self::PERFECT,
            reading_pct: Self::PERFECT,
        }
    }
}

/// All-time wrong answer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorrectCounts {
    pub meaning: u32,
    pub reading: u32,
}

// ---------------------------------------------------------------------------
// StudyItem
// ---------------------------------------------------------------------------

/// One example sentence attached to a vocabulary subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSentence {
    pub ja: String,
    pub en: String,
}

/// One learnable unit in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyItem {
    pub id: SubjectId,
    pub category: Category,
    /// Display glyph, slug fallback, or `"N/A"`. Never empty.
    pub characters: String,
    pub meanings: Vec<String>,
    /// Empty for radicals.
    pub readings: Vec<String>,
    pub level: u32,
    /// Sub-items this item is built from. Empty for radicals.
    pub component_ids: Vec<SubjectId>,
    pub accuracy: Accuracy,
    pub incorrect: IncorrectCounts,
    /// Memory-strength tier; `None` when never reviewed.
    pub srs_stage: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts_of_speech: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_mnemonic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_mnemonic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_sentence: Option<ContextSentence>,
    /// Recomputed once per run by [`crate::scoring`].
    #[serde(default)]
    pub score: f64,
}

impl StudyItem {
    /// A bare item with default accuracy and no detail fields.
    #[must_use]
    pub fn new(id: impl Into<SubjectId>, category: Category, characters: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            characters: characters.into(),
            meanings: Vec::new(),
            readings: Vec::new(),
            level: 0,
            component_ids: Vec::new(),
            accuracy: Accuracy::default(),
            incorrect: IncorrectCounts::default(),
            srs_stage: None,
            parts_of_speech: Vec::new(),
            meaning_mnemonic: None,
            reading_mnemonic: None,
            context_sentence: None,
            score: 0.0,
        }
    }

    #[must_use]
    pub fn first_meaning(&self) -> Option<&str> {
        self.meanings.first().map(String::as_str)
    }

    /// The mnemonic shown in reports: meaning first, reading as fallback.
    #[must_use]
    pub fn mnemonic(&self) -> Option<&str> {
        self.meaning_mnemonic
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.reading_mnemonic.as_deref().filter(|m| !m.trim().is_empty()))
    }
}
