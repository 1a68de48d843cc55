//! Raw WaniKani v2 record shapes.
//!
//! Every field the API might omit is optional here so that an incomplete
//! record deserializes and is rejected later by the normalizer, instead of
//! failing the whole page.

use chrono::{DateTime, Utc};
use recall_core::{Accuracy, IncorrectCounts};
use serde::Deserialize;

/// A single resource envelope: `{"id", "object", "data"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource<T> {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// A collection envelope with its pagination block.
#[derive(Debug, Deserialize)]
pub(crate) struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Pages {
    #[serde(default)]
    pub next_url: Option<String>,
}

// ── Subjects ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubjectData {
    pub characters: Option<String>,
    pub slug: Option<String>,
    pub level: Option<u32>,
    pub meanings: Vec<MeaningRecord>,
    pub readings: Vec<ReadingRecord>,
    pub component_subject_ids: Vec<u64>,
    pub parts_of_speech: Vec<String>,
    pub meaning_mnemonic: Option<String>,
    pub reading_mnemonic: Option<String>,
    pub context_sentences: Vec<ContextSentenceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeaningRecord {
    pub meaning: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingRecord {
    pub reading: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContextSentenceRecord {
    pub en: String,
    pub ja: String,
}

// ── Review statistics ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewStatisticData {
    pub subject_id: Option<u64>,
    pub subject_type: Option<String>,
    pub meaning_percentage: Option<f64>,
    pub reading_percentage: Option<f64>,
    pub meaning_correct: Option<u32>,
    pub meaning_incorrect: Option<u32>,
    pub reading_correct: Option<u32>,
    pub reading_incorrect: Option<u32>,
    pub hidden: bool,
}

impl ReviewStatisticData {
    /// Accuracy per side: the explicit percentage when present, else derived
    /// from the correct/incorrect counters, else 100.
    pub fn accuracy(&self) -> Accuracy {
        Accuracy::from_optional(
            side_pct(self.meaning_percentage, self.meaning_correct, self.meaning_incorrect),
            side_pct(self.reading_percentage, self.reading_correct, self.reading_incorrect),
        )
    }

    pub fn incorrect(&self) -> IncorrectCounts {
        IncorrectCounts {
            meaning: self.meaning_incorrect.unwrap_or(0),
            reading: self.reading_incorrect.unwrap_or(0),
        }
    }

    /// Whether either side is strictly below `threshold`.
    pub fn is_struggling(&self, threshold: u8) -> bool {
        self.accuracy().below(threshold)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn side_pct(explicit: Option<f64>, correct: Option<u32>, incorrect: Option<u32>) -> Option<u8> {
    if let Some(pct) = explicit.filter(|p| p.is_finite()) {
        return Some(pct.round().clamp(0.0, 100.0) as u8);
    }
    let correct = u64::from(correct.unwrap_or(0));
    let total = correct + u64::from(incorrect.unwrap_or(0));
    if total == 0 {
        return None;
    }
    Some(((correct * 100) as f64 / total as f64).round() as u8)
}

// ── Assignments / reviews / user ───────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssignmentData {
    pub subject_id: Option<u64>,
    pub subject_type: Option<String>,
    pub srs_stage: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewData {
    pub subject_id: Option<u64>,
    pub incorrect_meaning_answers: Option<u32>,
    pub incorrect_reading_answers: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ReviewData {
    pub fn had_mistake(&self) -> bool {
        self.incorrect_meaning_answers.unwrap_or(0) > 0
            || self.incorrect_reading_answers.unwrap_or(0) > 0
    }
}

#[derive(Debug, Clone, Default, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct UserData {
    pub username: String,
    pub level: Option<u32>,
}
