//! Raw subject records -> [`StudyItem`]s.
//!
//! Absent optional fields get explicit defaults (accuracy 100, no mistakes,
//! empty lists). Records missing something an item cannot exist without
//! come back as [`Normalized::Skipped`] so one bad record never sinks the
//! batch.

use std::collections::{HashMap, HashSet};
use std::fmt;

use recall_core::{Category, ContextSentence, StudyItem, SubjectId};

use crate::records::{Resource, ReviewStatisticData, SubjectData};

/// Placeholder glyph when a subject has neither characters nor slug.
pub const MISSING_CHARACTERS: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingId,
    MissingObject,
    MissingData,
    UnknownObject(String),
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => f.write_str("record has no id"),
            Self::MissingObject => f.write_str("record has no object type"),
            Self::MissingData => f.write_str("record has no data"),
            Self::UnknownObject(object) => write!(f, "unknown object type '{object}'"),
            Self::Duplicate => f.write_str("subject already seen"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::large_enum_variant)]
pub enum Normalized {
    Item(StudyItem),
    Skipped { id: Option<u64>, reason: SkipReason },
}

/// Outcome of normalizing a batch: the usable items plus what was dropped.
#[derive(Debug, Default)]
pub struct NormalizeReport {
    pub items: Vec<StudyItem>,
    pub skipped: Vec<(Option<u64>, SkipReason)>,
}

/// Normalize one subject, folding in its review statistic and SRS stage
/// when known.
pub fn normalize(
    subject: Resource<SubjectData>,
    stats: Option<&ReviewStatisticData>,
    srs_stage: Option<u8>,
) -> Normalized {
    let Resource { id, object, data } = subject;
    let Some(raw_id) = id else {
        return Normalized::Skipped {
            id: None,
            reason: SkipReason::MissingId,
        };
    };
    let skip = |reason| Normalized::Skipped {
        id: Some(raw_id),
        reason,
    };
    let Some(object) = object else {
        return skip(SkipReason::MissingObject);
    };
    let Some(data) = data else {
        return skip(SkipReason::MissingData);
    };
    let Ok(category) = object.parse::<Category>() else {
        return skip(SkipReason::UnknownObject(object));
    };

    let mut item = StudyItem::new(raw_id, category, characters(&data));
    item.level = data.level.unwrap_or(0);
    item.meanings = primary_first(data.meanings.into_iter().map(|m| (m.primary, m.meaning)));
    if category.has_readings() {
        item.readings = primary_first(data.readings.into_iter().map(|r| (r.primary, r.reading)));
    }
    if category != Category::Radical {
        item.component_ids = data
            .component_subject_ids
            .into_iter()
            .map(SubjectId)
            .collect();
    }
    item.parts_of_speech = data.parts_of_speech;
    item.meaning_mnemonic = non_blank(data.meaning_mnemonic);
    item.reading_mnemonic = non_blank(data.reading_mnemonic);
    item.context_sentence = data
        .context_sentences
        .into_iter()
        .find(|s| !s.ja.trim().is_empty())
        .map(|s| ContextSentence { ja: s.ja, en: s.en });

    if let Some(stats) = stats {
        item.accuracy = stats.accuracy();
        item.incorrect = stats.incorrect();
    }
    item.srs_stage = srs_stage;

    Normalized::Item(item)
}

/// Normalize subjects in order, skipping bad records and repeated ids.
pub fn normalize_batch(
    subjects: Vec<Resource<SubjectData>>,
    stats: &HashMap<u64, ReviewStatisticData>,
    stages: &HashMap<u64, u8>,
) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let mut seen = HashSet::new();

    for subject in subjects {
        let key = subject.id;
        let outcome = match key {
            Some(id) if !seen.insert(id) => Normalized::Skipped {
                id: Some(id),
                reason: SkipReason::Duplicate,
            },
            _ => {
                let stat = key.and_then(|id| stats.get(&id));
                let stage = key.and_then(|id| stages.get(&id).copied());
                normalize(subject, stat, stage)
            }
        };

        match outcome {
            Normalized::Item(item) => report.items.push(item),
            Normalized::Skipped { id, reason } => {
                tracing::debug!(?id, %reason, "skipping subject record");
                report.skipped.push((id, reason));
            }
        }
    }
    report
}

fn characters(data: &SubjectData) -> String {
    [data.characters.as_deref(), data.slug.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(MISSING_CHARACTERS)
        .to_string()
}

fn primary_first(entries: impl Iterator<Item = (bool, String)>) -> Vec<String> {
    let (primary, rest): (Vec<_>, Vec<_>) = entries.partition(|(is_primary, _)| *is_primary);
    primary.into_iter().chain(rest).map(|(_, text)| text).collect()
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recall_core::{Accuracy, IncorrectCounts};

    const KANJI: &str = r#"{
        "id": 440,
        "object": "kanji",
        "data": {
            "characters": "一",
            "slug": "一",
            "level": 1,
            "meanings": [
                {"meaning": "Uno", "primary": false},
                {"meaning": "One", "primary": true}
            ],
            "readings": [
                {"reading": "いち", "primary": true, "type": "onyomi"},
                {"reading": "ひと", "primary": false, "type": "kunyomi"}
            ],
            "component_subject_ids": [1],
            "meaning_mnemonic": "Lying on the <radical>ground</radical> is something that looks just like the ground.",
            "reading_mnemonic": "As you're sitting there, you hear a <reading>ichi</reading>."
        }
    }"#;

    const RADICAL_IMAGE_ONLY: &str = r#"{
        "id": 8762,
        "object": "radical",
        "data": {
            "characters": null,
            "slug": "stick-man",
            "level": 2,
            "meanings": [{"meaning": "Stick Man", "primary": true}],
            "amalgamation_subject_ids": [440]
        }
    }"#;

    const VOCAB: &str = r#"{
        "id": 2467,
        "object": "vocabulary",
        "data": {
            "characters": "一つ",
            "level": 1,
            "meanings": [{"meaning": "One Thing", "primary": true}],
            "readings": [{"reading": "ひとつ", "primary": true}],
            "component_subject_ids": [440],
            "parts_of_speech": ["numeral", "noun"],
            "context_sentences": [
                {"en": "", "ja": "  "},
                {"en": "Let's eat one.", "ja": "一つ食べよう。"}
            ]
        }
    }"#;

    fn parse(json: &str) -> Resource<SubjectData> {
        serde_json::from_str(json).unwrap()
    }

    fn item(outcome: Normalized) -> StudyItem {
        match outcome {
            Normalized::Item(item) => item,
            Normalized::Skipped { reason, .. } => panic!("skipped: {reason}"),
        }
    }

    #[test]
    fn kanji_keeps_readings_and_components() {
        let kanji = item(normalize(parse(KANJI), None, Some(3)));
        assert_eq!(kanji.id, SubjectId(440));
        assert_eq!(kanji.category, Category::Kanji);
        assert_eq!(kanji.characters, "一");
        assert_eq!(kanji.meanings, vec!["One", "Uno"]);
        assert_eq!(kanji.readings, vec!["いち", "ひと"]);
        assert_eq!(kanji.component_ids, vec![SubjectId(1)]);
        assert_eq!(kanji.srs_stage, Some(3));
        assert_eq!(kanji.accuracy, Accuracy::default());
        assert_eq!(kanji.incorrect, IncorrectCounts::default());
    }

    #[test]
    fn radical_falls_back_to_slug_and_drops_readings() {
        let radical = item(normalize(parse(RADICAL_IMAGE_ONLY), None, None));
        assert_eq!(radical.characters, "stick-man");
        assert!(radical.readings.is_empty());
        assert!(radical.component_ids.is_empty());
    }

    #[test]
    fn characters_fall_back_to_placeholder() {
        let bare = parse(r#"{"id": 5, "object": "radical", "data": {"characters": "", "slug": ""}}"#);
        let radical = item(normalize(bare, None, None));
        assert_eq!(radical.characters, MISSING_CHARACTERS);
        assert_eq!(radical.level, 0);
        assert!(radical.meanings.is_empty());
    }

    #[test]
    fn vocabulary_detail_fields() {
        let vocab = item(normalize(parse(VOCAB), None, None));
        assert_eq!(vocab.parts_of_speech, vec!["numeral", "noun"]);
        assert_eq!(
            vocab.context_sentence,
            Some(ContextSentence {
                ja: "一つ食べよう。".into(),
                en: "Let's eat one.".into(),
            })
        );
        assert!(vocab.meaning_mnemonic.is_none());
    }

    #[test]
    fn kana_vocabulary_maps_to_vocabulary() {
        let kana = parse(
            r#"{"id": 9001, "object": "kana_vocabulary", "data": {"characters": "ああ", "readings": [{"reading": "ああ", "primary": true}]}}"#,
        );
        let vocab = item(normalize(kana, None, None));
        assert_eq!(vocab.category, Category::Vocabulary);
        assert_eq!(vocab.readings, vec!["ああ"]);
    }

    #[test]
    fn statistics_fill_accuracy_and_mistakes() {
        let stats = ReviewStatisticData {
            meaning_percentage: Some(60.0),
            reading_percentage: Some(70.0),
            meaning_incorrect: Some(4),
            reading_incorrect: Some(3),
            ..Default::default()
        };
        let kanji = item(normalize(parse(KANJI), Some(&stats), None));
        assert_eq!(
            kanji.accuracy,
            Accuracy {
                meaning_pct: 60,
                reading_pct: 70
            }
        );
        assert_eq!(
            kanji.incorrect,
            IncorrectCounts {
                meaning: 4,
                reading: 3
            }
        );
    }

    #[test]
    fn missing_required_fields_are_skipped() {
        let cases = [
            (r#"{"object": "kanji", "data": {}}"#, None, SkipReason::MissingId),
            (r#"{"id": 1, "data": {}}"#, Some(1), SkipReason::MissingObject),
            (r#"{"id": 2, "object": "kanji"}"#, Some(2), SkipReason::MissingData),
            (
                r#"{"id": 3, "object": "review", "data": {}}"#,
                Some(3),
                SkipReason::UnknownObject("review".into()),
            ),
        ];
        for (json, id, reason) in cases {
            assert_eq!(normalize(parse(json), None, None), Normalized::Skipped { id, reason });
        }
    }

    #[test]
    fn batch_continues_past_bad_records() {
        let subjects = vec![
            parse(KANJI),
            parse(r#"{"id": 2, "object": "kanji"}"#),
            parse(VOCAB),
            parse(KANJI),
        ];
        let stats = HashMap::from([(
            2467,
            ReviewStatisticData {
                meaning_incorrect: Some(2),
                ..Default::default()
            },
        )]);
        let stages = HashMap::from([(440, 1)]);

        let report = normalize_batch(subjects, &stats, &stages);
        let ids: Vec<u64> = report.items.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![440, 2467]);
        assert_eq!(report.items[0].srs_stage, Some(1));
        assert_eq!(report.items[1].incorrect.meaning, 2);
        assert_eq!(
            report.skipped,
            vec![
                (Some(2), SkipReason::MissingData),
                (Some(440), SkipReason::Duplicate),
            ]
        );
    }
}
