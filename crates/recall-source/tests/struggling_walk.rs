//! Walks statistics and subjects through the public API with an in-memory
//! fetcher, the way the session pipeline does.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use recall_core::{Category, SubjectId};
use recall_source::{Page, PageFetch, SourceError, WaniKaniApi, normalize_batch};
use serde::de::DeserializeOwned;

struct Canned(HashMap<&'static str, &'static str>);

impl Canned {
    fn body(&self, url: &str) -> Result<&'static str, SourceError> {
        self.0.get(url).copied().ok_or_else(|| SourceError::Api {
            status: 404,
            message: url.to_string(),
        })
    }
}

#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
    pages: Pages,
}

#[derive(serde::Deserialize)]
struct Pages {
    next_url: Option<String>,
}

impl PageFetch for Canned {
    fn endpoint(&self, path: &str) -> String {
        format!("https://wk.test/v2{path}")
    }

    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, SourceError> {
        let envelope: Envelope<T> = serde_json::from_str(self.body(url)?)?;
        Ok(Page {
            data: envelope.data,
            next_url: envelope.pages.next_url,
        })
    }

    async fn fetch_resource<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        Ok(serde_json::from_str(self.body(url)?)?)
    }
}

const STATS_PAGE_1: &str = r#"{
    "pages": {"next_url": "https://wk.test/v2/review_statistics?page_after_id=2"},
    "data": [
        {"id": 1, "object": "review_statistic", "data": {"subject_id": 440, "meaning_percentage": 60, "reading_percentage": 90, "meaning_incorrect": 4, "reading_incorrect": 1}},
        {"id": 2, "object": "review_statistic", "data": {"subject_id": 441, "meaning_percentage": 98, "reading_percentage": 97}}
    ]
}"#;

const STATS_PAGE_2: &str = r#"{
    "pages": {"next_url": null},
    "data": [
        {"id": 3, "object": "review_statistic", "data": {"subject_id": 1, "meaning_percentage": 50, "meaning_incorrect": 6}}
    ]
}"#;

const SUBJECTS: &str = r#"{
    "pages": {"next_url": null},
    "data": [
        {"id": 1, "object": "radical", "data": {"characters": "一", "meanings": [{"meaning": "Ground", "primary": true}]}},
        {"id": 440, "object": "kanji", "data": {"characters": "一", "meanings": [{"meaning": "One", "primary": true}], "readings": [{"reading": "いち", "primary": true}], "component_subject_ids": [1]}}
    ]
}"#;

fn canned() -> Canned {
    Canned(HashMap::from([
        ("https://wk.test/v2/review_statistics", STATS_PAGE_1),
        (
            "https://wk.test/v2/review_statistics?page_after_id=2",
            STATS_PAGE_2,
        ),
        ("https://wk.test/v2/subjects?ids=440,1", SUBJECTS),
    ]))
}

#[tokio::test]
async fn struggling_statistics_become_study_items() {
    let source = canned();

    let drained = source.review_statistics(500).await;
    assert!(drained.is_complete());
    assert_eq!(drained.pages, 2);

    let struggling: HashMap<u64, _> = drained
        .records
        .into_iter()
        .filter_map(|r| r.data)
        .filter(|s| s.is_struggling(75))
        .filter_map(|s| s.subject_id.map(|id| (id, s)))
        .collect();
    assert_eq!(struggling.len(), 2);

    let ids = [SubjectId(440), SubjectId(1)];
    let subjects = source.subjects(&ids).await;
    assert!(subjects.is_complete());

    let report = normalize_batch(subjects.records, &struggling, &HashMap::new());
    assert!(report.skipped.is_empty());

    let kanji = report
        .items
        .iter()
        .find(|i| i.category == Category::Kanji)
        .unwrap();
    assert_eq!(kanji.accuracy.meaning_pct, 60);
    assert_eq!(kanji.incorrect.meaning, 4);
    assert_eq!(kanji.readings, vec!["いち"]);

    let radical = report
        .items
        .iter()
        .find(|i| i.category == Category::Radical)
        .unwrap();
    assert_eq!(radical.accuracy.reading_pct, 100);
    assert!(radical.readings.is_empty());
}

#[tokio::test]
async fn statistics_ceiling_limits_records() {
    let source = canned();
    let drained = source.review_statistics(1).await;
    assert_eq!(drained.records.len(), 1);
    assert!(drained.hit_ceiling);
    assert!(drained.is_complete());
}
