//! WaniKani v2 endpoints used by Recall.
//!
//! Implemented once over [`PageFetch`], so every fetcher (the HTTP client or
//! a test fixture) gets the same URL construction and envelope handling.

use chrono::{DateTime, SecondsFormat, Utc};
use recall_core::SubjectId;
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::paginate::{Drained, PageFetch, Paginator};
use crate::records::{
    AssignmentData, Resource, ReviewData, ReviewStatisticData, SubjectData, UserData,
};

/// Upper bound on ids per `?ids=` / `?subject_ids=` request.
pub const SUBJECT_IDS_PER_REQUEST: usize = 100;

#[allow(async_fn_in_trait)]
pub trait WaniKaniApi: PageFetch {
    /// The learner behind the token.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the response has no
    /// user data.
    async fn user(&self) -> Result<UserData, SourceError> {
        let resource: Resource<UserData> = self.fetch_resource(&self.endpoint("/user")).await?;
        resource
            .data
            .ok_or_else(|| SourceError::Parse("user response has no data".to_string()))
    }

    /// Subjects by id, batched into as few requests as the id limit allows.
    /// Stops at the first failed batch.
    async fn subjects(&self, ids: &[SubjectId]) -> Drained<Resource<SubjectData>> {
        by_ids(self, "/subjects?ids=", ids).await
    }

    /// Review statistics for specific subjects, batched like [`Self::subjects`].
    ///
    /// Unlike [`Self::review_statistics`] this is not bounded by a record
    /// ceiling, so it reaches statistics far beyond the first pages.
    async fn review_statistics_for(
        &self,
        ids: &[SubjectId],
    ) -> Drained<Resource<ReviewStatisticData>> {
        by_ids(self, "/review_statistics?subject_ids=", ids).await
    }

    /// Review statistics, newest pages first as the API serves them, up to
    /// `ceiling` records.
    async fn review_statistics(&self, ceiling: usize) -> Drained<Resource<ReviewStatisticData>> {
        let url = self.endpoint("/review_statistics");
        Paginator::<Self, _>::new(self, url, ceiling).drain().await
    }

    /// Assignments currently sitting in any of `stages`.
    async fn assignments_in_stages(
        &self,
        stages: &[u8],
        ceiling: usize,
    ) -> Drained<Resource<AssignmentData>> {
        if stages.is_empty() {
            return Drained::empty();
        }
        let stages = stages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.endpoint(&format!("/assignments?srs_stages={stages}"));
        Paginator::<Self, _>::new(self, url, ceiling).drain().await
    }

    /// Reviews updated after `since`.
    async fn reviews_since(
        &self,
        since: DateTime<Utc>,
        ceiling: usize,
    ) -> Drained<Resource<ReviewData>> {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let url = self.endpoint(&format!(
            "/reviews?updated_after={}",
            urlencoding::encode(&since)
        ));
        Paginator::<Self, _>::new(self, url, ceiling).drain().await
    }
}

impl<F: PageFetch + ?Sized> WaniKaniApi for F {}

/// One bounded walk per chunk of ids, appended to `query`.
async fn by_ids<F, T>(fetcher: &F, query: &str, ids: &[SubjectId]) -> Drained<T>
where
    F: PageFetch + ?Sized,
    T: DeserializeOwned,
{
    let mut drained = Drained::empty();
    for chunk in ids.chunks(SUBJECT_IDS_PER_REQUEST) {
        let url = fetcher.endpoint(&format!("{query}{}", join_ids(chunk)));
        let batch = Paginator::<F, T>::new(fetcher, url, chunk.len()).drain().await;
        drained.absorb(batch);
        if !drained.is_complete() {
            break;
        }
    }
    drained
}

fn join_ids(ids: &[SubjectId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::paginate::fixtures::FixtureFetcher;

    const USER: &str = r#"{
        "object": "user",
        "url": "https://api.wanikani.com/v2/user",
        "data_updated_at": "2024-01-01T00:00:00.000000Z",
        "data": {
            "id": "5a6a5234-a392-4a87-8f3f-33342afe8a42",
            "username": "koichi",
            "level": 12,
            "started_at": "2017-01-01T00:00:00.000000Z"
        }
    }"#;

    fn subjects_page(ids: &[u64]) -> String {
        let data: Vec<_> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "object": "kanji",
                    "data": { "characters": format!("k{id}"), "level": 1 }
                })
            })
            .collect();
        serde_json::json!({ "object": "collection", "pages": { "next_url": null }, "data": data })
            .to_string()
    }

    #[tokio::test]
    async fn user_reads_username_and_level() {
        let fetcher = FixtureFetcher::default().with("https://wk.test/v2/user", USER);
        let user = fetcher.user().await.unwrap();
        assert_eq!(user.username, "koichi");
        assert_eq!(user.level, Some(12));
    }

    #[tokio::test]
    async fn user_without_data_is_an_error() {
        let fetcher =
            FixtureFetcher::default().with("https://wk.test/v2/user", r#"{"object":"user"}"#);
        assert!(matches!(fetcher.user().await, Err(SourceError::Parse(_))));
    }

    #[tokio::test]
    async fn user_failure_propagates() {
        let fetcher = FixtureFetcher::default().failing("https://wk.test/v2/user", 401);
        assert!(matches!(
            fetcher.user().await,
            Err(SourceError::Api { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn subjects_are_fetched_in_batches() {
        let ids: Vec<SubjectId> = (1..=150).map(SubjectId).collect();
        let first: Vec<u64> = (1..=100).collect();
        let second: Vec<u64> = (101..=150).collect();
        let url = |batch: &[u64]| {
            let joined = batch
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("https://wk.test/v2/subjects?ids={joined}")
        };
        let fetcher = FixtureFetcher::default()
            .with(&url(&first), subjects_page(&first))
            .with(&url(&second), subjects_page(&second));

        let drained = fetcher.subjects(&ids).await;
        assert!(drained.is_complete());
        assert_eq!(drained.records.len(), 150);
        assert_eq!(fetcher.requested.borrow().len(), 2);
    }

    #[tokio::test]
    async fn no_subject_ids_means_no_request() {
        let fetcher = FixtureFetcher::default();
        let drained = fetcher.subjects(&[]).await;
        assert!(drained.records.is_empty());
        assert!(fetcher.requested.borrow().is_empty());
    }

    #[tokio::test]
    async fn statistics_for_subjects_use_subject_ids_filter() {
        let fetcher = FixtureFetcher::default().with(
            "https://wk.test/v2/review_statistics?subject_ids=440,441",
            r#"{"object":"collection","pages":{"next_url":null},"data":[
                {"id": 9, "object": "review_statistic", "data": {"subject_id": 441, "meaning_percentage": 55}},
                {"id": 8, "object": "review_statistic", "data": {"subject_id": 440, "meaning_percentage": 60}}
            ]}"#,
        );
        let drained = fetcher
            .review_statistics_for(&[SubjectId(440), SubjectId(441)])
            .await;
        assert!(drained.is_complete(), "{:?}", drained.error);
        let subjects: Vec<Option<u64>> = drained
            .records
            .iter()
            .map(|r| r.data.as_ref().and_then(|d| d.subject_id))
            .collect();
        assert_eq!(subjects, vec![Some(441), Some(440)]);
        assert!(fetcher.review_statistics_for(&[]).await.records.is_empty());
        assert_eq!(fetcher.requested.borrow().len(), 1);
    }

    #[tokio::test]
    async fn assignments_query_lists_stages() {
        let fetcher = FixtureFetcher::default().with(
            "https://wk.test/v2/assignments?srs_stages=1,2",
            r#"{"object":"collection","pages":{"next_url":null},"data":[
                {"id": 7, "object": "assignment", "data": {"subject_id": 440, "srs_stage": 1}}
            ]}"#,
        );
        let drained = fetcher.assignments_in_stages(&[1, 2], 500).await;
        assert!(drained.is_complete());
        let assignment = drained.records[0].data.as_ref().unwrap();
        assert_eq!(assignment.subject_id, Some(440));
        assert_eq!(assignment.srs_stage, Some(1));
    }

    #[tokio::test]
    async fn reviews_since_encodes_timestamp() {
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap();
        let fetcher = FixtureFetcher::default().with(
            "https://wk.test/v2/reviews?updated_after=2024-03-01T06%3A30%3A00Z",
            r#"{"object":"collection","pages":{"next_url":null},"data":[]}"#,
        );
        let drained = fetcher.reviews_since(since, 500).await;
        assert!(drained.is_complete(), "{:?}", drained.error);
    }
}
