//! # recall-source
//!
//! WaniKani v2 access for Recall.
//!
//! - [`WaniKaniClient`]: authenticated HTTP client (bearer token plus the
//!   `Wanikani-Revision` header)
//! - [`Paginator`]: lazy `next_url` walker with a record ceiling that keeps
//!   partial results when a page fails
//! - [`WaniKaniApi`]: the endpoints Recall reads, built on [`PageFetch`]
//! - [`normalize`]: raw subject records to [`recall_core::StudyItem`]s
//!
//! Transport failures never panic and rarely abort: list endpoints return a
//! [`Drained`] carrying both the records gathered and the error that cut the
//! walk short.

pub mod api;
pub mod normalize;
pub mod paginate;
pub mod records;

mod client;
mod error;
mod http;

pub use api::WaniKaniApi;
pub use client::WaniKaniClient;
pub use error::SourceError;
pub use normalize::{NormalizeReport, Normalized, SkipReason, normalize_batch};
pub use paginate::{Drained, Page, PageFetch, Paginator};
pub use records::{
    AssignmentData, Resource, ReviewData, ReviewStatisticData, SubjectData, UserData,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_display() {
        let err = SourceError::Api {
            status: 401,
            message: "Unauthorized. Nice try.".into(),
        };
        assert_eq!(err.to_string(), "API error (401): Unauthorized. Nice try.");

        let err = SourceError::RateLimited {
            retry_after_secs: 60,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 60s");
    }

    #[test]
    fn parse_error_from_serde() {
        let err: SourceError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
