//! # recall-commentary
//!
//! Short etymology notes for selected study items, keyed by the item's
//! characters.
//!
//! Commentary is decoration: [`CommentarySource::annotate`] never fails.
//! Any transport, API or parse problem is logged and becomes an empty map,
//! and the renderer simply omits the line.

mod anthropic;
mod error;

pub use anthropic::AnthropicCommentary;
pub use error::CommentaryError;

use recall_core::{Category, CommentaryMap, StudyItem};
use serde::Serialize;

/// What the model is told about one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentaryRequest {
    pub characters: String,
    pub category: Category,
    pub meanings: Vec<String>,
    pub readings: Vec<String>,
}

impl From<&StudyItem> for CommentaryRequest {
    fn from(item: &StudyItem) -> Self {
        Self {
            characters: item.characters.clone(),
            category: item.category,
            meanings: item.meanings.clone(),
            readings: item.readings.clone(),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait CommentarySource {
    /// Notes for as many of `requests` as the source can produce.
    async fn annotate(&self, requests: &[CommentaryRequest]) -> CommentaryMap;
}

/// Produces nothing. Used when commentary is disabled or unconfigured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommentary;

impl CommentarySource for NoCommentary {
    async fn annotate(&self, _requests: &[CommentaryRequest]) -> CommentaryMap {
        CommentaryMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_from_item() {
        let mut item = StudyItem::new(440, Category::Kanji, "一");
        item.meanings = vec!["One".into()];
        item.readings = vec!["いち".into()];
        let request = CommentaryRequest::from(&item);
        assert_eq!(request.characters, "一");
        assert_eq!(request.category, Category::Kanji);
        assert_eq!(request.readings, vec!["いち"]);
    }

    #[tokio::test]
    async fn no_commentary_is_empty() {
        let request = CommentaryRequest::from(&StudyItem::new(1, Category::Radical, "一"));
        assert!(NoCommentary.annotate(&[request]).await.is_empty());
    }
}
