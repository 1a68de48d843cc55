//! Cursor pagination over WaniKani collections.
//!
//! A [`Paginator`] follows `pages.next_url` links one page at a time until
//! the link disappears or the record ceiling is reached. A failed page stops
//! the walk; [`Paginator::drain`] keeps whatever was gathered before it.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::records::Collection;

/// One page of a collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next_url: Option<String>,
}

impl<T> From<Collection<T>> for Page<T> {
    fn from(collection: Collection<T>) -> Self {
        Self {
            data: collection.data,
            next_url: collection.pages.and_then(|p| p.next_url),
        }
    }
}

/// Fetches pages and single resources by absolute URL.
///
/// [`crate::WaniKaniClient`] is the HTTP implementation; tests substitute
/// in-memory fixtures.
#[allow(async_fn_in_trait)]
pub trait PageFetch {
    /// Absolute URL for an API path such as `/review_statistics`.
    fn endpoint(&self, path: &str) -> String;

    /// Fetch one collection page.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, non-success status, or
    /// an unparseable body.
    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, SourceError>;

    /// Fetch a single resource.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PageFetch::fetch_page`].
    async fn fetch_resource<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError>;
}

/// Records gathered by [`Paginator::drain`].
#[derive(Debug)]
pub struct Drained<T> {
    pub records: Vec<T>,
    /// The failure that ended the walk early, if any.
    pub error: Option<SourceError>,
    /// Pages fetched successfully.
    pub pages: usize,
    /// True when the ceiling cut the walk short.
    pub hit_ceiling: bool,
}

impl<T> Drained<T> {
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
            error: None,
            pages: 0,
            hit_ceiling: false,
        }
    }

    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Append another walk's records. The first error wins.
    pub fn absorb(&mut self, other: Self) {
        self.records.extend(other.records);
        self.pages += other.pages;
        self.hit_ceiling |= other.hit_ceiling;
        if self.error.is_none() {
            self.error = other.error;
        }
    }
}

impl<T> Default for Drained<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Lazy page walker with a record ceiling.
pub struct Paginator<'a, F: ?Sized, T> {
    fetcher: &'a F,
    next_url: Option<String>,
    remaining: usize,
    pages: usize,
    hit_ceiling: bool,
    _records: PhantomData<fn() -> T>,
}

impl<'a, F, T> Paginator<'a, F, T>
where
    F: PageFetch + ?Sized,
    T: DeserializeOwned,
{
    pub fn new(fetcher: &'a F, start_url: impl Into<String>, ceiling: usize) -> Self {
        Self {
            fetcher,
            next_url: Some(start_url.into()),
            remaining: ceiling,
            pages: 0,
            hit_ceiling: false,
            _records: PhantomData,
        }
    }

    /// Fetch the next page, or `None` once the walk is over.
    ///
    /// After an `Err` the paginator is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Vec<T>, SourceError>> {
        if self.remaining == 0 {
            if self.next_url.take().is_some() && self.pages > 0 {
                self.hit_ceiling = true;
            }
            return None;
        }
        let url = self.next_url.take()?;

        let page = match self.fetcher.fetch_page::<T>(&url).await {
            Ok(page) => page,
            Err(e) => return Some(Err(e)),
        };
        self.pages += 1;

        let mut data = page.data;
        if data.len() > self.remaining {
            data.truncate(self.remaining);
            self.hit_ceiling = true;
        }
        self.remaining -= data.len();

        // An empty page cannot make progress, so it ends the walk.
        if !data.is_empty() {
            self.next_url = page.next_url;
        }
        tracing::debug!(%url, records = data.len(), "fetched page");
        Some(Ok(data))
    }

    /// Walk every remaining page, keeping records gathered before a failure.
    pub async fn drain(mut self) -> Drained<T> {
        let mut records = Vec::new();
        let mut error = None;
        while let Some(page) = self.next_page().await {
            match page {
                Ok(batch) => records.extend(batch),
                Err(e) => {
                    tracing::warn!(%e, gathered = records.len(), "pagination stopped early");
                    error = Some(e);
                }
            }
        }
        Drained {
            records,
            error,
            pages: self.pages,
            hit_ceiling: self.hit_ceiling,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    /// Serves canned JSON bodies keyed by URL; unknown URLs are 404s.
    #[derive(Default)]
    pub struct FixtureFetcher {
        bodies: HashMap<String, Result<String, u16>>,
        pub requested: RefCell<Vec<String>>,
    }

    impl FixtureFetcher {
        pub fn with(mut self, url: &str, body: impl Into<String>) -> Self {
            self.bodies.insert(url.to_string(), Ok(body.into()));
            self
        }

        pub fn failing(mut self, url: &str, status: u16) -> Self {
            self.bodies.insert(url.to_string(), Err(status));
            self
        }

        fn body(&self, url: &str) -> Result<&str, SourceError> {
            self.requested.borrow_mut().push(url.to_string());
            match self.bodies.get(url) {
                Some(Ok(body)) => Ok(body),
                Some(Err(status)) => Err(SourceError::Api {
                    status: *status,
                    message: String::new(),
                }),
                None => Err(SourceError::Api {
                    status: 404,
                    message: format!("no fixture for {url}"),
                }),
            }
        }
    }

    impl PageFetch for FixtureFetcher {
        fn endpoint(&self, path: &str) -> String {
            format!("https://wk.test/v2/{}", path.trim_start_matches('/'))
        }

        async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, SourceError> {
            let collection: Collection<T> = serde_json::from_str(self.body(url)?)?;
            Ok(collection.into())
        }

        async fn fetch_resource<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
            Ok(serde_json::from_str(self.body(url)?)?)
        }
    }

    /// A collection page of bare numbers.
    pub fn numbers(values: std::ops::Range<u32>, next: Option<&str>) -> String {
        let data: Vec<u32> = values.collect();
        serde_json::json!({
            "object": "collection",
            "pages": { "next_url": next },
            "data": data,
        })
        .to_string()
    }
}
