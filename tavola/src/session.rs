//! The session façade: composes the fetch orchestrator, the multi-series
//! merge, and a pluggable result representation behind one blocking API.

use std::marker::PhantomData;
use std::sync::Arc;

use tavola_core::{
    FetchObserver, Fetcher, RetryPolicy, SortOrder, TabularResult, TavolaError, Transport, Url,
    merge_series,
};

use crate::codec;
use crate::format::{Raw, ResponseFormat, Typed};
use crate::request::{DatasetCode, DatasetRequest, SearchQuery};

/// Base URL of the hosted service; override for self-hosted or compatible
/// deployments.
pub const DEFAULT_BASE_URL: &str = "https://api.tavola.dev/v1/";

/// Query parameter carrying the opaque credential token.
const API_KEY_PARAM: &str = "api_key";

/// Builder for a [`Session`].
///
/// A transport must be supplied; everything else has defaults. The same
/// builder produces typed or raw sessions depending on the requested
/// representation.
pub struct SessionBuilder {
    transport: Option<Arc<dyn Transport>>,
    base_url: Option<Url>,
    api_key: Option<String>,
    policy: RetryPolicy,
    observer: Option<Box<dyn FetchObserver>>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// A builder with the default base URL and retry policy and no transport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: None,
            base_url: None,
            api_key: None,
            policy: RetryPolicy::default(),
            observer: None,
        }
    }

    /// Supply the transport the session issues requests through.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Point the session at a different service deployment.
    #[must_use]
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Opaque credential token, appended to every request as `api_key`.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Retry policy governing transient-failure handling.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Observe orchestration events instead of the default tracing sink.
    #[must_use]
    pub fn observer(mut self, observer: Box<dyn FetchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    /// Returns [`TavolaError::InvalidArg`] when no transport was supplied or
    /// the base URL cannot serve as a base.
    pub fn build<F: ResponseFormat>(self) -> Result<Session<F>, TavolaError> {
        let transport = self
            .transport
            .ok_or_else(|| TavolaError::invalid_arg("a transport is required"))?;
        let mut base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| TavolaError::invalid_arg(e.to_string()))?,
        };
        if base_url.cannot_be_a_base() {
            return Err(TavolaError::invalid_arg(format!(
                "base URL {base_url} cannot be a base"
            )));
        }
        // Relative joins drop the last path segment without this.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Ok(Session {
            transport,
            base_url,
            api_key: self.api_key,
            policy: self.policy,
            observer: self.observer,
            _format: PhantomData,
        })
    }
}

/// A blocking client session for one service deployment.
///
/// Generic over the result representation; see [`TypedSession`] and
/// [`RawSession`]. All operations run one retry-governed fetch per remote
/// read and block the calling thread for round-trips and backoff sleeps.
pub struct Session<F: ResponseFormat> {
    transport: Arc<dyn Transport>,
    base_url: Url,
    api_key: Option<String>,
    policy: RetryPolicy,
    observer: Option<Box<dyn FetchObserver>>,
    _format: PhantomData<F>,
}

/// Session yielding core tables and typed metadata wrappers.
pub type TypedSession = Session<Typed>;
/// Session yielding raw JSON documents.
pub type RawSession = Session<Raw>;

impl<F: ResponseFormat> Session<F> {
    /// Start building a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Fetch one dataset as this session's table representation.
    ///
    /// # Errors
    /// Request validation, transport classification, and decode errors, as
    /// documented on [`Fetcher::fetch`].
    pub fn dataset(&self, request: &DatasetRequest) -> Result<F::Table, TavolaError> {
        request.validate()?;
        let target = self.target(&request.data_path(), &request.query_pairs())?;
        self.fetcher().fetch(&target, F::decode_table)
    }

    /// Fetch several datasets sequentially and merge them on their shared
    /// date key.
    ///
    /// A series that fails to fetch or decode is logged and omitted rather
    /// than failing the batch; the merge proceeds with the subset that
    /// succeeded. Column labels are `"<series id> - <column>"` in request
    /// order.
    ///
    /// # Errors
    /// Returns a shape error when a fetched series is unfit for merging;
    /// per-series fetch failures are not errors of the batch.
    pub fn dataset_multi(
        &self,
        requests: &[DatasetRequest],
        order: SortOrder,
    ) -> Result<F::Table, TavolaError> {
        let mut fetched: Vec<(tavola_core::SeriesId, TabularResult)> =
            Vec::with_capacity(requests.len());
        for request in requests {
            match self.fetch_series(request) {
                Ok(table) => fetched.push((request.series_id(), table)),
                Err(error) => {
                    tracing::warn!(
                        series = %request.code(),
                        %error,
                        "skipping series after fetch failure"
                    );
                }
            }
        }
        F::from_merged(merge_series(&fetched, order)?)
    }

    /// Fetch one dataset's metadata document.
    ///
    /// # Errors
    /// Transport classification and decode errors, as documented on
    /// [`Fetcher::fetch`].
    pub fn metadata(&self, code: &DatasetCode) -> Result<F::Metadata, TavolaError> {
        let target = self.target(&format!("datasets/{code}/metadata.json"), &[])?;
        self.fetcher().fetch(&target, F::decode_metadata)
    }

    /// Search datasets by free text.
    ///
    /// # Errors
    /// Transport classification and decode errors, as documented on
    /// [`Fetcher::fetch`].
    pub fn search(&self, query: &SearchQuery) -> Result<F::Search, TavolaError> {
        let target = self.target("datasets.json", &query.query_pairs())?;
        self.fetcher().fetch(&target, F::decode_search)
    }

    /// One series fetched in the shared table shape used for merging.
    fn fetch_series(&self, request: &DatasetRequest) -> Result<TabularResult, TavolaError> {
        request.validate()?;
        let target = self.target(&request.data_path(), &request.query_pairs())?;
        self.fetcher().fetch(&target, codec::decode_table)
    }

    fn fetcher(&self) -> Fetcher<'_> {
        let fetcher = Fetcher::new(self.transport.as_ref(), &self.policy);
        match &self.observer {
            Some(observer) => fetcher.with_observer(observer.as_ref()),
            None => fetcher,
        }
    }

    /// Fully parameterize a target: base URL, resource path, query pairs,
    /// and the credential token when configured.
    fn target(&self, path: &str, pairs: &[(&str, String)]) -> Result<Url, TavolaError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| TavolaError::invalid_arg(format!("bad resource path {path:?}: {e}")))?;
        if !pairs.is_empty() || self.api_key.is_some() {
            let mut query = url.query_pairs_mut();
            for (name, value) in pairs {
                query.append_pair(name, value);
            }
            if let Some(key) = &self.api_key {
                query.append_pair(API_KEY_PARAM, key);
            }
        }
        Ok(url)
    }
}
