//! Discovery of nanopublications related to a bibliographic item.
//!
//! ## Search order
//!
//! 1. The DOI, if the item has one.
//! 2. The title, if fewer than `title_threshold` distinct results were found so far.
//!
//! Each search walks the primary SPARQL endpoints in priority order and stops at
//! the first endpoint that yields at least one result. Only if the whole primary
//! list comes up empty are the legacy endpoints tried, with the same rule. Calls
//! are strictly sequential. Endpoint failures are logged and skipped; a search
//! where every endpoint fails simply contributes nothing.

use futures::StreamExt;
use serde::Serialize;

use crate::client::{EndpointClient, EndpointTransport};
use crate::config::Config;
use crate::dedupe::{dedupe, sort_by_recency};
use crate::error::{ConfigError, ErrorKind};
use crate::models::{
    BibliographicItem, Endpoint, NanopubResult, SearchTerm, TermKind, in_priority_order,
};
use crate::normalize::try_normalize;
use crate::query::{QueryBuilder, QueryRequest};

/// Which endpoint list an attempt came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointFamily {
    /// Primary SPARQL endpoints.
    Primary,
    /// Legacy fallback endpoints.
    Legacy,
}

/// Result of one endpoint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AttemptOutcome {
    /// The endpoint yielded this many normalized results (after dedupe).
    Hit {
        /// Result count.
        count: usize,
    },
    /// The endpoint answered but nothing usable came back.
    Empty,
    /// The call failed.
    Failed {
        /// Failure class.
        kind: ErrorKind,
    },
}

/// One endpoint call made during a discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAttempt {
    /// Endpoint URL.
    pub endpoint: String,
    /// Endpoint list.
    pub family: EndpointFamily,
    /// Term kind searched.
    pub term_kind: TermKind,
    /// What happened.
    pub outcome: AttemptOutcome,
}

/// Results of a discovery run together with every endpoint call it made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    /// Deduplicated results, identifier matches first.
    pub results: Vec<NanopubResult>,
    /// Endpoint calls in the order they were issued.
    pub attempts: Vec<EndpointAttempt>,
}

impl DiscoveryReport {
    /// Whether any endpoint call failed.
    #[must_use]
    pub fn had_failures(&self) -> bool {
        self.attempts.iter().any(|a| matches!(a.outcome, AttemptOutcome::Failed { .. }))
    }
}

/// Finds nanopublications related to bibliographic items.
///
/// Holds only immutable configuration and the transport, so one instance can
/// serve concurrent callers.
pub struct Discovery<T = EndpointClient> {
    transport: T,
    builder: QueryBuilder,
    primary: Vec<Endpoint>,
    legacy: Vec<Endpoint>,
    title_threshold: usize,
}

impl Discovery<EndpointClient> {
    /// Create a discovery service backed by HTTP.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = EndpointClient::new(config)?;
        Ok(Self::with_transport(client, config))
    }
}

impl<T: EndpointTransport> Discovery<T> {
    /// Create a discovery service over any transport.
    #[must_use]
    pub fn with_transport(transport: T, config: &Config) -> Self {
        Self {
            transport,
            builder: QueryBuilder::from_config(config),
            primary: in_priority_order(&config.primary_endpoints).into_iter().cloned().collect(),
            legacy: in_priority_order(&config.legacy_endpoints).into_iter().cloned().collect(),
            title_threshold: config.title_threshold,
        }
    }

    /// Primary endpoints in the order they are tried.
    #[must_use]
    pub fn primary_endpoints(&self) -> &[Endpoint] {
        &self.primary
    }

    /// Legacy endpoints in the order they are tried.
    #[must_use]
    pub fn legacy_endpoints(&self) -> &[Endpoint] {
        &self.legacy
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Find nanopublications related to `item`.
    ///
    /// Never fails: when nothing is found, or every endpoint is down, the result is empty.
    pub async fn discover<I>(&self, item: &I) -> Vec<NanopubResult>
    where
        I: BibliographicItem + ?Sized,
    {
        self.discover_with_report(item).await.results
    }

    /// Like [`discover`](Self::discover), also returning every endpoint call made.
    pub async fn discover_with_report<I>(&self, item: &I) -> DiscoveryReport
    where
        I: BibliographicItem + ?Sized,
    {
        let mut attempts = Vec::new();
        let mut accumulated = Vec::new();

        if let Some(doi) = item.identifier() {
            let term = SearchTerm::identifier(doi);
            accumulated.extend(self.search(&term, &mut attempts).await);
        }

        // The threshold only gates a title search that follows an identifier search.
        if item.identifier().is_none() || accumulated.len() < self.title_threshold {
            if let Some(title) = item.title() {
                let term = SearchTerm::free_text(title);
                accumulated.extend(self.search(&term, &mut attempts).await);
            }
        } else {
            tracing::debug!(
                found = accumulated.len(),
                threshold = self.title_threshold,
                "Skipping title search"
            );
        }

        let results = dedupe(accumulated);
        tracing::info!(
            results = results.len(),
            calls = attempts.len(),
            identifier = item.identifier().unwrap_or(""),
            "Discovery finished"
        );

        DiscoveryReport { results, attempts }
    }

    /// Run one search for an explicit term.
    pub async fn discover_term(&self, term: &SearchTerm) -> Vec<NanopubResult> {
        let mut attempts = Vec::new();
        self.search(term, &mut attempts).await
    }

    /// Discover for several items, running up to `concurrency` of them at once.
    ///
    /// Results are in input order. Within each item, endpoint calls stay sequential.
    pub async fn discover_many<I>(&self, items: &[I], concurrency: usize) -> Vec<Vec<NanopubResult>>
    where
        I: BibliographicItem + Sync,
    {
        futures::stream::iter(items)
            .map(|item| self.discover(item))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// Primary list first, then legacy, first success wins.
    async fn search(
        &self,
        term: &SearchTerm,
        attempts: &mut Vec<EndpointAttempt>,
    ) -> Vec<NanopubResult> {
        let Some(request) = self.builder.build(term) else {
            tracing::debug!(term = %term, "Term too short to search");
            return Vec::new();
        };

        for (family, endpoints) in
            [(EndpointFamily::Primary, &self.primary), (EndpointFamily::Legacy, &self.legacy)]
        {
            if let Some(results) = self.first_success(family, endpoints, &request, attempts).await {
                return results;
            }
        }

        tracing::info!(term = %term, "No endpoint returned results");
        Vec::new()
    }

    async fn first_success(
        &self,
        family: EndpointFamily,
        endpoints: &[Endpoint],
        request: &QueryRequest,
        attempts: &mut Vec<EndpointAttempt>,
    ) -> Option<Vec<NanopubResult>> {
        for endpoint in endpoints {
            let outcome = match self.transport.query(endpoint, request).await {
                Ok(raw) => match try_normalize(&raw) {
                    Ok(batch) if !batch.is_empty() => {
                        let mut batch = batch;
                        sort_by_recency(&mut batch);
                        let batch = dedupe(batch);
                        tracing::debug!(
                            endpoint = %endpoint.url,
                            family = ?family,
                            results = batch.len(),
                            "Endpoint returned results"
                        );
                        attempts.push(attempt(endpoint, family, request, AttemptOutcome::Hit {
                            count: batch.len(),
                        }));
                        return Some(batch);
                    }
                    Ok(_) => AttemptOutcome::Empty,
                    Err(e) => {
                        tracing::warn!(endpoint = %endpoint.url, error = %e, "Unusable payload");
                        AttemptOutcome::Failed { kind: e.kind() }
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint.url,
                        kind = ?e.kind(),
                        status = e.status(),
                        error = %e,
                        "Endpoint failed, trying next"
                    );
                    AttemptOutcome::Failed { kind: e.kind() }
                }
            };
            attempts.push(attempt(endpoint, family, request, outcome));
        }
        None
    }
}

fn attempt(
    endpoint: &Endpoint,
    family: EndpointFamily,
    request: &QueryRequest,
    outcome: AttemptOutcome,
) -> EndpointAttempt {
    EndpointAttempt { endpoint: endpoint.url.clone(), family, term_kind: request.kind(), outcome }
}

impl<T> std::fmt::Debug for Discovery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("primary", &self.primary.len())
            .field("legacy", &self.legacy.len())
            .field("title_threshold", &self.title_threshold)
            .finish()
    }
}
