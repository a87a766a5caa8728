//! Configuration for nanopublication discovery.

use std::time::Duration;

use crate::error::ConfigError;
use crate::models::Endpoint;

/// Endpoint and transport defaults.
pub mod api {
    use std::time::Duration;

    /// Primary SPARQL endpoints, in priority order.
    pub const SPARQL_ENDPOINTS: &[&str] = &[
        "https://query.knowledgepixels.com/repo/full",
        "https://query.petapico.org/repo/full",
        "https://query.np.trustyuri.net/repo/full",
    ];

    /// Legacy text-search endpoints, in priority order.
    pub const LEGACY_ENDPOINTS: &[&str] = &[
        "https://grlc.knowledgepixels.com/api/local/local/find_nanopubs_with_text",
        "https://grlc.nps.petapico.org/api/local/local/find_nanopubs_with_text",
    ];

    /// Query parameter carrying the term for legacy endpoints without a `{term}` placeholder.
    pub const LEGACY_TEXT_PARAM: &str = "text";

    /// Per-call timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Identifier searches returning fewer results than this also search by title.
    pub const TITLE_SEARCH_THRESHOLD: usize = 3;

    /// Free-text terms shorter than this are never sent.
    pub const MIN_FREE_TEXT_LEN: usize = 3;

    /// Row limit for identifier queries.
    pub const IDENTIFIER_LIMIT: usize = 50;

    /// Row limit for free-text queries.
    pub const FREE_TEXT_LIMIT: usize = 20;

    /// Transient retries per endpoint call. Zero keeps fallback strictly one call per endpoint.
    pub const MAX_RETRIES: u32 = 0;

    /// Maximum keepalive connections per host.
    pub const MAX_KEEPALIVE: usize = 4;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// User agent sent with every request.
    pub const USER_AGENT: &str = concat!("nanopub-discovery/", env!("CARGO_PKG_VERSION"));
}

/// Discovery configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Primary SPARQL endpoints.
    pub primary_endpoints: Vec<Endpoint>,

    /// Legacy fallback endpoints.
    pub legacy_endpoints: Vec<Endpoint>,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Identifier results below this count trigger a title search.
    pub title_threshold: usize,

    /// Shortest free-text term that is searched.
    pub min_free_text_len: usize,

    /// Row limit for identifier queries.
    pub identifier_limit: usize,

    /// Row limit for free-text queries.
    pub free_text_limit: usize,

    /// Transient retries per endpoint call.
    pub max_retries: u32,
}

impl Config {
    /// Create the default configuration against the public nanopub network.
    #[must_use]
    pub fn new() -> Self {
        Self {
            primary_endpoints: sparql_endpoints(api::SPARQL_ENDPOINTS),
            legacy_endpoints: legacy_endpoints(api::LEGACY_ENDPOINTS),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            title_threshold: api::TITLE_SEARCH_THRESHOLD,
            min_free_text_len: api::MIN_FREE_TEXT_LEN,
            identifier_limit: api::IDENTIFIER_LIMIT,
            free_text_limit: api::FREE_TEXT_LIMIT,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Create a test configuration with endpoints on a mock server.
    ///
    /// Three SPARQL endpoints at `/sparql/1..=3` and one legacy endpoint at `/legacy/1`.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            primary_endpoints: (1..=3)
                .map(|i| Endpoint::sparql_post(format!("{base_url}/sparql/{i}"), i))
                .collect(),
            legacy_endpoints: vec![Endpoint::legacy(format!("{base_url}/legacy/1"), 1)],
            request_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(1),
            max_retries: 0, // No retries in tests
            ..Self::new()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Recognized: `NANOPUB_SPARQL_ENDPOINTS`, `NANOPUB_LEGACY_ENDPOINTS` (comma-separated URLs),
    /// `NANOPUB_TIMEOUT_SECS`, `NANOPUB_TITLE_THRESHOLD`, `NANOPUB_MAX_RETRIES`.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::new().apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay the environment variables read by [`from_env`](Self::from_env) onto `self`.
    ///
    /// Values are parsed but the result is not validated, so callers can apply
    /// further overrides before calling [`validate`](Self::validate).
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        let mut config = self;

        if let Ok(raw) = std::env::var("NANOPUB_SPARQL_ENDPOINTS") {
            config.primary_endpoints = sparql_endpoints(&split_list(&raw));
        }
        if let Ok(raw) = std::env::var("NANOPUB_LEGACY_ENDPOINTS") {
            config.legacy_endpoints = legacy_endpoints(&split_list(&raw));
        }
        if let Some(secs) = parse_env::<u64>("NANOPUB_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(threshold) = parse_env::<usize>("NANOPUB_TITLE_THRESHOLD")? {
            config.title_threshold = threshold;
        }
        if let Some(retries) = parse_env::<u32>("NANOPUB_MAX_RETRIES")? {
            config.max_retries = retries;
        }

        Ok(config)
    }

    /// Replace the primary endpoints with SPARQL POST endpoints at `urls`.
    #[must_use]
    pub fn with_sparql_endpoints<S: AsRef<str>>(mut self, urls: &[S]) -> Self {
        self.primary_endpoints = sparql_endpoints(urls);
        self
    }

    /// Replace the legacy endpoints.
    #[must_use]
    pub fn with_legacy_endpoints<S: AsRef<str>>(mut self, urls: &[S]) -> Self {
        self.legacy_endpoints = legacy_endpoints(urls);
        self
    }

    /// Check that at least one endpoint exists and every URL parses.
    ///
    /// `{term}` placeholders in legacy URLs are accepted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.primary_endpoints.is_empty() && self.legacy_endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }
        for endpoint in self.primary_endpoints.iter().chain(&self.legacy_endpoints) {
            let candidate = endpoint.url.replace("{term}", "x");
            url::Url::parse(&candidate)
                .map_err(|source| ConfigError::InvalidUrl { url: endpoint.url.clone(), source })?;
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid_value("request_timeout", "0"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn sparql_endpoints<S: AsRef<str>>(urls: &[S]) -> Vec<Endpoint> {
    urls.iter().zip(1..).map(|(url, p)| Endpoint::sparql_post(url.as_ref(), p)).collect()
}

fn legacy_endpoints<S: AsRef<str>>(urls: &[S]) -> Vec<Endpoint> {
    urls.iter().zip(1..).map(|(url, p)| Endpoint::legacy(url.as_ref(), p)).collect()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::invalid_value(name, raw)),
        Err(_) => Ok(None),
    }
}
