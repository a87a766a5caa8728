//! Endpoint client.
//!
//! Issues one query against one endpoint and hands back the parsed JSON body:
//! - SPARQL POST (form-encoded) and SPARQL GET with `application/sparql-results+json`
//! - Legacy REST search with the plain term in the path or query string
//! - Connection pooling via reqwest, optional retry middleware
//!
//! Every failure is reported as an [`EndpointError`]; none of them is fatal to a
//! discovery run.

mod middleware;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use url::Url;

use crate::config::{Config, api};
use crate::error::{ConfigError, EndpointError, EndpointResult};
use crate::models::{Endpoint, Protocol, RawResult};
use crate::query::QueryRequest;

/// Media type of SPARQL JSON results.
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Anything that can run a query against an endpoint.
///
/// [`EndpointClient`] is the HTTP implementation; the orchestrator only depends
/// on this trait.
#[async_trait]
pub trait EndpointTransport: Send + Sync {
    /// Run `request` against `endpoint`.
    async fn query(
        &self,
        endpoint: &Endpoint,
        request: &QueryRequest,
    ) -> EndpointResult<RawResult>;
}

/// HTTP client for SPARQL and legacy endpoints.
#[derive(Clone)]
pub struct EndpointClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Per-call timeout, reported in timeout errors.
    request_timeout: std::time::Duration,
}

impl EndpointClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        Ok(Self {
            client: middleware::with_retries(client, config.max_retries),
            request_timeout: config.request_timeout,
        })
    }

    /// Run one query against one endpoint.
    ///
    /// # Errors
    ///
    /// `Transport`/`Timeout` when no response arrives, `Http` for non-2xx statuses,
    /// `Format` when the body is empty or not JSON.
    pub async fn query(
        &self,
        endpoint: &Endpoint,
        request: &QueryRequest,
    ) -> EndpointResult<RawResult> {
        tracing::debug!(
            endpoint = %endpoint.url,
            protocol = ?endpoint.protocol,
            term = %request.kind(),
            "Querying endpoint"
        );

        let response = self.request(endpoint, request)?.send().await.map_err(|e| self.transport(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport(e.into()))?;

        if !status.is_success() {
            return Err(EndpointError::http(status.as_u16(), &body));
        }

        let payload = parse_body(&body)?;
        Ok(RawResult::new(endpoint.url.clone(), payload))
    }

    fn request(&self, endpoint: &Endpoint, request: &QueryRequest) -> EndpointResult<RequestBuilder> {
        let builder = match endpoint.protocol {
            Protocol::SparqlPost => {
                let body = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("query", request.sparql())
                    .finish();
                self.client
                    .post(parse_url(&endpoint.url)?)
                    .header(ACCEPT, SPARQL_RESULTS_JSON)
                    .header(CONTENT_TYPE, FORM_URLENCODED)
                    .body(body)
            }
            Protocol::SparqlGet => {
                let mut url = parse_url(&endpoint.url)?;
                url.query_pairs_mut().append_pair("query", request.sparql());
                self.client.get(url).header(ACCEPT, SPARQL_RESULTS_JSON)
            }
            Protocol::LegacyRest => self
                .client
                .get(legacy_url(&endpoint.url, request.text())?)
                .header(ACCEPT, "application/json"),
        };
        Ok(builder)
    }

    fn transport(&self, error: reqwest_middleware::Error) -> EndpointError {
        match &error {
            reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                EndpointError::Timeout(self.request_timeout)
            }
            _ => EndpointError::Transport(error),
        }
    }
}

#[async_trait]
impl EndpointTransport for EndpointClient {
    async fn query(
        &self,
        endpoint: &Endpoint,
        request: &QueryRequest,
    ) -> EndpointResult<RawResult> {
        Self::query(self, endpoint, request).await
    }
}

impl std::fmt::Debug for EndpointClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointClient").field("request_timeout", &self.request_timeout).finish()
    }
}

/// Parse a response body that must be a JSON object or array.
///
/// # Errors
///
/// `Format` for an empty body, a body not starting with `{` or `[`, or invalid JSON.
pub fn parse_body(body: &str) -> EndpointResult<serde_json::Value> {
    let trimmed = body.trim_start();
    match trimmed.as_bytes().first() {
        None => Err(EndpointError::format("empty body", body)),
        Some(b'{' | b'[') => serde_json::from_str(trimmed)
            .map_err(|e| EndpointError::format(format!("invalid JSON: {e}"), body)),
        Some(_) => Err(EndpointError::format("body is not JSON", body)),
    }
}

/// URL for a legacy search: `{term}` is replaced with the percent-encoded text,
/// otherwise the text is appended as the `text` query parameter.
///
/// # Errors
///
/// `Transport` if the endpoint URL does not parse.
pub fn legacy_url(template: &str, text: &str) -> EndpointResult<Url> {
    if template.contains("{term}") {
        return parse_url(&template.replace("{term}", &urlencoding::encode(text)));
    }
    let mut url = parse_url(template)?;
    url.query_pairs_mut().append_pair(api::LEGACY_TEXT_PARAM, text);
    Ok(url)
}

fn parse_url(raw: &str) -> EndpointResult<Url> {
    Url::parse(raw).map_err(|e| EndpointError::Transport(reqwest_middleware::Error::Middleware(e.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_accepts_object_and_array() {
        assert!(parse_body("  {\"results\": {\"bindings\": []}}").is_ok());
        assert!(parse_body("[]").is_ok());
    }

    #[test]
    fn test_parse_body_rejects_empty_and_html() {
        assert!(matches!(parse_body(""), Err(EndpointError::Format { .. })));
        assert!(matches!(parse_body("   \n"), Err(EndpointError::Format { .. })));
        assert!(matches!(parse_body("<html>502</html>"), Err(EndpointError::Format { .. })));
        assert!(matches!(parse_body("{ broken"), Err(EndpointError::Format { .. })));
    }

    #[test]
    fn test_legacy_url_query_param() {
        let url = legacy_url("https://grlc.example/api/find", "10.1/abc def").unwrap();
        assert_eq!(url.as_str(), "https://grlc.example/api/find?text=10.1%2Fabc+def");
    }

    #[test]
    fn test_legacy_url_path_placeholder() {
        let url = legacy_url("https://np.example/search/{term}/json", "10.1/abc def").unwrap();
        assert_eq!(url.as_str(), "https://np.example/search/10.1%2Fabc%20def/json");
    }

    #[test]
    fn test_legacy_url_invalid() {
        assert!(matches!(legacy_url("::nope", "x"), Err(EndpointError::Transport(_))));
    }

    #[test]
    fn test_client_creation_succeeds() {
        assert!(EndpointClient::new(&Config::default()).is_ok());
    }
}
