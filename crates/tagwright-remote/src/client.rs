//! Authenticated HTTP client for a Paperless-ngx instance.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use tagwright_core::defaults;
use tagwright_core::{EntityKind, Error, Result};

use crate::gateway::RemoteGateway;
use crate::wire::PageResponse;

/// Outcome of a successful connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub version: String,
}

/// Client for one Paperless-ngx instance.
///
/// Cheap to clone; clones share the underlying connection pool. Dropping the
/// last clone releases it.
#[derive(Debug, Clone)]
pub struct PaperlessClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl PaperlessClient {
    /// Create a client with an explicit request timeout.
    pub fn new(base_url: &str, api_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// Create a client with the default remote timeout.
    pub fn with_default_timeout(base_url: &str, api_token: &str) -> Result<Self> {
        Self::new(
            base_url,
            api_token,
            Duration::from_secs(defaults::REMOTE_TIMEOUT_SECS),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gateway for one entity kind sharing this client's connection pool.
    pub fn gateway(&self, kind: EntityKind) -> RemoteGateway {
        RemoteGateway::new(self.clone(), kind)
    }

    /// Build an authenticated request for a path relative to the base URL.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, &format!("{}{}", self.base_url, path))
    }

    fn request_url(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Token {}", self.api_token))
            .header("Content-Type", "application/json")
    }

    /// Pass successful responses through; turn anything else into
    /// [`Error::Remote`] carrying the status and the error detail.
    pub(crate) async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let body = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(json) => json.to_string(),
            Err(_) => text,
        };
        Err(Error::Remote {
            status: status.as_u16(),
            body,
        })
    }

    /// GET a path and decode the JSON body.
    pub(crate) async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Send a JSON body and decode the JSON answer.
    pub(crate) async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path).json(body).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// Send a JSON body, ignoring the answer beyond its status.
    pub(crate) async fn send_json_unit<B>(&self, method: Method, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Walk a paginated collection, following `next` until it is exhausted.
    #[instrument(skip(self, query), fields(subsystem = "remote", component = "paperless", op = "get_all_pages"))]
    pub(crate) async fn get_all_pages<T, Q>(&self, path: &str, query: &Q) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let start = Instant::now();
        let mut items = Vec::new();
        let mut pages = 0usize;

        let mut request = self.request(Method::GET, path).query(query);
        loop {
            let response = Self::check(request.send().await?).await?;
            let page: PageResponse<T> = response.json().await?;
            pages += 1;
            trace!(page = pages, page_len = page.results.len(), "Fetched page");
            items.extend(page.results);

            match page.next {
                Some(next) if !next.is_empty() => {
                    request = self.request_url(Method::GET, &self.resolve_next(&next)?);
                }
                _ => break,
            }
        }

        debug!(
            result_count = items.len(),
            pages,
            duration_ms = start.elapsed().as_millis() as u64,
            "Collection fetched"
        );
        Ok(items)
    }

    /// Resolve a `next` link against the configured base URL.
    ///
    /// Absolute links keep their path and query but use the configured scheme
    /// and host, since a remote behind a proxy may advertise its internal
    /// address. Relative links are appended to the base URL.
    fn resolve_next(&self, next: &str) -> Result<String> {
        if !next.starts_with("http://") && !next.starts_with("https://") {
            return Ok(format!("{}{}", self.base_url, next));
        }
        let advertised = Url::parse(next)
            .map_err(|e| Error::Request(format!("Invalid pagination link '{}': {}", next, e)))?;
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;
        url.set_path(advertised.path());
        url.set_query(advertised.query());
        Ok(url.to_string())
    }

    /// Check that the remote is reachable and the token is accepted.
    #[instrument(skip(self), fields(subsystem = "remote", component = "paperless", op = "test_connection"))]
    pub async fn test_connection(&self) -> Result<ConnectionInfo> {
        let response = self
            .request(Method::GET, "/api/tags/")
            .query(&[("page_size", "1")])
            .send()
            .await?;
        Self::check(response).await?;
        info!(base_url = %self.base_url, "Paperless connection verified");
        Ok(ConnectionInfo {
            version: "connected".to_string(),
        })
    }
}
