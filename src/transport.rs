//! HTTP transport for the orders API
//!
//! A thin wrapper over `reqwest` that resolves paths against the configured
//! base URL, exchanges JSON, and maps non-2xx responses onto the crate's
//! error taxonomy with the service's body kept verbatim.

use std::future::Future;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Shared HTTP client bound to a service root (cheap to clone)
///
/// API calls get a whole-exchange deadline. Artifact streams only get a
/// connect timeout and a stall timeout, so large transfers can run as long as
/// data keeps arriving.
#[derive(Clone, Debug)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Option<Duration>,
    stall_timeout: Option<Duration>,
}

impl Transport {
    /// Build a transport from client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("orders-dl/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
            stall_timeout: config.stall_timeout,
        })
    }

    /// Service root without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path (starting with `/`) against the base URL
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET an absolute URL and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.api_call(self.client.get(url).query(query));
        let response = self.send(request, Method::GET, url).await?;
        Ok(response.json().await?)
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.api_call(self.client.post(url).json(body));
        let response = self.send(request, Method::POST, url).await?;
        Ok(response.json().await?)
    }

    /// PUT without a body and decode the JSON response
    pub async fn put_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let request = self.api_call(self.client.put(url));
        let response = self.send(request, Method::PUT, url).await?;
        Ok(response.json().await?)
    }

    /// GET an absolute URL and hand back the response with its body unread
    ///
    /// No overall deadline applies; wrap each body read in
    /// [`within_stall`](Self::within_stall) to keep the stall timeout in force.
    pub async fn get_stream(&self, url: &str) -> Result<Response> {
        tracing::debug!(url = %url, "opening artifact stream");
        let response = self.within_stall(self.client.get(url).send()).await?;
        tracing::debug!(url = %url, status = response.status().as_u16(), "stream response");
        check_status(response).await
    }

    fn api_call(&self, request: RequestBuilder) -> RequestBuilder {
        match self.request_timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Run one network step, failing with a retryable timeout if it makes no
    /// progress within the stall timeout
    pub(crate) async fn within_stall<F, T>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = reqwest::Result<T>>,
    {
        let Some(limit) = self.stall_timeout else {
            return Ok(operation.await?);
        };
        match tokio::time::timeout(limit, operation).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("no data received for {}s", limit.as_secs_f64()),
            ))),
        }
    }

    async fn send(&self, request: RequestBuilder, method: Method, url: &str) -> Result<Response> {
        tracing::debug!(method = %method, url = %url, "sending request");
        let response = request.send().await?;
        tracing::debug!(method = %method, url = %url, status = response.status().as_u16(), "response");
        check_status(response).await
    }
}

/// Map a non-2xx response to an error carrying the body verbatim
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::NOT_FOUND => Error::NotFound { body },
        StatusCode::TOO_MANY_REQUESTS => Error::Api {
            status: status.as_u16(),
            body,
        },
        s if s.is_client_error() => Error::Validation {
            status: s.as_u16(),
            body,
        },
        s => Error::Api {
            status: s.as_u16(),
            body,
        },
    })
}
