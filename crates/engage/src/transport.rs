//! HTTP transport for sending requests.
//!
//! The client builds an [`HttpRequest`] as plain data and hands it to a
//! [`Transport`]. The default transport is [`ReqwestTransport`]; tests and
//! embedders can substitute their own implementation.

use crate::response::HttpResponse;
use crate::Error;
use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;
use tracing::debug;

/// Boxed error carried by [`TransportError`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Look up a header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Failure to complete a request/response exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The remote end closed the connection before the response was complete.
    #[error("remote server prematurely closed connection: {0}")]
    PrematureClose(#[source] BoxError),

    /// Any other transport failure.
    #[error("while making http request: {0}")]
    Request(#[source] BoxError),
}

impl TransportError {
    /// Wrap an arbitrary error, picking the variant from its source chain.
    pub fn classify(err: impl Into<BoxError>) -> Self {
        let err = err.into();
        if is_premature_close(&*err) {
            TransportError::PrematureClose(err)
        } else {
            TransportError::Request(err)
        }
    }
}

/// Sends a request and returns the fully buffered response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Returns true if any error in the chain means the peer hung up mid-exchange.
pub fn is_premature_close(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
            ) {
                return true;
            }
        }
        // hyper reports an early EOF without exposing an io::Error. Text of
        // hyper 1.x `Kind::IncompleteMessage` (used by reqwest 0.12).
        if e.to_string()
            .contains("connection closed before message completed")
        {
            return true;
        }
        current = e.source();
    }
    false
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(TransportError::classify)?;
        let code = response.status().as_u16();
        let data = response.bytes().await.map_err(TransportError::classify)?;

        debug!(status = code, bytes = data.len(), "response body buffered");

        Ok(HttpResponse::new(code, data.to_vec()))
    }
}
