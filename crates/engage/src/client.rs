//! Engage client implementation.

use crate::config::{Config, EngageBuilder, USER_AGENT};
use crate::response::HttpResponse;
use crate::transport::{HttpMethod, HttpRequest, ReqwestTransport, Transport};
use crate::user::UserResource;
use crate::Error;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Engage API client.
///
/// Holds the credentials and the transport used for every request. Each
/// operation is a single request/response exchange; nothing is queued or
/// retried.
///
/// # Example
///
/// ```rust,no_run
/// use engage::Engage;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), engage::Error> {
/// let client = Engage::new("key", "secret")?;
///
/// client
///     .user()
///     .identify(json!({"id": "u1", "email": "user@example.com"}))
///     .await?;
///
/// client.user().track("u1", "login").await?;
/// # Ok(())
/// # }
/// ```
pub struct Engage {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl Engage {
    /// Create a client with default settings.
    ///
    /// Fails with [`Error::MissingCredentials`] if either value is empty.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Result<Self, Error> {
        Self::builder(key, secret).build()
    }

    /// Create a new builder with the given key and secret.
    pub fn builder(key: impl Into<String>, secret: impl Into<String>) -> EngageBuilder {
        EngageBuilder::new(key, secret)
    }

    pub(crate) fn from_config(
        config: Config,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self, Error> {
        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout())?),
        };

        Ok(Self { config, transport })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the transport used for subsequent requests.
    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Arc::new(transport);
    }

    /// User resource operations.
    pub fn user(&self) -> UserResource<'_> {
        UserResource::new(self)
    }

    // ============================================
    // REQUESTS
    // ============================================

    /// Send a POST request to `path`.
    pub async fn post<B>(&self, path: &str, body: Option<&B>) -> Result<HttpResponse, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Post, path, body).await
    }

    /// Send a PUT request to `path`.
    pub async fn put<B>(&self, path: &str, body: Option<&B>) -> Result<HttpResponse, Error>
    where
        B: Serialize + ?Sized,
    {
        self.request(HttpMethod::Put, path, body).await
    }

    /// Send a request to `path`, resolved against the base URL.
    ///
    /// The response is returned whatever its status code.
    pub async fn request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<HttpResponse, Error>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(|b| serde_json::to_vec(b))
            .transpose()
            .map_err(Error::Encode)?;
        let request = self.build_request(method, path, body)?;

        debug!(
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "sending request"
        );

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "request failed");
                return Err(e.into());
            }
        };

        if !response.is_success() {
            warn!(status = response.code, body = %response.text(), "API returned non-success status");
        } else {
            debug!(status = response.code, "request completed");
        }

        Ok(response)
    }

    pub(crate) fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest, Error> {
        let url = self
            .config
            .base_url()
            .join(path)
            .map_err(|e| Error::Config(format!("invalid request path {path:?}: {e}")))?;

        let mut headers = Vec::with_capacity(3);
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers.push(("User-Agent".to_string(), USER_AGENT.to_string()));
        headers.push((
            "Authorization".to_string(),
            basic_auth(&self.config.key, &self.config.secret),
        ));

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        })
    }
}

impl EngageBuilder {
    /// Build the Engage client.
    pub fn build(self) -> Result<Engage, Error> {
        let (config, transport) = self.into_parts()?;
        Engage::from_config(config, transport)
    }
}

impl fmt::Debug for Engage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn basic_auth(key: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{key}:{secret}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;

    struct NoopTransport;

    #[async_trait]
    impl Transport for NoopTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(200, b"{}".to_vec()))
        }
    }

    fn client() -> Engage {
        Engage::builder("mytestkey", "mytestsecretkey")
            .transport(NoopTransport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_request_with_body() {
        let request = client()
            .build_request(HttpMethod::Put, "/users/u141", Some(b"{}".to_vec()))
            .unwrap();

        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "https://api.engage.so/users/u141");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("User-Agent"), Some(USER_AGENT));
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn test_build_request_without_body_omits_content_type() {
        let request = client()
            .build_request(HttpMethod::Post, "/users/u141/events", None)
            .unwrap();

        assert_eq!(request.header("Content-Type"), None);
        assert!(request.body.is_none());
    }

    #[test]
    fn test_basic_auth_header() {
        let request = client()
            .build_request(HttpMethod::Put, "/users/u1", None)
            .unwrap();

        // base64("mytestkey:mytestsecretkey")
        assert_eq!(
            request.header("Authorization"),
            Some("Basic bXl0ZXN0a2V5Om15dGVzdHNlY3JldGtleQ==")
        );
    }

    #[test]
    fn test_path_replaces_base_path() {
        let client = Engage::builder("k", "s")
            .base_url("http://localhost:9000/v1/")
            .transport(NoopTransport)
            .build()
            .unwrap();
        let request = client
            .build_request(HttpMethod::Put, "/users/u1", None)
            .unwrap();

        assert_eq!(request.url, "http://localhost:9000/users/u1");
    }

    #[test]
    fn test_new_requires_credentials() {
        assert!(matches!(Engage::new("", ""), Err(Error::MissingCredentials)));
        assert!(matches!(Engage::new("k", ""), Err(Error::MissingCredentials)));
        assert!(matches!(Engage::new("", "s"), Err(Error::MissingCredentials)));
    }

    #[test]
    fn test_new_with_default_transport() {
        let client = Engage::new("mytestkey", "mytestsecretkey").unwrap();
        assert_eq!(client.config().key(), "mytestkey");
    }

    #[tokio::test]
    async fn test_post_and_put_return_status() {
        let client = client();
        let payload = serde_json::json!({"event": "sample"});

        let res = client.post("/users/u141", Some(&payload)).await.unwrap();
        assert_eq!(res.code, 200);

        let res = client.put("/users/u141", Some(&payload)).await.unwrap();
        assert_eq!(res.code, 200);
    }
}
