//! Engage user engagement API client for Rust.
//!
//! # Example
//!
//! ```rust,ignore
//! use engage::Engage;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), engage::Error> {
//!     let client = Engage::new("key", "secret")?;
//!
//!     client
//!         .user()
//!         .identify(json!({"id": "u1", "email": "user@example.com"}))
//!         .await?;
//!
//!     client
//!         .user()
//!         .add_attribute("u1", json!({"first_name": "Ada", "plan": "pro"}))
//!         .await?;
//!
//!     client.user().track("u1", "signup").await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod response;
mod transport;
mod types;
mod user;

pub use client::Engage;
pub use config::{Config, EngageBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, USER_AGENT};
pub use error::Error;
pub use response::HttpResponse;
pub use transport::{
    is_premature_close, BoxError, HttpMethod, HttpRequest, ReqwestTransport, Transport,
    TransportError,
};
pub use types::{Event, Payload};
pub use user::UserResource;

// Re-exported so custom transports can be written without a direct dependency.
pub use async_trait::async_trait;
