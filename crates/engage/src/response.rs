//! Buffered API responses.

use crate::Error;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Status code and raw body of a completed request.
///
/// Non-2xx responses are returned as-is; interpreting the status is left to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub code: u16,
    pub data: Vec<u8>,
}

impl HttpResponse {
    pub fn new(code: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            data: data.into(),
        }
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Decode the body as JSON into `T`.
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.data).map_err(Error::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Map, Value};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Status {
        status: String,
    }

    #[test]
    fn test_parse_json_into_struct() {
        let response = HttpResponse::new(200, br#"{"status":"ok"}"#.to_vec());
        let status: Status = response.parse_json().unwrap();
        assert_eq!(status.status, "ok");
    }

    #[test]
    fn test_parse_json_into_map() {
        let response = HttpResponse::new(201, br#"{"id":"u1","count":3}"#.to_vec());
        let map: Map<String, Value> = response.parse_json().unwrap();
        assert_eq!(Value::Object(map), json!({"id": "u1", "count": 3}));
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let response = HttpResponse::new(200, b"<html>".to_vec());
        let result = response.parse_json::<Map<String, Value>>();
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_wrong_shape_is_decode_error() {
        let response = HttpResponse::new(200, b"[1,2,3]".to_vec());
        let result = response.parse_json::<Status>();
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn test_status_helpers() {
        assert!(HttpResponse::new(204, Vec::new()).is_success());
        assert!(!HttpResponse::new(404, Vec::new()).is_success());
        assert!(!HttpResponse::new(500, b"oops".to_vec()).is_success());
        assert_eq!(HttpResponse::new(500, b"oops".to_vec()).text(), "oops");
    }
}
