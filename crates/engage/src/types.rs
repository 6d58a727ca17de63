//! Payload and event types.

use crate::Error;
use serde_json::{Map, Value};

/// JSON object sent to and returned by the API.
pub type Payload = Map<String, Value>;

/// Event passed to [`UserResource::track`](crate::UserResource::track).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Bare event name, sent as `{"event": name, "value": true}`.
    Name(String),
    /// Pre-shaped event object, sent verbatim.
    Properties(Payload),
}

impl Event {
    /// Convert into the JSON object sent on the wire.
    pub fn into_payload(self) -> Payload {
        match self {
            Event::Name(name) => {
                let mut payload = Payload::new();
                payload.insert("event".into(), Value::String(name));
                payload.insert("value".into(), Value::Bool(true));
                payload
            }
            Event::Properties(payload) => payload,
        }
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Event::Name(name.into())
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Event::Name(name)
    }
}

impl From<Payload> for Event {
    fn from(payload: Payload) -> Self {
        Event::Properties(payload)
    }
}

/// Strings become [`Event::Name`], objects become [`Event::Properties`].
/// Anything else, `null` included, is rejected.
impl TryFrom<Value> for Event {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Error> {
        match value {
            Value::String(name) => Ok(Event::Name(name)),
            Value::Object(payload) => Ok(Event::Properties(payload)),
            _ => Err(Error::MissingAttributeData),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_normalized() {
        let payload = Event::from("welcome").into_payload();
        assert_eq!(Value::Object(payload), json!({"event": "welcome", "value": true}));
    }

    #[test]
    fn test_properties_forwarded_verbatim() {
        let Value::Object(map) = json!({"event": "purchase", "value": 42, "currency": "NGN"})
        else {
            unreachable!()
        };
        let payload = Event::from(map.clone()).into_payload();
        assert_eq!(payload, map);
    }

    #[test]
    fn test_try_from_value() {
        assert_eq!(
            Event::try_from(json!("signup")).unwrap(),
            Event::Name("signup".into())
        );
        assert!(matches!(
            Event::try_from(json!({"event": "signup"})),
            Ok(Event::Properties(_))
        ));
    }

    #[test]
    fn test_try_from_rejects_other_shapes() {
        for value in [json!(42), json!(null), json!(true), json!(["a", "b"])] {
            assert!(
                matches!(Event::try_from(value.clone()), Err(Error::MissingAttributeData)),
                "expected rejection for {value}"
            );
        }
    }
}
