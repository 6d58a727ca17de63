//! User resource: profiles, attributes and events.

use crate::client::Engage;
use crate::types::{Event, Payload};
use crate::Error;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::instrument;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// Keys `identify` forwards; everything else is dropped.
const PROFILE_KEYS: [&str; 8] = [
    "id",
    "email",
    "device_token",
    "device_platform",
    "number",
    "created_at",
    "first_name",
    "last_name",
];

/// Keys `add_attribute` keeps at the top level; everything else goes under `meta`.
const TOP_LEVEL_ATTRIBUTES: [&str; 7] = [
    "email",
    "device_token",
    "device_platform",
    "number",
    "created_at",
    "first_name",
    "last_name",
];

/// User operations, obtained from [`Engage::user`].
#[derive(Debug, Clone, Copy)]
pub struct UserResource<'a> {
    client: &'a Engage,
}

impl<'a> UserResource<'a> {
    pub(crate) fn new(client: &'a Engage) -> Self {
        Self { client }
    }

    /// Create or update a user profile.
    ///
    /// `data` must be an object with an `id` and a valid `email`. Keys outside
    /// the profile fields are silently dropped.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use engage::Engage;
    /// # use serde_json::json;
    /// # async fn example(client: &Engage) -> Result<(), engage::Error> {
    /// client
    ///     .user()
    ///     .identify(json!({
    ///         "id": "u1",
    ///         "email": "user@example.com",
    ///         "first_name": "Ada",
    ///     }))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, data))]
    pub async fn identify(&self, data: Value) -> Result<Payload, Error> {
        let Value::Object(data) = data else {
            return Err(Error::InvalidUserData);
        };
        let id = data.get("id").ok_or(Error::MissingId)?;
        if !data
            .get("email")
            .and_then(Value::as_str)
            .is_some_and(is_valid_email)
        {
            return Err(Error::InvalidOrMissingEmail);
        }

        let path = format!("/users/{}", path_segment(&id_text(id))?);
        let params = profile_fields(data);
        self.put_payload(&path, &params).await
    }

    /// Add attributes to a user for segmentation.
    ///
    /// Profile fields stay at the top level, all other keys are sent under `meta`.
    #[instrument(skip(self, data))]
    pub async fn add_attribute(&self, user_id: &str, data: Value) -> Result<Payload, Error> {
        if user_id.is_empty() {
            return Err(Error::MissingUserId);
        }
        let segment = path_segment(user_id)?;
        let Value::Object(data) = data else {
            return Err(Error::MissingAttributeData);
        };

        let params = partition_attributes(data);
        self.put_payload(&format!("/users/{segment}"), &params)
            .await
    }

    /// Track an event or user action.
    ///
    /// Accepts an event name (`&str`, `String`), a pre-shaped [`Payload`],
    /// an [`Event`], or a [`Value`] holding either of the first two shapes.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use engage::Engage;
    /// # use serde_json::json;
    /// # async fn example(client: &Engage) -> Result<(), engage::Error> {
    /// client.user().track("u1", "checkout").await?;
    /// client
    ///     .user()
    ///     .track("u1", json!({"event": "purchase", "value": 4500}))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, event))]
    pub async fn track<E>(&self, user_id: &str, event: E) -> Result<Payload, Error>
    where
        E: TryInto<Event>,
        Error: From<E::Error>,
    {
        if user_id.is_empty() {
            return Err(Error::MissingUserId);
        }
        let segment = path_segment(user_id)?;

        let event: Event = event.try_into()?;
        let payload = event.into_payload();
        self.put_payload(&format!("/users/{segment}/events"), &payload)
            .await
    }

    /// PUT `payload` and decode the reply; a `null` body decodes to an empty object.
    async fn put_payload(&self, path: &str, payload: &Payload) -> Result<Payload, Error> {
        let reply: Option<Payload> = self.client.put(path, Some(payload)).await?.parse_json()?;
        Ok(reply.unwrap_or_default())
    }
}

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Text of an `id` value: strings verbatim, anything else as JSON.
fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Percent-encode a user id as a single URL path segment.
///
/// `.` and `..` are rejected since URL resolution treats them (encoded or
/// not) as dot-segments.
fn path_segment(id: &str) -> Result<String, Error> {
    if id == "." || id == ".." {
        return Err(Error::InvalidUserId(id.to_string()));
    }
    Ok(urlencoding::encode(id).into_owned())
}

fn profile_fields(data: Payload) -> Payload {
    data.into_iter()
        .filter(|(key, _)| PROFILE_KEYS.contains(&key.as_str()))
        .collect()
}

fn partition_attributes(data: Payload) -> Payload {
    let mut params = Payload::new();
    let mut meta = Payload::new();

    for (key, value) in data {
        if TOP_LEVEL_ATTRIBUTES.contains(&key.as_str()) {
            params.insert(key, value);
        } else {
            meta.insert(key, value);
        }
    }

    params.insert("meta".into(), Value::Object(meta));
    params
}
