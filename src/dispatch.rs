//! Action dispatcher
//!
//! One [`ActionDispatcher`] per backend operation. Each dispatch:
//!
//! 1. shows a loading notification
//! 2. marks the shared [`LoadingState`] busy
//! 3. sends exactly one POST with the payload as JSON body
//! 4. dismisses the loading notification and shows one success or error notice
//! 5. releases the loading state, on every exit path
//!
//! Backends disagree about whether responses carry a `success` flag, so the
//! body is decoded into one of two shapes (see [`ResponseShape`]) and both
//! are normalized into a [`NormalizedResult`].

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use url::Url;

use crate::endpoints::Operation;
use crate::error::{JournalistError, JournalistResult};
use crate::loading::LoadingState;
use crate::notify::{Notifier, LOADING_LABEL};
use crate::transport::{Transport, TransportRequest, TransportResponse};

/// Operation-specific request fields
pub type Payload = Map<String, Value>;

pub const NO_DATA_MESSAGE: &str = "No data in response from server";
pub const UNSUCCESSFUL_MESSAGE: &str = "API returned unsuccessful response";

/// JavaScript-style truthiness, which is what the backend's `success` flags assume
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The two body shapes the backend produces
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// Object carrying an explicit `success` field
    Enveloped(Map<String, Value>),
    /// Anything else; the whole body is the payload
    Bare(Value),
}

impl ResponseShape {
    /// Returns `None` when there is no body to speak of (zero bytes, `null`, or
    /// falsy JSON). Non-JSON text, even whitespace, is a bare string body.
    pub fn decode(body: &[u8]) -> Option<Self> {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(_) if body.is_empty() => return None,
            Err(_) => Value::String(String::from_utf8_lossy(body).into_owned()),
        };

        if !is_truthy(&value) {
            return None;
        }

        match value {
            Value::Object(map) if map.contains_key("success") => Some(ResponseShape::Enveloped(map)),
            other => Some(ResponseShape::Bare(other)),
        }
    }
}

/// A successful dispatch outcome.
///
/// Always serializes as an object with a truthy `success` field. Enveloped
/// responses keep every field the backend sent; bare ones become
/// `{"success": true, "data": <body>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    body: Map<String, Value>,
    wrapped: bool,
}

impl NormalizedResult {
    /// Wrap a body that carried no `success` field
    pub fn wrap(data: Value) -> Self {
        let mut body = Map::new();
        body.insert("success".into(), Value::Bool(true));
        body.insert("data".into(), data);
        Self {
            body,
            wrapped: true,
        }
    }

    fn enveloped(body: Map<String, Value>) -> Self {
        Self {
            body,
            wrapped: false,
        }
    }

    /// The `data` field, or `Null` if the backend sent none
    pub fn data(&self) -> &Value {
        static NULL: Value = Value::Null;
        self.body.get("data").unwrap_or(&NULL)
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// True when the backend omitted the `success` flag
    pub fn was_wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    /// Deserialize `data` into a typed view
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> JournalistResult<T> {
        Ok(serde_json::from_value(self.data().clone())?)
    }
}

impl Serialize for NormalizedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

fn body_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

/// Turn a raw response envelope into the normalized outcome
pub fn normalize(response: &TransportResponse) -> JournalistResult<NormalizedResult> {
    if !response.is_success() {
        let message = body_message(&response.body)
            .unwrap_or_else(|| format!("Request failed with status code {}", response.status));
        return Err(JournalistError::Api {
            message,
            status: Some(response.status),
        });
    }

    match ResponseShape::decode(&response.body) {
        None => Err(JournalistError::Api {
            message: NO_DATA_MESSAGE.to_string(),
            status: Some(response.status),
        }),
        Some(ResponseShape::Enveloped(map)) => {
            if map.get("success").map(is_truthy).unwrap_or(false) {
                Ok(NormalizedResult::enveloped(map))
            } else {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(UNSUCCESSFUL_MESSAGE)
                    .to_string();
                Err(JournalistError::Api {
                    message,
                    status: Some(response.status),
                })
            }
        }
        Some(ResponseShape::Bare(value)) => Ok(NormalizedResult::wrap(value)),
    }
}

/// Serialize a typed request into a payload map
pub fn to_payload<T: Serialize>(request: &T) -> JournalistResult<Payload> {
    match serde_json::to_value(request)? {
        Value::Object(map) => Ok(map),
        other => Err(JournalistError::Serialization(<serde_json::Error as serde::ser::Error>::custom(
            format!("payload must be a JSON object, got {}", other),
        ))),
    }
}

/// Reusable async operation bound to one endpoint
pub struct ActionDispatcher {
    operation: Operation,
    endpoint: Url,
    success_label: String,
    transport: Arc<dyn Transport>,
    loading: LoadingState,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("operation", &self.operation)
            .field("endpoint", &self.endpoint.as_str())
            .field("success_label", &self.success_label)
            .finish()
    }
}

impl ActionDispatcher {
    pub fn new(
        operation: Operation,
        endpoint: Url,
        success_label: impl Into<String>,
        transport: Arc<dyn Transport>,
        loading: LoadingState,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            operation,
            endpoint,
            success_label: success_label.into(),
            transport,
            loading,
            notifier,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn success_label(&self) -> &str {
        &self.success_label
    }

    /// Perform one request. No validation, no retry.
    pub async fn dispatch(&self, payload: Payload) -> JournalistResult<NormalizedResult> {
        let notice = self.notifier.loading(LOADING_LABEL);
        let _busy = self.loading.begin();

        debug!(operation = %self.operation, endpoint = %self.endpoint, ?payload, "starting dispatch");

        let outcome = self.send(payload).await;

        self.notifier.dismiss(notice);
        match &outcome {
            Ok(result) => {
                if result.was_wrapped() {
                    info!(operation = %self.operation, "no success field in response, treating as successful");
                }
                info!(operation = %self.operation, "dispatch completed");
                self.notifier.success(&self.success_label);
            }
            Err(err) => {
                warn!(operation = %self.operation, error = %err, "dispatch failed");
                self.notifier.error(&err.message());
            }
        }

        outcome
    }

    async fn send(&self, payload: Payload) -> JournalistResult<NormalizedResult> {
        let request = TransportRequest::post_json(self.endpoint.as_str(), Value::Object(payload));
        let response = self.transport.send(request).await?;

        debug!(
            operation = %self.operation,
            status = response.status,
            bytes = response.body.len(),
            "raw response"
        );

        normalize(&response)
    }
}
