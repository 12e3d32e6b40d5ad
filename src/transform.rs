use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Marker written into `status` once a message has been transformed.
pub const PROCESSED: &str = "PROCESSED";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to decode message: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// The record carried through the pipeline.
///
/// Decoding is lenient: keys match ASCII case-insensitively, a repeated key
/// overwrites the earlier value, an absent key or a JSON `null` leaves the
/// field untouched (empty by default) and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub payload: String,
    pub status: String,
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(MessageVisitor)
    }
}

struct MessageVisitor;

impl<'de> Visitor<'de> for MessageVisitor {
    type Value = Message;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a message object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Message, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut message = Message::default();

        while let Some(key) = map.next_key::<String>()? {
            let slot = if key.eq_ignore_ascii_case("id") {
                Some(&mut message.id)
            } else if key.eq_ignore_ascii_case("payload") {
                Some(&mut message.payload)
            } else if key.eq_ignore_ascii_case("status") {
                Some(&mut message.status)
            } else {
                None
            };

            match slot {
                Some(slot) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *slot = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        Ok(message)
    }
}

impl Message {
    /// Decode a message from its JSON encoding.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD before parsing.
    ///
    /// # Errors
    /// Returns [`TransformError::Decode`] when the bytes are not a well-formed
    /// JSON object whose known fields are strings or `null`.
    pub fn decode(input: &[u8]) -> Result<Self> {
        serde_json::from_str(&String::from_utf8_lossy(input))
            .map_err(|source| TransformError::Decode { source })
    }

    /// Upper-case the payload and mark the message as processed. `id` is kept.
    #[must_use]
    pub fn process(mut self) -> Self {
        self.payload = self.payload.to_uppercase();
        self.status = PROCESSED.to_string();
        self
    }

    /// Compact JSON encoding of the message.
    #[must_use]
    pub fn encode(self) -> Vec<u8> {
        Value::from(self).to_string().into_bytes()
    }
}

impl From<Message> for Value {
    fn from(message: Message) -> Self {
        let mut map = Map::with_capacity(3);
        map.insert("id".to_string(), Value::String(message.id));
        map.insert("payload".to_string(), Value::String(message.payload));
        map.insert("status".to_string(), Value::String(message.status));
        Value::Object(map)
    }
}

/// Decode, process and re-encode a single message.
///
/// # Errors
/// Returns [`TransformError::Decode`] if `input` cannot be decoded into a
/// [`Message`]. Nothing is produced in that case.
pub fn transform(input: &[u8]) -> Result<Vec<u8>> {
    Ok(Message::decode(input)?.process().encode())
}

pub trait MessageTransformer: Send + Sync {
    /// Transform an encoded message into a new encoded message.
    ///
    /// # Errors
    /// Implementations return an error when the input cannot be turned into
    /// an output message, e.g. undecodable bytes.
    fn transform(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Upper-cases `payload` and stamps `status` with [`PROCESSED`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseTransformer;

impl MessageTransformer for UppercaseTransformer {
    fn transform(&self, input: &[u8]) -> Result<Vec<u8>> {
        transform(input)
    }
}
