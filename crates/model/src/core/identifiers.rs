use crate::core::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use uuid::Uuid;

const AP_ID_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Largest multiple of the alphabet size that fits in a byte.
const UNBIASED_BOUND: u8 = 248;

/// Maps bytes to alphabet characters, dropping bytes at or above
/// `UNBIASED_BOUND` so every character is equally likely.
fn alphabet_digits(bytes: impl Iterator<Item = u8>) -> impl Iterator<Item = char> {
    bytes
        .filter(|b| *b < UNBIASED_BOUND)
        .map(|b| AP_ID_ALPHABET[b as usize % AP_ID_ALPHABET.len()] as char)
}

/// Primary key used by platform entities: 21 characters from `[0-9A-Za-z]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApId(Arc<str>);

impl ApId {
    pub const LENGTH: usize = 21;

    /// Generates a fresh random id.
    pub fn generate() -> Self {
        let mut id = String::with_capacity(Self::LENGTH);
        while id.len() < Self::LENGTH {
            let entropy = Uuid::new_v4();
            // Bytes 6 and 8 carry the uuid version and variant bits.
            let random = entropy
                .as_bytes()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != 6 && *i != 8)
                .map(|(_, b)| *b);
            id.extend(alphabet_digits(random).take(Self::LENGTH - id.len()));
        }

        Self(Arc::from(id))
    }

    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let valid =
            value.len() == Self::LENGTH && value.bytes().all(|b| b.is_ascii_alphanumeric());
        if !valid {
            return Err(ModelError::InvalidId {
                value: value.to_string(),
                expected: Self::LENGTH,
            });
        }
        Ok(Self(Arc::from(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ApId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ApId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApId> for String {
    fn from(id: ApId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Display for ApId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies the flow a key-value store is scoped to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(Arc<str>);

impl FlowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Arc::from(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FlowId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for FlowId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
