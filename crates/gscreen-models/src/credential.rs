//! Caller-supplied service credential.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Bearer token forwarded to the inference service.
///
/// Lives for exactly one request. Not `Serialize`; `Debug` and `Display`
/// never print the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token, for building the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// Accepts a JSON string only. A value of any other type is rejected
/// without echoing it into the error message.
impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(token) => Ok(Self(token)),
            _ => Err(D::Error::custom("credential must be a string")),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}
