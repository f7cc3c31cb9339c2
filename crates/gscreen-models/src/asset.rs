//! Asset payloads and stored asset references.

use std::fmt;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Base64 engine matching browser `atob`: padding optional, trailing bits ignored.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A `<prefix>,<base64>` data URI as sent by the browser.
///
/// The prefix (e.g. `data:video/mp4;base64`) is discarded; the decoded bytes
/// are treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataUri(String);

impl DataUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text after the first comma.
    pub fn payload(&self) -> ModelResult<&str> {
        self.0
            .split_once(',')
            .map(|(_, payload)| payload)
            .ok_or(ModelError::MissingSeparator)
    }

    /// Decode the base64 payload to raw bytes.
    pub fn decode(&self) -> ModelResult<Vec<u8>> {
        let payload = self.payload()?;

        // atob strips ASCII whitespace before decoding
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        Ok(FORGIVING.decode(compact)?)
    }
}

/// Durable fetch URL of an asset held by the remote storage service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetReference(pub String);

impl AssetReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
