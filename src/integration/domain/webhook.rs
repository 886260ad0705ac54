//! Inbound webhook deliveries and signature verification.

use super::DomainError;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// HMAC block size for SHA-256.
const BLOCK_SIZE: usize = 64;
const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Prefix used by signature headers of the form `sha256=<hex>`.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// HTTP headers of a webhook request, keyed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookHeaders(BTreeMap<String, String>);

impl WebhookHeaders {
    /// Creates an empty header set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any previous value with the same name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.0
            .insert(name.as_ref().trim().to_ascii_lowercase(), value.into());
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns whether no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates headers as lowercase name and value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for WebhookHeaders
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Webhook delivery handed to a plugin for parsing.
///
/// The host parses the body as JSON and also keeps the raw bytes so plugins
/// can verify signatures computed over the exact payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    payload: serde_json::Value,
    body: Vec<u8>,
    headers: WebhookHeaders,
}

impl WebhookRequest {
    /// Creates a request from a parsed payload, raw body, and headers.
    #[must_use]
    pub const fn new(payload: serde_json::Value, body: Vec<u8>, headers: WebhookHeaders) -> Self {
        Self {
            payload,
            body,
            headers,
        }
    }

    /// Creates a request from a raw body, parsing it as JSON.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the body is not valid JSON.
    pub fn from_body(
        body: impl Into<Vec<u8>>,
        headers: WebhookHeaders,
    ) -> Result<Self, serde_json::Error> {
        let bytes = body.into();
        let payload = serde_json::from_slice(&bytes)?;
        Ok(Self::new(payload, bytes, headers))
    }

    /// Returns the parsed payload.
    #[must_use]
    pub const fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &WebhookHeaders {
        &self.headers
    }
}

/// HMAC-SHA256 signer for webhook bodies.
#[derive(Clone)]
pub struct WebhookSignature {
    secret: Vec<u8>,
}

impl WebhookSignature {
    /// Creates a signer with the shared webhook secret.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signs a body, returning a `sha256=<hex>` header value.
    #[must_use]
    pub fn sign(&self, body: &[u8]) -> String {
        format!(
            "{SIGNATURE_PREFIX}{}",
            hex::encode(hmac_sha256(&self.secret, body))
        )
    }

    /// Verifies a signature header against a body.
    ///
    /// The `sha256=` prefix is optional. Comparison runs in constant time.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedSignature`] when the header is not
    /// valid hexadecimal.
    pub fn verify(&self, body: &[u8], header_value: &str) -> Result<bool, DomainError> {
        let trimmed = header_value.trim();
        let encoded = trimmed.strip_prefix(SIGNATURE_PREFIX).unwrap_or(trimmed);
        let provided = hex::decode(encoded)
            .map_err(|err| DomainError::MalformedSignature(err.to_string()))?;
        let expected = hmac_sha256(&self.secret, body);
        Ok(constant_time_eq(&expected, &provided))
    }
}

impl fmt::Debug for WebhookSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookSignature")
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let hashed_key;
    let key_bytes = if key.len() > BLOCK_SIZE {
        hashed_key = Sha256::digest(key);
        hashed_key.as_slice()
    } else {
        key
    };

    let mut padded = [0_u8; BLOCK_SIZE];
    for (slot, byte) in padded.iter_mut().zip(key_bytes) {
        *slot = *byte;
    }
    let inner_key: Vec<u8> = padded.iter().map(|byte| byte ^ IPAD).collect();
    let outer_key: Vec<u8> = padded.iter().map(|byte| byte ^ OPAD).collect();

    let inner = Sha256::new()
        .chain_update(&inner_key)
        .chain_update(data)
        .finalize();
    Sha256::new()
        .chain_update(&outer_key)
        .chain_update(inner)
        .finalize()
        .to_vec()
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
