//! Plain HTTP reads against an Arweave gateway
//!
//! Serves the transaction summary tool (`/tx/{id}` metadata plus `/raw/{id}`
//! payload) and blueprint source fetches from arbitrary URLs.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::types::Tag;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Gateway HTTP client
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

/// Transaction metadata as served by `/tx/{id}`.
///
/// Amounts and sizes arrive as decimal strings; tags arrive base64url-encoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TxMetadata {
    pub id: String,
    pub owner: String,
    pub target: String,
    pub quantity: String,
    pub reward: String,
    pub data_size: String,
    pub tags: Vec<EncodedTag>,
}

/// A tag as stored on the ledger, name and value base64url-encoded
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodedTag {
    pub name: String,
    pub value: String,
}

impl EncodedTag {
    /// Encode a plain-text tag the way the ledger stores it.
    pub fn encode(name: &str, value: &str) -> Self {
        Self {
            name: URL_SAFE_NO_PAD.encode(name),
            value: URL_SAFE_NO_PAD.encode(value),
        }
    }
}

impl TxMetadata {
    /// Decode the ledger tags; entries that are not valid base64url UTF-8
    /// are skipped.
    pub fn decoded_tags(&self) -> Vec<Tag> {
        self.tags
            .iter()
            .filter_map(|tag| {
                let name = decode_field(&tag.name)?;
                let value = decode_field(&tag.value)?;
                Some(Tag { name, value })
            })
            .collect()
    }
}

fn decode_field(encoded: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch transaction metadata.
    pub async fn tx_metadata(&self, id: &str) -> Result<TxMetadata> {
        let url = format!("{}/tx/{}", self.base_url, id);
        let response = self.checked_get(&url).await?;
        Ok(response.json().await?)
    }

    /// Fetch the raw transaction payload as text.
    pub async fn tx_data(&self, id: &str) -> Result<String> {
        let url = format!("{}/raw/{}", self.base_url, id);
        let response = self.checked_get(&url).await?;
        Ok(response.text().await?)
    }

    /// Fetch arbitrary source text, e.g. a blueprint.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.checked_get(url).await?;
        Ok(response.text().await?)
    }

    async fn checked_get(&self, url: &str) -> Result<reqwest::Response> {
        debug!(url = %url, "gateway GET");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Gateway {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_tags() {
        let meta = TxMetadata {
            tags: vec![
                EncodedTag {
                    name: URL_SAFE_NO_PAD.encode("Content-Type"),
                    value: URL_SAFE_NO_PAD.encode("text/plain"),
                },
                EncodedTag {
                    name: "!!! not base64 !!!".to_string(),
                    value: "xyz".to_string(),
                },
            ],
            ..Default::default()
        };

        let tags = meta.decoded_tags();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Content-Type");
        assert_eq!(tags[0].value, "text/plain");
    }

    #[test]
    fn test_metadata_deserializes_with_missing_fields() {
        let meta: TxMetadata = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(meta.id, "abc");
        assert!(meta.tags.is_empty());
        assert_eq!(meta.quantity, "");
    }
}
