//! AO message submission and result reads
//!
//! Spawn and message calls post an item envelope to a messenger unit (MU);
//! results are read back from a compute unit (CU). The `AoClient` trait is
//! the seam callers stub out in tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::types::{MessageRequest, MessageResult, SpawnRequest, Tag};
use crate::wallet::Wallet;

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Remote calls consumed by the tool surface
#[async_trait]
pub trait AoClient: Send + Sync {
    /// Create a new process; returns its id.
    async fn spawn(&self, req: SpawnRequest) -> Result<String>;

    /// Send a message to a process; returns the message id.
    async fn message(&self, req: MessageRequest) -> Result<String>;

    /// Fetch the computed result of a message.
    async fn result(&self, message_id: &str, process_id: &str) -> Result<MessageResult>;
}

/// HTTP-backed AO client
pub struct AoConnect {
    http: reqwest::Client,
    mu_url: String,
    cu_url: String,
    wallet: Arc<Wallet>,
}

/// Item envelope posted to the messenger unit
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ItemEnvelope<'a> {
    owner: &'a str,
    target: &'a str,
    data: &'a str,
    tags: &'a [Tag],
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    id: Option<String>,
}

impl AoConnect {
    pub fn new(
        mu_url: impl Into<String>,
        cu_url: impl Into<String>,
        wallet: Arc<Wallet>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            mu_url: mu_url.into(),
            cu_url: cu_url.into(),
            wallet,
        })
    }

    /// Protocol tags the network requires on every item. Caller tags are
    /// appended after these and pass through verbatim.
    fn protocol_tags(kind: &str) -> Vec<Tag> {
        vec![
            Tag::new("Data-Protocol", "ao"),
            Tag::new("Variant", "ao.TN.1"),
            Tag::new("Type", kind),
        ]
    }

    async fn submit(&self, target: &str, data: &str, tags: &[Tag]) -> Result<String> {
        let envelope = ItemEnvelope {
            owner: self.wallet.owner(),
            target,
            data,
            tags,
        };

        let response = self
            .http
            .post(&self.mu_url)
            .json(&envelope)
            .send()
            .await?
            .error_for_status()?;

        let submitted: SubmitResponse = response.json().await?;
        submitted.id.ok_or(ClientError::MissingField("id"))
    }
}

#[async_trait]
impl AoClient for AoConnect {
    async fn spawn(&self, req: SpawnRequest) -> Result<String> {
        let mut tags = Self::protocol_tags("Process");
        tags.push(Tag::new("Module", &req.module));
        tags.push(Tag::new("Scheduler", &req.scheduler));
        tags.extend(req.tags);

        let process_id = self
            .submit("", req.data.as_deref().unwrap_or(""), &tags)
            .await?;
        debug!(process_id = %process_id, module = %req.module, "spawned process");
        Ok(process_id)
    }

    async fn message(&self, req: MessageRequest) -> Result<String> {
        let mut tags = Self::protocol_tags("Message");
        tags.extend(req.tags);

        let message_id = self.submit(&req.process, &req.data, &tags).await?;
        debug!(message_id = %message_id, process = %req.process, "sent message");
        Ok(message_id)
    }

    async fn result(&self, message_id: &str, process_id: &str) -> Result<MessageResult> {
        let url = format!(
            "{}/result/{}?process-id={}",
            self.cu_url, message_id, process_id
        );
        debug!(url = %url, "reading result");

        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_tags_shape() {
        let tags = AoConnect::protocol_tags("Process");
        assert_eq!(tags[0], Tag::new("Data-Protocol", "ao"));
        assert_eq!(tags[1], Tag::new("Variant", "ao.TN.1"));
        assert_eq!(tags[2], Tag::new("Type", "Process"));
    }

    #[test]
    fn test_envelope_serialization() {
        let tags = vec![Tag::new("Action", "Eval")];
        let envelope = ItemEnvelope {
            owner: "modulus",
            target: "some-process",
            data: "return 1",
            tags: &tags,
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["Owner"], "modulus");
        assert_eq!(json["Target"], "some-process");
        assert_eq!(json["Data"], "return 1");
        assert_eq!(json["Tags"][0]["name"], "Action");
    }
}
