//! Network bridge
//!
//! Unified interface the tool handlers call, in either mock or real mode.
//! Real mode drives the AO messenger/compute units and the Arweave gateway;
//! mock mode records every call and answers with canned data, for tests and
//! `--mock` runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::sync::Mutex;

use ao_client::{
    AoClient, AoConnect, ClientError, EncodedTag, GatewayClient, MessageRequest, MessageResult,
    OutputData, ProcessOutput, SpawnRequest, Tag, TxMetadata, Wallet,
};

use crate::config::AoConfig;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge error types
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("process reported an error: {0}")]
    Remote(String),
}

/// Operation mode
enum BridgeMode {
    /// Records calls and returns canned data
    Mock(MockNetwork),
    /// Talks to the actual network
    Real {
        ao: AoConnect,
        gateway: GatewayClient,
    },
}

/// Unified remote access for tool handlers
pub struct AoBridge {
    mode: BridgeMode,
}

impl AoBridge {
    /// Connect to the network using the configured endpoints and wallet.
    pub fn connect(config: &AoConfig) -> Result<Self> {
        let wallet = Arc::new(Wallet::load(&config.wallet_path)?);
        let ao = AoConnect::new(&config.mu_url, &config.cu_url, wallet)?;
        let gateway = GatewayClient::new(&config.gateway_url)?;
        Ok(Self {
            mode: BridgeMode::Real { ao, gateway },
        })
    }

    /// Create a bridge backed by a recording mock.
    pub fn new_mock() -> Self {
        Self {
            mode: BridgeMode::Mock(MockNetwork::new()),
        }
    }

    /// Access the mock, if this bridge runs in mock mode.
    pub fn mock(&self) -> Option<&MockNetwork> {
        match &self.mode {
            BridgeMode::Mock(mock) => Some(mock),
            BridgeMode::Real { .. } => None,
        }
    }

    /// Spawn a process; returns its id.
    pub async fn spawn(
        &self,
        module: &str,
        scheduler: &str,
        tags: Vec<Tag>,
    ) -> Result<String> {
        match &self.mode {
            BridgeMode::Mock(mock) => mock.spawn(module, scheduler, tags),
            BridgeMode::Real { ao, .. } => Ok(ao
                .spawn(SpawnRequest {
                    module: module.to_string(),
                    scheduler: scheduler.to_string(),
                    tags,
                    data: None,
                })
                .await?),
        }
    }

    /// Send a message to a process; returns the message id.
    pub async fn send(&self, process: &str, data: &str, tags: Vec<Tag>) -> Result<String> {
        match &self.mode {
            BridgeMode::Mock(mock) => mock.message(process, data, tags),
            BridgeMode::Real { ao, .. } => Ok(ao
                .message(MessageRequest {
                    process: process.to_string(),
                    data: data.to_string(),
                    tags,
                })
                .await?),
        }
    }

    /// Fetch the computed result of a message.
    pub async fn read_result(&self, message_id: &str, process_id: &str) -> Result<MessageResult> {
        match &self.mode {
            BridgeMode::Mock(mock) => mock.result(message_id, process_id),
            BridgeMode::Real { ao, .. } => Ok(ao.result(message_id, process_id).await?),
        }
    }

    /// Send code to a process as an `Eval` action and fetch the result.
    pub async fn eval(
        &self,
        process_id: &str,
        code: &str,
        extra_tags: Vec<Tag>,
    ) -> Result<MessageResult> {
        let mut tags = vec![Tag::new("Action", "Eval")];
        tags.extend(extra_tags);
        let message_id = self.send(process_id, code, tags).await?;
        self.read_result(&message_id, process_id).await
    }

    /// Fetch transaction metadata from the gateway.
    pub async fn tx_metadata(&self, id: &str) -> Result<TxMetadata> {
        match &self.mode {
            BridgeMode::Mock(mock) => mock.tx_metadata(id),
            BridgeMode::Real { gateway, .. } => Ok(gateway.tx_metadata(id).await?),
        }
    }

    /// Fetch the raw transaction payload from the gateway.
    pub async fn tx_data(&self, id: &str) -> Result<String> {
        match &self.mode {
            BridgeMode::Mock(mock) => mock.tx_data(id),
            BridgeMode::Real { gateway, .. } => Ok(gateway.tx_data(id).await?),
        }
    }

    /// Fetch arbitrary source text, e.g. a blueprint.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        match &self.mode {
            BridgeMode::Mock(mock) => mock.fetch_text(url),
            BridgeMode::Real { gateway, .. } => Ok(gateway.fetch_text(url).await?),
        }
    }
}

/// One remote call as observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Spawn {
        module: String,
        scheduler: String,
        tags: Vec<Tag>,
    },
    Message {
        process: String,
        data: String,
        tags: Vec<Tag>,
    },
    Result {
        message: String,
        process: String,
    },
    TxMetadata {
        id: String,
    },
    TxData {
        id: String,
    },
    Fetch {
        url: String,
    },
}

/// Recording stand-in for the network
pub struct MockNetwork {
    calls: Mutex<Vec<RecordedCall>>,
    counter: AtomicU64,
    eval_output: Mutex<String>,
    canned_tx_data: Mutex<String>,
    canned_source: Mutex<String>,
    fail_with: Mutex<Option<String>>,
}

impl MockNetwork {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
            eval_output: Mutex::new("ok".to_string()),
            canned_tx_data: Mutex::new("mock transaction payload".to_string()),
            canned_source: Mutex::new("print('blueprint loaded')".to_string()),
            fail_with: Mutex::new(None),
        }
    }

    /// Everything the bridge was asked to do, in order.
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock lock").clone()
    }

    /// Set the output every subsequent result read reports.
    pub fn set_eval_output(&self, output: impl Into<String>) {
        *self.eval_output.lock().expect("mock lock") = output.into();
    }

    /// Set the payload served for raw transaction reads.
    pub fn set_tx_data(&self, data: impl Into<String>) {
        *self.canned_tx_data.lock().expect("mock lock") = data.into();
    }

    /// Set the text served for source fetches.
    pub fn set_source(&self, source: impl Into<String>) {
        *self.canned_source.lock().expect("mock lock") = source.into();
    }

    /// Make every subsequent call fail with the given message.
    pub fn set_fail(&self, message: impl Into<String>) {
        *self.fail_with.lock().expect("mock lock") = Some(message.into());
    }

    fn record(&self, call: RecordedCall) -> Result<()> {
        self.calls.lock().expect("mock lock").push(call);
        match &*self.fail_with.lock().expect("mock lock") {
            Some(message) => Err(BridgeError::Remote(message.clone())),
            None => Ok(()),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:04}", prefix, n)
    }

    fn spawn(&self, module: &str, scheduler: &str, tags: Vec<Tag>) -> Result<String> {
        self.record(RecordedCall::Spawn {
            module: module.to_string(),
            scheduler: scheduler.to_string(),
            tags,
        })?;
        Ok(self.next_id("mock-process"))
    }

    fn message(&self, process: &str, data: &str, tags: Vec<Tag>) -> Result<String> {
        self.record(RecordedCall::Message {
            process: process.to_string(),
            data: data.to_string(),
            tags,
        })?;
        Ok(self.next_id("mock-message"))
    }

    fn result(&self, message_id: &str, process_id: &str) -> Result<MessageResult> {
        self.record(RecordedCall::Result {
            message: message_id.to_string(),
            process: process_id.to_string(),
        })?;
        let output = self.eval_output.lock().expect("mock lock").clone();
        Ok(MessageResult {
            output: Some(ProcessOutput {
                data: Some(OutputData::Text(output)),
                prompt: Some("aos> ".to_string()),
                print: Some(true),
            }),
            ..Default::default()
        })
    }

    fn tx_metadata(&self, id: &str) -> Result<TxMetadata> {
        self.record(RecordedCall::TxMetadata { id: id.to_string() })?;
        let data_size = self.canned_tx_data.lock().expect("mock lock").len();
        Ok(TxMetadata {
            id: id.to_string(),
            owner: "mock-owner".to_string(),
            target: "mock-recipient".to_string(),
            quantity: "0".to_string(),
            reward: "65596".to_string(),
            data_size: data_size.to_string(),
            tags: vec![EncodedTag::encode("Content-Type", "text/plain")],
        })
    }

    fn tx_data(&self, id: &str) -> Result<String> {
        self.record(RecordedCall::TxData { id: id.to_string() })?;
        Ok(self.canned_tx_data.lock().expect("mock lock").clone())
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        self.record(RecordedCall::Fetch {
            url: url.to_string(),
        })?;
        Ok(self.canned_source.lock().expect("mock lock").clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_spawn_arguments() {
        let bridge = AoBridge::new_mock();
        let tags = vec![Tag::new("Name", "test")];
        let process_id = bridge.spawn("module-a", "sched-b", tags.clone()).await.unwrap();
        assert!(process_id.starts_with("mock-process-"));

        let calls = bridge.mock().unwrap().recorded_calls();
        assert_eq!(
            calls[0],
            RecordedCall::Spawn {
                module: "module-a".to_string(),
                scheduler: "sched-b".to_string(),
                tags,
            }
        );
    }

    #[tokio::test]
    async fn test_eval_sends_eval_action_then_reads_result() {
        let bridge = AoBridge::new_mock();
        bridge.mock().unwrap().set_eval_output("42");

        let result = bridge.eval("proc-1", "return 42", vec![]).await.unwrap();
        assert_eq!(result.output_text().as_deref(), Some("42"));

        let calls = bridge.mock().unwrap().recorded_calls();
        match &calls[0] {
            RecordedCall::Message { process, data, tags } => {
                assert_eq!(process, "proc-1");
                assert_eq!(data, "return 42");
                assert_eq!(tags[0], Tag::new("Action", "Eval"));
            }
            other => panic!("expected message call, got {:?}", other),
        }
        match &calls[1] {
            RecordedCall::Result { process, .. } => assert_eq!(process, "proc-1"),
            other => panic!("expected result call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let bridge = AoBridge::new_mock();
        bridge.mock().unwrap().set_fail("network unreachable");

        let err = bridge.spawn("m", "s", vec![]).await.unwrap_err();
        assert!(matches!(err, BridgeError::Remote(_)));
    }
}
