//! Request and result types for AO calls

use serde::{Deserialize, Serialize};

/// A (name, value) annotation attached to a spawn or message call.
/// Interpreted only by the remote network; forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Parameters for creating a new process
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    /// Module transaction id the process executes
    pub module: String,

    /// Scheduler unit assigned to the process
    pub scheduler: String,

    /// Caller tags, passed through unmodified
    pub tags: Vec<Tag>,

    /// Optional boot data
    pub data: Option<String>,
}

/// Parameters for sending a message to a process
#[derive(Debug, Clone)]
pub struct MessageRequest {
    /// Target process id
    pub process: String,

    /// Message payload
    pub data: String,

    /// Caller tags, passed through unmodified
    pub tags: Vec<Tag>,
}

/// Computed result of a message, as reported by a compute unit.
///
/// Every field is optional on the wire; absent fields deserialize to their
/// defaults rather than failing the whole result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MessageResult {
    /// Outbox messages produced by the evaluation
    pub messages: Vec<serde_json::Value>,

    /// Processes spawned by the evaluation
    pub spawns: Vec<serde_json::Value>,

    /// Console output of the evaluation
    pub output: Option<ProcessOutput>,

    /// Error reported by the process, if the evaluation failed
    pub error: Option<String>,

    pub gas_used: Option<u64>,
}

impl MessageResult {
    /// Resolve the printable output of this result, if the process produced
    /// any. Handles both shapes the compute unit emits for `Output.data`.
    pub fn output_text(&self) -> Option<String> {
        match self.output.as_ref()?.data.as_ref()? {
            OutputData::Text(s) => Some(s.clone()),
            OutputData::Structured { output, .. } => output.clone(),
            OutputData::Raw(v) => Some(v.to_string()),
        }
    }
}

/// The `Output` object of a message result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOutput {
    pub data: Option<OutputData>,
    pub prompt: Option<String>,
    pub print: Option<bool>,
}

/// `Output.data` arrives either as a bare string or as an object carrying
/// the printable text in an `output` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputData {
    Text(String),
    Structured {
        #[serde(default)]
        output: Option<String>,
        #[serde(default)]
        prompt: Option<String>,
        #[serde(default)]
        json: Option<serde_json::Value>,
    },
    Raw(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_string_output() {
        let json = r#"{
            "Messages": [],
            "Spawns": [],
            "Output": { "data": "hello", "prompt": "aos> " },
            "GasUsed": 512
        }"#;

        let result: MessageResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.output_text().as_deref(), Some("hello"));
        assert_eq!(result.gas_used, Some(512));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_result_with_structured_output() {
        let json = r#"{
            "Output": { "data": { "output": "42", "prompt": "aos> " } }
        }"#;

        let result: MessageResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.output_text().as_deref(), Some("42"));
    }

    #[test]
    fn test_result_with_numeric_output() {
        let json = r#"{ "Output": { "data": 42 } }"#;

        let result: MessageResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.output_text().as_deref(), Some("42"));
    }

    #[test]
    fn test_empty_result() {
        let result: MessageResult = serde_json::from_str("{}").unwrap();
        assert!(result.output_text().is_none());
        assert!(result.messages.is_empty());
        assert!(result.spawns.is_empty());
    }

    #[test]
    fn test_result_with_error() {
        let json = r#"{ "Error": "attempt to call a nil value" }"#;

        let result: MessageResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.error.as_deref(), Some("attempt to call a nil value"));
        assert!(result.output_text().is_none());
    }

    #[test]
    fn test_tag_roundtrip() {
        let tag = Tag::new("Action", "Eval");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, r#"{"name":"Action","value":"Eval"}"#);
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
    }
}
