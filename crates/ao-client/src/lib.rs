//! AO network client
//!
//! This crate implements the remote-interaction layer used by the ao-mcp
//! server: a wallet credential loaded from an Arweave JWK key file, message
//! submission to an AO messenger unit (spawn and message), result reads from
//! a compute unit, and plain HTTP reads against an Arweave gateway.
//!
//! The crate knows nothing about MCP. Callers construct requests, await the
//! typed results, and decide how to present them.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ao_client::{AoClient, AoConnect, SpawnRequest, Tag, Wallet};
//!
//! # async fn run() -> Result<(), ao_client::ClientError> {
//! let wallet = Arc::new(Wallet::load("keyfile.json".as_ref())?);
//! let client = AoConnect::new(
//!     "https://mu.ao-testnet.xyz",
//!     "https://cu.ao-testnet.xyz",
//!     wallet,
//! )?;
//!
//! let process_id = client
//!     .spawn(SpawnRequest {
//!         module: "JArYBF-D8q2OmZ4Mok00sD2Y_6SYEQ7Hjx-6VZ_jl3g".into(),
//!         scheduler: "_GQ33BkPtZrqxA84vM8Zk-N2aO0toNNu_C-l-rawrBA".into(),
//!         tags: vec![Tag::new("Name", "my-process")],
//!         data: None,
//!     })
//!     .await?;
//! # let _ = process_id;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;
pub mod wallet;

pub use client::{AoClient, AoConnect};
pub use error::{ClientError, Result};
pub use gateway::{EncodedTag, GatewayClient, TxMetadata};
pub use types::{MessageRequest, MessageResult, OutputData, ProcessOutput, SpawnRequest, Tag};
pub use wallet::Wallet;
