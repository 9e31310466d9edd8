//! Server configuration
//!
//! One explicit configuration object, constructed at startup from CLI
//! arguments and passed into the dispatch layer. The module and scheduler
//! ids are the network's well-known transaction ids.

use std::path::PathBuf;

/// Default aos module
pub const DEFAULT_MODULE_ID: &str = "JArYBF-D8q2OmZ4Mok00sD2Y_6SYEQ7Hjx-6VZ_jl3g";

/// aos module with sqlite compiled in
pub const SQLITE_MODULE_ID: &str = "ghSkge2sIUD_F00ym5sEimC63BDBuBrq4b5OcwxOjiw";

/// Scheduler unit assigned to every spawned process
pub const SCHEDULER_ID: &str = "_GQ33BkPtZrqxA84vM8Zk-N2aO0toNNu_C-l-rawrBA";

pub const DEFAULT_MU_URL: &str = "https://mu.ao-testnet.xyz";
pub const DEFAULT_CU_URL: &str = "https://cu.ao-testnet.xyz";
pub const DEFAULT_GATEWAY_URL: &str = "https://arweave.net";

/// Official blueprints live in the aos repository
pub const DEFAULT_BLUEPRINT_BASE_URL: &str =
    "https://raw.githubusercontent.com/permaweb/aos/main/blueprints";

/// Server configuration
#[derive(Debug, Clone)]
pub struct AoConfig {
    /// Path to the Arweave JWK key file read at startup
    pub wallet_path: PathBuf,

    /// Messenger unit accepting spawns and messages
    pub mu_url: String,

    /// Compute unit serving message results
    pub cu_url: String,

    /// Arweave gateway for transaction reads
    pub gateway_url: String,

    /// Base URL official blueprints are fetched from
    pub blueprint_base_url: String,

    /// Module id used by `spawn` by default
    pub module_id: String,

    /// Module id used by `spawn` when sqlite support is requested
    pub sqlite_module_id: String,

    /// Scheduler id used by every `spawn`
    pub scheduler_id: String,
}

impl Default for AoConfig {
    fn default() -> Self {
        Self {
            wallet_path: PathBuf::from("keyfile.json"),
            mu_url: DEFAULT_MU_URL.to_string(),
            cu_url: DEFAULT_CU_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            blueprint_base_url: DEFAULT_BLUEPRINT_BASE_URL.to_string(),
            module_id: DEFAULT_MODULE_ID.to_string(),
            sqlite_module_id: SQLITE_MODULE_ID.to_string(),
            scheduler_id: SCHEDULER_ID.to_string(),
        }
    }
}

impl AoConfig {
    /// URL an official blueprint is served from.
    pub fn blueprint_url(&self, name: &str) -> String {
        format!("{}/{}.lua", self.blueprint_base_url, name)
    }

    /// Module id for a spawn, honoring the sqlite flag.
    pub fn module_for(&self, needs_sqlite: bool) -> &str {
        if needs_sqlite {
            &self.sqlite_module_id
        } else {
            &self.module_id
        }
    }
}
