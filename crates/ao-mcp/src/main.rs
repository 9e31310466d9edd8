//! AO MCP Server
//!
//! A Model Context Protocol server that lets AI agents spawn AO processes,
//! message them, and evaluate Lua inside them.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ao_mcp::{AoConfig, McpServer};

/// AO MCP Server - AO compute network tools for AI agents
#[derive(Parser, Debug)]
#[command(name = "ao-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the Arweave JWK key file
    #[arg(short, long, default_value = "keyfile.json")]
    wallet: PathBuf,

    /// Messenger unit URL (accepts spawns and messages)
    #[arg(long, default_value = ao_mcp::config::DEFAULT_MU_URL)]
    mu_url: String,

    /// Compute unit URL (serves message results)
    #[arg(long, default_value = ao_mcp::config::DEFAULT_CU_URL)]
    cu_url: String,

    /// Arweave gateway URL (serves transaction data)
    #[arg(long, default_value = ao_mcp::config::DEFAULT_GATEWAY_URL)]
    gateway_url: String,

    /// Answer every tool call from a recording mock instead of the network
    #[arg(long)]
    mock: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logging goes to stderr; stdout is reserved for MCP protocol frames
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from(args.log_level))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("AO MCP server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AoConfig {
        wallet_path: args.wallet,
        mu_url: args.mu_url,
        cu_url: args.cu_url,
        gateway_url: args.gateway_url,
        ..AoConfig::default()
    };

    let server = if args.mock {
        info!("Using recording mock instead of the network");
        McpServer::with_mock(config)
    } else {
        match McpServer::connect(config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to load wallet or connect: {}", e);
                eprintln!("Place an Arweave JWK key file at the --wallet path,");
                eprintln!("or use --mock to run without a wallet.");
                std::process::exit(1);
            }
        }
    };

    info!("Starting stdio transport");
    server.run_stdio().await.map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}
