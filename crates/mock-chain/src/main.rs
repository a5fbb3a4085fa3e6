//! Mock chain server for local testing of the bid relay.
//!
//! This provides a JSON-RPC server that hosts the relay next to a reference
//! auction and registry without requiring a real blockchain.

use anyhow::{Context, Result};
use clap::Parser;
use jsonrpsee::server::Server;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use relay_mock_chain::types::address_rpc;
use relay_mock_chain::{ChainGenesis, MockChainApiServer, MockChainServer};

#[derive(Parser)]
#[command(name = "mock-chain")]
#[command(about = "Local chain hosting the bid relay")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:9944")]
    listen: SocketAddr,

    /// Genesis file (JSON); a development genesis is used if omitted
    #[arg(long)]
    genesis: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relay_mock_chain=info".parse()?)
                .add_directive("mock_chain=info".parse()?)
                .add_directive("relay_module=info".parse()?)
                .add_directive("jsonrpsee=warn".parse()?),
        )
        .init();

    let args = Args::parse();

    let genesis = match &args.genesis {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading genesis {}", path.display()))?;
            serde_json::from_str::<ChainGenesis>(&raw).context("parsing genesis")?
        }
        None => ChainGenesis::dev(),
    };
    let world = genesis.build()?;

    info!(
        relay = %address_rpc(&world.relay_address()),
        auction = %address_rpc(&world.auction_address()),
        registry = %address_rpc(&world.registry_address()),
        "Genesis loaded"
    );
    info!("Starting mock chain server on {}", args.listen);

    let server = Server::builder().build(args.listen).await?;
    let handle = server.start(MockChainServer::new(world).into_rpc());

    info!("Mock chain server running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.stop()?;
    handle.stopped().await;

    Ok(())
}
