//! CLI for interacting with the bid relay on the mock chain.
//!
//! This binary provides commands for:
//! - Funding accounts and setting up listings
//! - Bidding through the relay
//! - Owner operations (rescue, arbitrary call, ownership, pause)
//! - Querying balances, ownership and prices

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use tracing::info;

use relay_mock_chain::types::{
    BidParams, CallParams, ListAssetParams, ReceiptRpc, TransactionRpc,
};
use relay_mock_chain::MockChainApiClient;
use relay_types::{encode_bare_call, encode_call, parse_address};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "CLI for the bid relay")]
struct Cli {
    /// Mock chain RPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:9944")]
    rpc: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Credit an account (testing only)
    Fund {
        /// Account address (hex)
        #[arg(long)]
        address: String,

        #[arg(long)]
        amount: u64,
    },

    /// Create an asset
    Mint {
        #[arg(long)]
        asset_id: u64,

        /// Owner address (hex)
        #[arg(long)]
        owner: String,
    },

    /// Put an asset up for auction
    ListAsset {
        /// Seller address (hex), must own the asset
        #[arg(long)]
        seller: String,

        #[arg(long)]
        asset_id: u64,

        #[arg(long)]
        start_price: u64,

        /// Defaults to the start price
        #[arg(long)]
        end_price: Option<u64>,

        /// Seconds until the end price is reached
        #[arg(long, default_value = "3600")]
        duration: u64,
    },

    /// Bid on an asset through the relay
    Bid {
        /// Bidder address (hex)
        #[arg(long)]
        sender: String,

        #[arg(long)]
        asset_id: u64,

        /// Value to send; defaults to the current price
        #[arg(long)]
        value: Option<u64>,

        /// Warmup target (hex), may be repeated
        #[arg(long = "warmup")]
        warmups: Vec<String>,

        /// Use the given warmup list even when it is empty
        #[arg(long)]
        explicit_warmups: bool,
    },

    /// Move an asset stuck in the relay (owner only)
    Rescue {
        /// Owner address (hex)
        #[arg(long)]
        sender: String,

        #[arg(long)]
        asset_id: u64,

        /// Recipient address (hex)
        #[arg(long)]
        recipient: String,
    },

    /// Arbitrary call from the relay (owner only)
    Call {
        /// Owner address (hex)
        #[arg(long)]
        sender: String,

        /// Target address (hex)
        #[arg(long)]
        target: String,

        /// Value forwarded to the target
        #[arg(long, default_value = "0")]
        value: u64,

        /// Hex calldata
        #[arg(long, default_value = "")]
        data: String,

        /// Build the calldata from a signature instead, e.g. "getCurrentPrice(u64)"
        #[arg(long, conflicts_with = "data")]
        signature: Option<String>,

        /// u64 argument for --signature
        #[arg(long, requires = "signature")]
        arg: Option<u64>,

        /// Value attached to the relay call itself
        #[arg(long, default_value = "0")]
        attached: u64,
    },

    /// Hand the relay to a new owner
    TransferOwnership {
        #[arg(long)]
        sender: String,

        #[arg(long)]
        new_owner: String,
    },

    /// Pause the relay
    Pause {
        #[arg(long)]
        sender: String,
    },

    /// Resume the relay
    Unpause {
        #[arg(long)]
        sender: String,
    },

    /// Send a raw transaction
    Send {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(long, default_value = "0")]
        value: u64,

        /// Hex calldata; empty for a plain transfer
        #[arg(long, default_value = "")]
        data: String,
    },

    /// Show relay configuration and status
    Info,

    /// Get an account balance
    Balance {
        #[arg(long)]
        address: String,
    },

    /// Get the owner of an asset
    OwnerOf {
        #[arg(long)]
        asset_id: u64,
    },

    /// Get the current auction price of an asset
    Price {
        #[arg(long)]
        asset_id: u64,
    },

    /// Advance chain time (for testing)
    AdvanceBlock,

    /// Set chain timestamp (for testing)
    SetTimestamp {
        /// Unix timestamp to set
        #[arg(long)]
        timestamp: u64,
    },
}

fn print_receipt(receipt: &ReceiptRpc) -> Result<()> {
    if receipt.success {
        println!("Transaction succeeded");
    } else {
        println!("Transaction reverted");
    }
    println!("  Gas used: {}", receipt.gas_used);
    if let Some(error) = &receipt.error {
        println!("  Error: {}", error);
    }
    if !receipt.output.is_empty() {
        println!("  Output: 0x{}", receipt.output);
    }
    for event in &receipt.events {
        println!("  Event: {}", serde_json::to_string(event)?);
    }
    Ok(())
}

async fn bid_cmd(
    client: &HttpClient,
    sender: String,
    asset_id: u64,
    value: Option<u64>,
    warmups: Vec<String>,
    explicit_warmups: bool,
) -> Result<()> {
    let value = match value {
        Some(value) => value,
        None => match client.query_current_price(asset_id).await? {
            Some(price) => price,
            None => bail!("Asset {} is not on auction", asset_id),
        },
    };

    for warmup in &warmups {
        parse_address(warmup)?;
    }
    let warmups = if warmups.is_empty() && !explicit_warmups {
        None
    } else {
        Some(warmups)
    };

    info!("Bidding {} on asset {}", value, asset_id);
    let receipt = client
        .relay_bid(BidParams {
            sender,
            asset_id,
            value,
            warmups,
        })
        .await?;
    print_receipt(&receipt)
}

async fn info_cmd(client: &HttpClient) -> Result<()> {
    let relay = client.query_relay_info().await?;
    let block = client.query_block_info().await?;

    println!("Relay {}:", relay.relay);
    println!("  Owner: {}", relay.owner);
    println!("  Paused: {}", relay.paused);
    println!("  Auction: {}", relay.auction);
    println!("  Registry: {}", relay.registry);
    println!("  Locked: {}", relay.locked);
    println!("Block {} at {}", block.height, block.timestamp);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("relay_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let client = HttpClientBuilder::default().build(&cli.rpc)?;

    match cli.command {
        Commands::Fund { address, amount } => {
            let balance = client.admin_fund(address, amount).await?;
            println!("Balance: {}", balance);
        }

        Commands::Mint { asset_id, owner } => {
            client.admin_mint(asset_id, owner).await?;
            println!("Minted asset {}", asset_id);
        }

        Commands::ListAsset {
            seller,
            asset_id,
            start_price,
            end_price,
            duration,
        } => {
            client
                .admin_list_asset(ListAssetParams {
                    seller,
                    asset_id,
                    start_price,
                    end_price: end_price.unwrap_or(start_price),
                    duration,
                })
                .await?;
            println!("Asset {} listed", asset_id);
        }

        Commands::Bid {
            sender,
            asset_id,
            value,
            warmups,
            explicit_warmups,
        } => {
            bid_cmd(&client, sender, asset_id, value, warmups, explicit_warmups).await?;
        }

        Commands::Rescue {
            sender,
            asset_id,
            recipient,
        } => {
            let receipt = client
                .relay_rescue_lost_asset(sender, asset_id, recipient)
                .await?;
            print_receipt(&receipt)?;
        }

        Commands::Call {
            sender,
            target,
            value,
            data,
            signature,
            arg,
            attached,
        } => {
            let data = match signature {
                Some(signature) => hex::encode(match arg {
                    Some(arg) => encode_call(&signature, &arg),
                    None => encode_bare_call(&signature),
                }),
                None => data,
            };
            let receipt = client
                .relay_call(CallParams {
                    sender,
                    target,
                    value,
                    data,
                    attached,
                })
                .await?;
            print_receipt(&receipt)?;
        }

        Commands::TransferOwnership { sender, new_owner } => {
            let receipt = client.relay_transfer_ownership(sender, new_owner).await?;
            print_receipt(&receipt)?;
        }

        Commands::Pause { sender } => {
            print_receipt(&client.relay_pause(sender).await?)?;
        }

        Commands::Unpause { sender } => {
            print_receipt(&client.relay_unpause(sender).await?)?;
        }

        Commands::Send {
            from,
            to,
            value,
            data,
        } => {
            let receipt = client
                .chain_send(TransactionRpc {
                    from,
                    to,
                    value,
                    data,
                })
                .await?;
            print_receipt(&receipt)?;
        }

        Commands::Info => {
            info_cmd(&client).await?;
        }

        Commands::Balance { address } => {
            println!("Balance: {}", client.query_balance(address).await?);
        }

        Commands::OwnerOf { asset_id } => match client.query_owner_of(asset_id).await? {
            Some(owner) => println!("Asset {} owned by {}", asset_id, owner),
            None => println!("Asset {} does not exist", asset_id),
        },

        Commands::Price { asset_id } => match client.query_current_price(asset_id).await? {
            Some(price) => println!("Asset {} current price: {}", asset_id, price),
            None => println!("Asset {} is not on auction", asset_id),
        },

        Commands::AdvanceBlock => {
            let block = client.admin_advance_block().await?;
            println!("Block {} at {}", block.height, block.timestamp);
        }

        Commands::SetTimestamp { timestamp } => {
            client.admin_set_timestamp(timestamp).await?;
            println!("Timestamp set to {}", timestamp);
        }
    }

    Ok(())
}
