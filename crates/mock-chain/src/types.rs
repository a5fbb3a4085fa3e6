//! RPC-compatible types for the mock chain.
//!
//! Addresses and byte strings travel as hex so that requests can be written
//! by hand.

use relay_module::{GenesisValidationError, RelayEvent, RelayGenesisConfig};
use relay_types::{format_address, parse_address, Address, CodecError, Revert};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::{Receipt, World};

/// Chain genesis file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainGenesis {
    /// Address the relay is deployed at
    pub relay: String,
    pub owner: String,
    pub auction: String,
    pub registry: String,
    #[serde(default)]
    pub start_paused: bool,
    #[serde(default)]
    pub timestamp: u64,
    /// Accounts funded at genesis
    #[serde(default)]
    pub accounts: Vec<GenesisAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenesisAccount {
    pub address: String,
    pub balance: u64,
}

#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Bad address in genesis: {0}")]
    Address(#[from] CodecError),

    #[error("Invalid genesis: {0}")]
    Invalid(#[from] GenesisValidationError),

    #[error("Genesis funding failed: {0}")]
    Funding(#[from] Revert),
}

impl ChainGenesis {
    /// Local development chain with fixed short addresses.
    pub fn dev() -> Self {
        Self {
            relay: "0a".to_string(),
            owner: "01".to_string(),
            auction: "0b".to_string(),
            registry: "0c".to_string(),
            start_paused: false,
            timestamp: 0,
            accounts: Vec::new(),
        }
    }

    /// Build the initial world.
    pub fn build(&self) -> Result<World, GenesisError> {
        let mut config = RelayGenesisConfig::new(
            parse_address(&self.owner)?,
            parse_address(&self.auction)?,
            parse_address(&self.registry)?,
        );
        config.start_paused = self.start_paused;

        let mut world = World::new(&config, parse_address(&self.relay)?)?;
        world.set_timestamp(self.timestamp);
        for account in &self.accounts {
            world.fund(parse_address(&account.address)?, account.balance)?;
        }
        Ok(world)
    }
}

/// Block info response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u64,
    pub timestamp: u64,
}

/// Relay overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayInfo {
    pub relay: String,
    pub owner: String,
    pub paused: bool,
    pub auction: String,
    pub registry: String,
    /// Whether an operation is in flight
    pub locked: bool,
}

/// Parameters for listing an asset on the auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAssetParams {
    pub seller: String,
    pub asset_id: u64,
    pub start_price: u64,
    pub end_price: u64,
    /// Seconds until the price reaches `end_price`
    pub duration: u64,
}

/// Parameters for a relayed bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidParams {
    pub sender: String,
    pub asset_id: u64,
    pub value: u64,
    /// Explicit warmup targets; `None` uses the relay's defaults
    #[serde(default)]
    pub warmups: Option<Vec<String>>,
}

/// Parameters for an owner call through the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallParams {
    pub sender: String,
    pub target: String,
    pub value: u64,
    /// Hex-encoded calldata
    pub data: String,
    /// Value attached to the relay call itself
    #[serde(default)]
    pub attached: u64,
}

/// Raw transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRpc {
    pub from: String,
    pub to: String,
    pub value: u64,
    /// Hex-encoded calldata
    #[serde(default)]
    pub data: String,
}

/// Transaction receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRpc {
    pub success: bool,
    /// Hex-encoded return data
    pub output: String,
    pub error: Option<String>,
    pub gas_used: u64,
    pub events: Vec<RelayEvent>,
}

impl From<Receipt> for ReceiptRpc {
    fn from(receipt: Receipt) -> Self {
        Self {
            success: receipt.success,
            output: hex::encode(&receipt.output),
            error: receipt.error,
            gas_used: receipt.gas_used,
            events: receipt.events,
        }
    }
}

pub fn address_rpc(address: &Address) -> String {
    format!("0x{}", format_address(address))
}
