//! Mock chain for local testing of the bid relay.
//!
//! Simulates the world the relay runs in: accounts with native balances, a
//! Dutch auction, an asset registry and per-transaction access metering.
//! The [`World`] can be driven directly from tests or served over JSON-RPC
//! by the `mock-chain` binary.

pub mod auction;
pub mod meter;
pub mod registry;
pub mod rpc;
pub mod server;
pub mod types;
pub mod world;

pub use rpc::{MockChainApiClient, MockChainApiServer};
pub use server::MockChainServer;
pub use types::ChainGenesis;
pub use world::{Receipt, Transaction, World};
