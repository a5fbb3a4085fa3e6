//! Bid relay module.
//!
//! This module implements the logic of a relay that bids in an external
//! auction on a caller's behalf:
//!
//! - Owner and pause gating of every state-changing entry point
//! - Bid forwarding with asset hand-off and exact refund of unspent value
//! - Optional pre-priming of addresses the bid is about to touch
//! - Owner-only rescue of stranded assets and arbitrary outbound calls
//!
//! # Architecture
//!
//! - `access`: owner/pause guard object
//! - `call`: message types and calldata encoding
//! - `handlers`: business logic for processing calls
//! - `host`: the seam to the execution environment
//! - `queries`: read-only state access
//! - `state`: relay state structures
//! - `genesis`: initial configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```ignore
//! use relay_module::{handlers, CallContext, RelayCall};
//!
//! // `host` implements `RelayHost`; the value is already credited.
//! let ctx = CallContext { sender, block_height, timestamp, value: price };
//! handlers::dispatch(&mut host, &ctx, &RelayCall::Bid { asset_id: 42 }.encode())?;
//! ```

pub mod access;
pub mod call;
pub mod error;
pub mod event;
pub mod genesis;
pub mod handlers;
pub mod host;
pub mod queries;
pub mod state;

pub use access::AccessControl;
pub use call::RelayCall;
pub use error::RelayError;
pub use event::RelayEvent;
pub use genesis::{GenesisValidationError, RelayGenesisConfig};
pub use handlers::{dispatch, CallContext, HandlerResult};
pub use host::RelayHost;
pub use queries::{handle_query, RelayQuery, RelayQueryResponse};
pub use state::{Operation, RelayState};
