//! Core type definitions for the bid relay.
//!
//! This crate provides the data structures shared by the relay module, the
//! mock chain and the client: addresses and amounts, the calldata codec
//! (selector + borsh arguments) and the interfaces of the external auction
//! and asset registry the relay talks to.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub mod interfaces;

pub use interfaces::{AuctionCall, AuctionRecord, RegistryCall};

// =========================
// PRIMITIVES
// =========================

/// Generic address type (32 bytes)
pub type Address = [u8; 32];

/// Identifier of an asset in the external registry
pub type AssetId = u64;

/// Native value, in the smallest unit
pub type Amount = u64;

/// First four bytes of the SHA-256 digest of a call signature
pub type Selector = [u8; 4];

/// The null identifier.
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Returns true for the null identifier.
pub fn is_zero_address(address: &Address) -> bool {
    *address == ZERO_ADDRESS
}

/// Parse a hex address, with or without `0x` prefix.
///
/// Shorter inputs fill the leading bytes; the rest stays zero.
pub fn parse_address(s: &str) -> Result<Address, CodecError> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| CodecError::InvalidAddress(e.to_string()))?;
    if bytes.len() > 32 {
        return Err(CodecError::InvalidAddress(format!(
            "{} bytes, expected at most 32",
            bytes.len()
        )));
    }
    let mut addr = ZERO_ADDRESS;
    addr[..bytes.len()].copy_from_slice(&bytes);
    Ok(addr)
}

/// Hex form of an address (no prefix).
pub fn format_address(address: &Address) -> String {
    hex::encode(address)
}

// =========================
// FAILURES
// =========================

/// Failure reported by a callee. The reason travels unmodified to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Error, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[error("{reason}")]
pub struct Revert {
    pub reason: String,
}

impl Revert {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors produced while encoding or decoding calldata.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Calldata shorter than a selector")]
    MissingSelector,

    #[error("Unknown selector: 0x{}", hex::encode(.0))]
    UnknownSelector(Selector),

    #[error("Malformed arguments: {0}")]
    Malformed(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

// =========================
// CALLDATA CODEC
// =========================

/// A message that can be carried as calldata.
pub trait Message: Sized {
    /// Encode as selector followed by borsh arguments.
    fn encode(&self) -> Vec<u8>;

    /// Decode calldata produced by [`Message::encode`].
    fn decode(data: &[u8]) -> Result<Self, CodecError>;
}

/// Compute the selector of a call signature, e.g. `"bid(u64)"`.
pub fn selector(signature: &str) -> Selector {
    let digest = Sha256::digest(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Encode a call with arguments.
pub fn encode_call<T: BorshSerialize>(signature: &str, args: &T) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend_from_slice(&encode_value(args));
    data
}

/// Encode a call without arguments.
pub fn encode_bare_call(signature: &str) -> Vec<u8> {
    selector(signature).to_vec()
}

/// Split calldata into its selector and argument bytes.
pub fn split_selector(data: &[u8]) -> Result<(Selector, &[u8]), CodecError> {
    if data.len() < 4 {
        return Err(CodecError::MissingSelector);
    }
    let (head, args) = data.split_at(4);
    Ok(([head[0], head[1], head[2], head[3]], args))
}

/// Decode borsh arguments; trailing bytes are rejected.
pub fn decode_args<T: BorshDeserialize>(args: &[u8]) -> Result<T, CodecError> {
    borsh::from_slice(args).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Check that a bare call carries no argument bytes.
pub fn expect_no_args(args: &[u8]) -> Result<(), CodecError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CodecError::Malformed(format!(
            "{} unexpected argument bytes",
            args.len()
        )))
    }
}

/// Encode a return value.
pub fn encode_value<T: BorshSerialize>(value: &T) -> Vec<u8> {
    // Writing into a Vec has no failure path.
    borsh::to_vec(value).expect("in-memory borsh encoding")
}

/// Decode a return value.
pub fn decode_value<T: BorshDeserialize>(data: &[u8]) -> Result<T, CodecError> {
    decode_args(data)
}
