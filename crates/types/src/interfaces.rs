//! Interfaces of the external collaborators the relay consumes.
//!
//! The relay never implements these; it only encodes calls to them and
//! decodes their return data.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    decode_args, encode_call, split_selector, selector, Address, Amount, AssetId, CodecError,
    Message,
};

/// Read-only view of an auction listing.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct AuctionRecord {
    pub seller: Address,
    pub current_price: Amount,
}

// =========================
// AUCTION
// =========================

pub const AUCTION_CREATE: &str = "createAuction(u64,u64,u64,u64)";
pub const AUCTION_CANCEL: &str = "cancelAuction(u64)";
pub const AUCTION_GET: &str = "getAuction(u64)";
pub const AUCTION_CURRENT_PRICE: &str = "getCurrentPrice(u64)";
pub const AUCTION_BID: &str = "bid(u64)";

/// Calls understood by the external auction service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuctionCall {
    /// List an asset the auction already holds (seller only).
    CreateAuction {
        asset_id: AssetId,
        start_price: Amount,
        end_price: Amount,
        duration: u64,
    },

    /// Withdraw a listing and return the asset to its seller.
    CancelAuction { asset_id: AssetId },

    /// Returns an [`AuctionRecord`].
    GetAuction { asset_id: AssetId },

    /// Returns the current price as an [`Amount`].
    GetCurrentPrice { asset_id: AssetId },

    /// Payable. Buys the asset for the sender at the current price.
    Bid { asset_id: AssetId },
}

impl Message for AuctionCall {
    fn encode(&self) -> Vec<u8> {
        match self {
            Self::CreateAuction {
                asset_id,
                start_price,
                end_price,
                duration,
            } => encode_call(
                AUCTION_CREATE,
                &(*asset_id, *start_price, *end_price, *duration),
            ),
            Self::CancelAuction { asset_id } => encode_call(AUCTION_CANCEL, asset_id),
            Self::GetAuction { asset_id } => encode_call(AUCTION_GET, asset_id),
            Self::GetCurrentPrice { asset_id } => encode_call(AUCTION_CURRENT_PRICE, asset_id),
            Self::Bid { asset_id } => encode_call(AUCTION_BID, asset_id),
        }
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let (sel, args) = split_selector(data)?;
        if sel == selector(AUCTION_BID) {
            Ok(Self::Bid {
                asset_id: decode_args(args)?,
            })
        } else if sel == selector(AUCTION_CURRENT_PRICE) {
            Ok(Self::GetCurrentPrice {
                asset_id: decode_args(args)?,
            })
        } else if sel == selector(AUCTION_GET) {
            Ok(Self::GetAuction {
                asset_id: decode_args(args)?,
            })
        } else if sel == selector(AUCTION_CREATE) {
            let (asset_id, start_price, end_price, duration) = decode_args(args)?;
            Ok(Self::CreateAuction {
                asset_id,
                start_price,
                end_price,
                duration,
            })
        } else if sel == selector(AUCTION_CANCEL) {
            Ok(Self::CancelAuction {
                asset_id: decode_args(args)?,
            })
        } else {
            Err(CodecError::UnknownSelector(sel))
        }
    }
}

// =========================
// REGISTRY
// =========================

pub const REGISTRY_OWNER_OF: &str = "ownerOf(u64)";
pub const REGISTRY_TRANSFER: &str = "transfer(address,u64)";

/// Calls understood by the external asset registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryCall {
    /// Returns the owner [`Address`].
    OwnerOf { asset_id: AssetId },

    /// Move an asset owned by the sender to `to`.
    Transfer { to: Address, asset_id: AssetId },
}

impl Message for RegistryCall {
    fn encode(&self) -> Vec<u8> {
        match self {
            Self::OwnerOf { asset_id } => encode_call(REGISTRY_OWNER_OF, asset_id),
            Self::Transfer { to, asset_id } => encode_call(REGISTRY_TRANSFER, &(*to, *asset_id)),
        }
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let (sel, args) = split_selector(data)?;
        if sel == selector(REGISTRY_OWNER_OF) {
            Ok(Self::OwnerOf {
                asset_id: decode_args(args)?,
            })
        } else if sel == selector(REGISTRY_TRANSFER) {
            let (to, asset_id) = decode_args(args)?;
            Ok(Self::Transfer { to, asset_id })
        } else {
            Err(CodecError::UnknownSelector(sel))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auction_call_decode() {
        let call = AuctionCall::CreateAuction {
            asset_id: 42,
            start_price: 1_000,
            end_price: 100,
            duration: 3600,
        };
        assert_eq!(AuctionCall::decode(&call.encode()).unwrap(), call);
    }

    #[test]
    fn test_registry_rejects_auction_selector() {
        let data = AuctionCall::Bid { asset_id: 1 }.encode();
        assert!(matches!(
            RegistryCall::decode(&data),
            Err(CodecError::UnknownSelector(_))
        ));
    }

    #[test]
    fn test_truncated_arguments() {
        let mut data = RegistryCall::Transfer {
            to: [9u8; 32],
            asset_id: 5,
        }
        .encode();
        data.truncate(data.len() - 3);
        assert!(matches!(
            RegistryCall::decode(&data),
            Err(CodecError::Malformed(_))
        ));
    }
}
