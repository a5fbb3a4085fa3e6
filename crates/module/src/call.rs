//! Call message types for the relay module.

use relay_types::{
    decode_args, encode_bare_call, encode_call, expect_no_args, selector, split_selector, Address,
    Amount, AssetId, CodecError, Message,
};

pub const BID: &str = "bid(u64)";
pub const BID_WITH_SPECIFIC_WARMUPS: &str = "bidWithSpecificWarmups(u64,address[])";
pub const RESCUE_LOST_ASSET: &str = "rescueLostAsset(u64,address)";
pub const CALL: &str = "call(address,u64,bytes)";
pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(address)";
pub const PAUSE: &str = "pause()";
pub const UNPAUSE: &str = "unpause()";
pub const OWNER: &str = "owner()";
pub const PAUSED: &str = "paused()";

/// Call messages for the relay module.
///
/// A transaction with empty calldata is a plain value transfer and never
/// decodes to one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayCall {
    // === Bidding ===
    /// Payable. Bid with the default warmup list.
    Bid { asset_id: AssetId },

    /// Payable. Bid with an explicit warmup list.
    BidWithSpecificWarmups {
        asset_id: AssetId,
        warmups: Vec<Address>,
    },

    // === Recovery (owner only) ===
    /// Move an asset the relay holds by mistake.
    RescueLostAsset {
        asset_id: AssetId,
        recipient: Address,
    },

    /// Payable. Arbitrary outbound call; returns the raw response.
    Call {
        target: Address,
        value: Amount,
        data: Vec<u8>,
    },

    // === Admin ===
    TransferOwnership { new_owner: Address },

    Pause,

    Unpause,

    // === Views ===
    Owner,

    Paused,
}

impl Message for RelayCall {
    fn encode(&self) -> Vec<u8> {
        match self {
            Self::Bid { asset_id } => encode_call(BID, asset_id),
            Self::BidWithSpecificWarmups { asset_id, warmups } => {
                encode_call(BID_WITH_SPECIFIC_WARMUPS, &(*asset_id, warmups.clone()))
            }
            Self::RescueLostAsset {
                asset_id,
                recipient,
            } => encode_call(RESCUE_LOST_ASSET, &(*asset_id, *recipient)),
            Self::Call {
                target,
                value,
                data,
            } => encode_call(CALL, &(*target, *value, data.clone())),
            Self::TransferOwnership { new_owner } => encode_call(TRANSFER_OWNERSHIP, new_owner),
            Self::Pause => encode_bare_call(PAUSE),
            Self::Unpause => encode_bare_call(UNPAUSE),
            Self::Owner => encode_bare_call(OWNER),
            Self::Paused => encode_bare_call(PAUSED),
        }
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let (sel, args) = split_selector(data)?;
        let call = if sel == selector(BID) {
            Self::Bid {
                asset_id: decode_args(args)?,
            }
        } else if sel == selector(BID_WITH_SPECIFIC_WARMUPS) {
            let (asset_id, warmups) = decode_args(args)?;
            Self::BidWithSpecificWarmups { asset_id, warmups }
        } else if sel == selector(RESCUE_LOST_ASSET) {
            let (asset_id, recipient) = decode_args(args)?;
            Self::RescueLostAsset {
                asset_id,
                recipient,
            }
        } else if sel == selector(CALL) {
            let (target, value, data) = decode_args(args)?;
            Self::Call {
                target,
                value,
                data,
            }
        } else if sel == selector(TRANSFER_OWNERSHIP) {
            Self::TransferOwnership {
                new_owner: decode_args(args)?,
            }
        } else {
            let bare = if sel == selector(PAUSE) {
                Self::Pause
            } else if sel == selector(UNPAUSE) {
                Self::Unpause
            } else if sel == selector(OWNER) {
                Self::Owner
            } else if sel == selector(PAUSED) {
                Self::Paused
            } else {
                return Err(CodecError::UnknownSelector(sel));
            };
            expect_no_args(args)?;
            bare
        };
        Ok(call)
    }
}
