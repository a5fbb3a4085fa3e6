//! Events emitted by the relay.

use relay_types::{Address, Amount, AssetId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayEvent {
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },

    Paused { by: Address },

    Unpaused { by: Address },

    /// A bid went through and the asset reached the bidder.
    BidRelayed {
        bidder: Address,
        asset_id: AssetId,
        paid: Amount,
        refunded: Amount,
    },

    AssetRescued {
        asset_id: AssetId,
        recipient: Address,
    },

    /// Owner escape-hatch call.
    Executed { target: Address, value: Amount },
}
