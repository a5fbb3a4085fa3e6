//! Reference Dutch auction.
//!
//! Sellers hand their asset to the auction and list it with a price that
//! moves linearly from a start price to an end price over a duration. A bid
//! at or above the current price buys the asset: the seller is paid the
//! price, the asset goes to the bidder and any excess is sent back to the
//! bidder.

use relay_types::{
    encode_value, Address, Amount, AssetId, AuctionCall, AuctionRecord, Message, RegistryCall,
    Revert,
};
use std::collections::HashMap;
use tracing::debug;

use crate::world::World;

/// A live listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub seller: Address,
    pub start_price: Amount,
    pub end_price: Amount,
    /// Seconds from `started_at` until the price settles at `end_price`
    pub duration: u64,
    pub started_at: u64,
}

impl Listing {
    /// Price at time `now`.
    pub fn current_price(&self, now: u64) -> Amount {
        let elapsed = now.saturating_sub(self.started_at);
        if elapsed >= self.duration {
            return self.end_price;
        }
        let start = self.start_price as i128;
        let end = self.end_price as i128;
        let price = start + (end - start) * elapsed as i128 / self.duration as i128;
        price as Amount
    }
}

/// Auction state.
#[derive(Clone, Debug, Default)]
pub struct AuctionHouse {
    listings: HashMap<AssetId, Listing>,
    /// Largest excess over the price a bid may carry; `None` accepts any
    overpayment_tolerance: Option<Amount>,
}

impl AuctionHouse {
    pub fn listing(&self, asset_id: AssetId) -> Option<&Listing> {
        self.listings.get(&asset_id)
    }

    pub fn set_overpayment_tolerance(&mut self, tolerance: Option<Amount>) {
        self.overpayment_tolerance = tolerance;
    }

    fn live_listing(&self, asset_id: AssetId) -> Result<&Listing, Revert> {
        self.listings
            .get(&asset_id)
            .ok_or_else(|| Revert::new("asset is not on auction"))
    }
}

/// Execute a call from `sender` against the auction at `world`'s auction
/// address. `value` has already been credited to the auction.
pub(crate) fn execute(
    world: &mut World,
    sender: Address,
    value: Amount,
    data: &[u8],
) -> Result<Vec<u8>, Revert> {
    let call = AuctionCall::decode(data).map_err(|e| Revert::new(e.to_string()))?;
    if value != 0 && !matches!(call, AuctionCall::Bid { .. }) {
        return Err(Revert::new("function is not payable"));
    }
    let now = world.state.timestamp;

    match call {
        AuctionCall::CreateAuction {
            asset_id,
            start_price,
            end_price,
            duration,
        } => {
            if duration == 0 {
                return Err(Revert::new("duration must be positive"));
            }
            if world.state.registry.owner_of(asset_id) != Some(world.state.auction_address) {
                return Err(Revert::new("auction does not hold the asset"));
            }
            if world.state.auction.listings.contains_key(&asset_id) {
                return Err(Revert::new("asset already listed"));
            }
            world.state.auction.listings.insert(
                asset_id,
                Listing {
                    seller: sender,
                    start_price,
                    end_price,
                    duration,
                    started_at: now,
                },
            );
            Ok(Vec::new())
        }

        AuctionCall::CancelAuction { asset_id } => {
            let listing = world.state.auction.live_listing(asset_id)?;
            if listing.seller != sender {
                return Err(Revert::new("only the seller can cancel"));
            }
            world.state.auction.listings.remove(&asset_id);
            hand_over(world, sender, asset_id)?;
            Ok(Vec::new())
        }

        AuctionCall::GetAuction { asset_id } => {
            let listing = world.state.auction.live_listing(asset_id)?;
            Ok(encode_value(&AuctionRecord {
                seller: listing.seller,
                current_price: listing.current_price(now),
            }))
        }

        AuctionCall::GetCurrentPrice { asset_id } => {
            let listing = world.state.auction.live_listing(asset_id)?;
            Ok(encode_value(&listing.current_price(now)))
        }

        AuctionCall::Bid { asset_id } => {
            let listing = world.state.auction.live_listing(asset_id)?;
            let price = listing.current_price(now);
            let seller = listing.seller;
            if value < price {
                return Err(Revert::new("bid below current price"));
            }
            let excess = value - price;
            if let Some(tolerance) = world.state.auction.overpayment_tolerance {
                if excess > tolerance {
                    return Err(Revert::new("overpayment above tolerance"));
                }
            }

            world.state.auction.listings.remove(&asset_id);
            hand_over(world, sender, asset_id)?;

            let auction = world.state.auction_address;
            world.message_call(auction, seller, price, &[])?;
            if excess > 0 {
                world.message_call(auction, sender, excess, &[])?;
            }
            debug!(asset_id, price, excess, "Auction sold");
            Ok(Vec::new())
        }
    }
}

/// Move an asset held by the auction to `to` through the registry.
fn hand_over(world: &mut World, to: Address, asset_id: AssetId) -> Result<(), Revert> {
    let auction = world.state.auction_address;
    let registry = world.state.registry_address;
    let data = RegistryCall::Transfer { to, asset_id }.encode();
    world.message_call(auction, registry, 0, &data)?;
    Ok(())
}
