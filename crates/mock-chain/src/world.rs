//! Simulated world state and the transaction executor.
//!
//! Three contracts live at fixed addresses: the relay, the auction and the
//! registry. Every other address is a plain account that accepts value
//! unless it has been told to reject it. Each call frame runs against a
//! snapshot of the world that is restored if the frame fails, so a failing
//! transaction leaves no trace besides the gas it burnt.

use relay_module::{
    dispatch, handle_query, CallContext, GenesisValidationError, RelayCall, RelayEvent,
    RelayGenesisConfig, RelayHost, RelayQuery, RelayQueryResponse, RelayState,
};
use relay_types::{
    is_zero_address, Address, Amount, AssetId, AuctionCall, Message, RegistryCall, Revert,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::auction::{self, AuctionHouse};
use crate::meter::{Meter, VALUE_TRANSFER};
use crate::registry::Registry;

/// A top-level transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: Amount,
    pub data: Vec<u8>,
}

impl Transaction {
    pub fn new(from: Address, to: Address, value: Amount, data: Vec<u8>) -> Self {
        Self {
            from,
            to,
            value,
            data,
        }
    }
}

/// Outcome of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub success: bool,
    /// Return data of the callee
    pub output: Vec<u8>,
    /// Revert reason on failure
    pub error: Option<String>,
    pub gas_used: u64,
    /// Events emitted by the relay; empty on failure
    pub events: Vec<RelayEvent>,
}

impl Receipt {
    pub fn into_result(self) -> Result<Vec<u8>, Revert> {
        match self.error {
            Some(reason) => Err(Revert::new(reason)),
            None => Ok(self.output),
        }
    }
}

/// Everything a failed frame rolls back.
#[derive(Clone, Debug)]
pub(crate) struct WorldState {
    balances: HashMap<Address, Amount>,
    rejects_value: HashSet<Address>,
    pub(crate) relay_address: Address,
    pub(crate) auction_address: Address,
    pub(crate) registry_address: Address,
    pub(crate) relay: RelayState,
    pub(crate) auction: AuctionHouse,
    pub(crate) registry: Registry,
    pub(crate) block_height: u64,
    pub(crate) timestamp: u64,
    events: Vec<RelayEvent>,
}

pub struct World {
    pub(crate) state: WorldState,
    meter: Meter,
}

impl World {
    /// Deploy the relay at `relay_address` next to a fresh auction and
    /// registry at the addresses named in `genesis`.
    pub fn new(
        genesis: &RelayGenesisConfig,
        relay_address: Address,
    ) -> Result<Self, GenesisValidationError> {
        genesis.validate()?;
        if is_zero_address(&relay_address) {
            return Err(GenesisValidationError::ZeroAddress("relay"));
        }
        if relay_address == genesis.auction || relay_address == genesis.registry {
            return Err(GenesisValidationError::CollaboratorsCollide);
        }

        info!(paused = genesis.start_paused, "Relay deployed");
        Ok(Self {
            state: WorldState {
                balances: HashMap::new(),
                rejects_value: HashSet::new(),
                relay_address,
                auction_address: genesis.auction,
                registry_address: genesis.registry,
                relay: RelayState::from_genesis(genesis),
                auction: AuctionHouse::default(),
                registry: Registry::default(),
                block_height: 0,
                timestamp: 0,
                events: Vec::new(),
            },
            meter: Meter::default(),
        })
    }

    // ============ Transactions ============

    /// Execute a top-level transaction.
    ///
    /// The sender and the target start warm. On failure the world is left
    /// exactly as it was.
    pub fn execute(&mut self, tx: Transaction) -> Receipt {
        self.meter.begin(&[tx.from, tx.to]);
        self.state.events.clear();

        let result = self.frame(tx.from, tx.to, tx.value, &tx.data);
        let gas_used = self.meter.used();
        let events = std::mem::take(&mut self.state.events);

        match result {
            Ok(output) => Receipt {
                success: true,
                output,
                error: None,
                gas_used,
                events,
            },
            Err(revert) => {
                debug!(reason = %revert, gas_used, "Transaction reverted");
                Receipt {
                    success: false,
                    output: Vec::new(),
                    error: Some(revert.reason),
                    gas_used,
                    events: Vec::new(),
                }
            }
        }
    }

    /// Send a relay call as a transaction from `from`.
    pub fn send_relay(&mut self, from: Address, value: Amount, call: &RelayCall) -> Receipt {
        let tx = Transaction::new(from, self.state.relay_address, value, call.encode());
        self.execute(tx)
    }

    /// Nested call made by a contract during a transaction.
    pub(crate) fn message_call(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
        data: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        self.meter.access(&to);
        if value > 0 {
            self.meter.charge(VALUE_TRANSFER);
        }
        self.frame(from, to, value, data)
    }

    /// Move `value`, run the callee and roll the frame back if it fails.
    fn frame(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
        data: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        let snapshot = self.state.clone();
        let result = self.transfer(from, to, value).and_then(|()| self.run(from, to, value, data));
        if result.is_err() {
            self.state = snapshot;
        }
        result
    }

    fn run(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
        data: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        if to == self.state.relay_address {
            let ctx = CallContext {
                sender: from,
                block_height: self.state.block_height,
                timestamp: self.state.timestamp,
                value,
            };
            return dispatch(self, &ctx, data).map_err(|err| Revert::new(err.to_string()));
        }
        if to == self.state.auction_address {
            return auction::execute(self, from, value, data);
        }
        if to == self.state.registry_address {
            return self.state.registry.execute(from, value, data);
        }

        if value > 0 && self.state.rejects_value.contains(&to) {
            return Err(Revert::new("recipient rejects value"));
        }
        Ok(Vec::new())
    }

    fn transfer(&mut self, from: Address, to: Address, value: Amount) -> Result<(), Revert> {
        if value == 0 {
            return Ok(());
        }
        let balance = self.balance(&from);
        let remaining = balance
            .checked_sub(value)
            .ok_or_else(|| Revert::new("insufficient balance"))?;
        self.state.balances.insert(from, remaining);
        self.credit(to, value)?;
        Ok(())
    }

    fn credit(&mut self, address: Address, amount: Amount) -> Result<Amount, Revert> {
        let balance = self
            .balance(&address)
            .checked_add(amount)
            .ok_or_else(|| Revert::new("balance overflow"))?;
        self.state.balances.insert(address, balance);
        Ok(balance)
    }

    // ============ Administration ============

    /// Credit `amount` to `address` out of thin air. Returns the new balance.
    pub fn fund(&mut self, address: Address, amount: Amount) -> Result<Amount, Revert> {
        self.credit(address, amount)
    }

    pub fn mint(&mut self, asset_id: AssetId, owner: Address) -> Result<(), Revert> {
        self.state.registry.mint(asset_id, owner)?;
        info!(asset_id, "Asset minted");
        Ok(())
    }

    /// Hand `asset_id` from `seller` to the auction and list it.
    ///
    /// Runs as two transactions from the seller; if the listing fails the
    /// hand-over is undone too.
    pub fn list_asset(
        &mut self,
        seller: Address,
        asset_id: AssetId,
        start_price: Amount,
        end_price: Amount,
        duration: u64,
    ) -> Result<(), Revert> {
        let snapshot = self.state.clone();
        let auction = self.state.auction_address;
        let registry = self.state.registry_address;

        let handover = RegistryCall::Transfer {
            to: auction,
            asset_id,
        };
        let listing = AuctionCall::CreateAuction {
            asset_id,
            start_price,
            end_price,
            duration,
        };

        let result = self
            .execute(Transaction::new(seller, registry, 0, handover.encode()))
            .into_result()
            .and_then(|_| {
                self.execute(Transaction::new(seller, auction, 0, listing.encode()))
                    .into_result()
            });
        match result {
            Ok(_) => {
                info!(asset_id, start_price, end_price, duration, "Asset listed");
                Ok(())
            }
            Err(revert) => {
                warn!(asset_id, reason = %revert, "Listing failed");
                self.state = snapshot;
                Err(revert)
            }
        }
    }

    /// Make `address` refuse incoming value.
    pub fn set_rejects_value(&mut self, address: Address, rejects: bool) {
        if rejects {
            self.state.rejects_value.insert(address);
        } else {
            self.state.rejects_value.remove(&address);
        }
    }

    pub fn set_registry_faulty(&mut self, faulty: bool) {
        self.state.registry.set_faulty(faulty);
    }

    pub fn set_overpayment_tolerance(&mut self, tolerance: Option<Amount>) {
        self.state.auction.set_overpayment_tolerance(tolerance);
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.state.timestamp = timestamp;
    }

    pub fn advance_block(&mut self) {
        self.state.block_height += 1;
        self.state.timestamp += 12; // ~12 second blocks
    }

    // ============ Inspection ============

    pub fn balance(&self, address: &Address) -> Amount {
        self.state.balances.get(address).copied().unwrap_or(0)
    }

    pub fn owner_of(&self, asset_id: AssetId) -> Option<Address> {
        self.state.registry.owner_of(asset_id)
    }

    /// Current price of a listed asset.
    pub fn current_price(&self, asset_id: AssetId) -> Option<Amount> {
        self.state
            .auction
            .listing(asset_id)
            .map(|listing| listing.current_price(self.state.timestamp))
    }

    pub fn relay(&self) -> &RelayState {
        &self.state.relay
    }

    pub fn query(&self, query: RelayQuery) -> RelayQueryResponse {
        handle_query(&self.state.relay, query)
    }

    pub fn relay_address(&self) -> Address {
        self.state.relay_address
    }

    pub fn auction_address(&self) -> Address {
        self.state.auction_address
    }

    pub fn registry_address(&self) -> Address {
        self.state.registry_address
    }

    pub fn block_height(&self) -> u64 {
        self.state.block_height
    }

    pub fn timestamp(&self) -> u64 {
        self.state.timestamp
    }

    /// Whether `address` has been touched in the last transaction.
    pub fn is_warm(&self, address: &Address) -> bool {
        self.meter.is_warm(address)
    }
}

impl RelayHost for World {
    fn relay_address(&self) -> Address {
        self.state.relay_address
    }

    fn relay_state(&self) -> &RelayState {
        &self.state.relay
    }

    fn relay_state_mut(&mut self) -> &mut RelayState {
        &mut self.state.relay
    }

    fn balance_of(&mut self, address: &Address) -> Amount {
        self.meter.access(address);
        self.balance(address)
    }

    fn warm(&mut self, address: &Address) {
        self.meter.access(address);
    }

    fn call(&mut self, to: Address, value: Amount, data: Vec<u8>) -> Result<Vec<u8>, Revert> {
        let relay = self.state.relay_address;
        self.message_call(relay, to, value, &data)
    }

    fn emit(&mut self, event: RelayEvent) {
        self.state.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::{COLD_ACCOUNT_ACCESS, TX_BASE};
    use relay_module::RelayError;

    const OWNER: Address = [1u8; 32];
    const ALICE: Address = [2u8; 32];
    const SELLER: Address = [3u8; 32];
    const RELAY: Address = [10u8; 32];
    const AUCTION: Address = [11u8; 32];
    const REGISTRY: Address = [12u8; 32];

    fn world() -> World {
        let genesis = RelayGenesisConfig::new(OWNER, AUCTION, REGISTRY);
        World::new(&genesis, RELAY).unwrap()
    }

    #[test]
    fn test_relay_address_must_be_distinct() {
        let genesis = RelayGenesisConfig::new(OWNER, AUCTION, REGISTRY);
        assert!(matches!(
            World::new(&genesis, AUCTION),
            Err(GenesisValidationError::CollaboratorsCollide)
        ));
        assert!(World::new(&genesis, [0u8; 32]).is_err());
    }

    #[test]
    fn test_plain_transfer() {
        let mut world = world();
        world.fund(ALICE, 100).unwrap();

        let receipt = world.execute(Transaction::new(ALICE, SELLER, 40, Vec::new()));
        assert!(receipt.success);
        assert_eq!(receipt.gas_used, TX_BASE);
        assert_eq!(world.balance(&ALICE), 60);
        assert_eq!(world.balance(&SELLER), 40);
    }

    #[test]
    fn test_insufficient_balance_reverts() {
        let mut world = world();
        world.fund(ALICE, 10).unwrap();

        let receipt = world.execute(Transaction::new(ALICE, SELLER, 40, Vec::new()));
        assert!(!receipt.success);
        assert_eq!(receipt.error.as_deref(), Some("insufficient balance"));
        assert_eq!(world.balance(&ALICE), 10);
    }

    #[test]
    fn test_balance_overflow() {
        let mut world = world();
        world.fund(SELLER, Amount::MAX).unwrap();
        world.fund(ALICE, 1).unwrap();

        assert!(world.fund(SELLER, 1).is_err());
        assert_eq!(world.balance(&SELLER), Amount::MAX);

        let receipt = world.execute(Transaction::new(ALICE, SELLER, 1, Vec::new()));
        assert!(!receipt.success);
        assert_eq!(receipt.error.as_deref(), Some("balance overflow"));
        assert_eq!(world.balance(&ALICE), 1);
        assert_eq!(world.balance(&SELLER), Amount::MAX);
    }

    #[test]
    fn test_rejecting_account() {
        let mut world = world();
        world.fund(ALICE, 10).unwrap();
        world.set_rejects_value(SELLER, true);

        let receipt = world.execute(Transaction::new(ALICE, SELLER, 5, Vec::new()));
        assert!(!receipt.success);
        assert_eq!(world.balance(&ALICE), 10);

        // Zero value is still fine.
        assert!(world.execute(Transaction::new(ALICE, SELLER, 0, Vec::new())).success);
    }

    #[test]
    fn test_relay_errors_surface_in_receipt() {
        let mut world = world();
        let receipt = world.send_relay(ALICE, 0, &RelayCall::Pause);
        assert!(!receipt.success);
        assert_eq!(receipt.error, Some(RelayError::Unauthorized.to_string()));
        assert!(!world.relay().access.paused());

        let receipt = world.send_relay(OWNER, 0, &RelayCall::Pause);
        assert!(receipt.success);
        assert_eq!(receipt.events, vec![RelayEvent::Paused { by: OWNER }]);
        assert!(world.relay().access.paused());
    }

    #[test]
    fn test_list_asset() {
        let mut world = world();
        world.mint(7, SELLER).unwrap();
        world.set_timestamp(1_000);
        world.list_asset(SELLER, 7, 500, 100, 100).unwrap();

        assert_eq!(world.owner_of(7), Some(AUCTION));
        assert_eq!(world.current_price(7), Some(500));
        world.set_timestamp(1_050);
        assert_eq!(world.current_price(7), Some(300));
    }

    #[test]
    fn test_failed_listing_returns_asset() {
        let mut world = world();
        world.mint(7, SELLER).unwrap();

        assert!(world.list_asset(SELLER, 7, 500, 100, 0).is_err());
        assert_eq!(world.owner_of(7), Some(SELLER));
        assert_eq!(world.current_price(7), None);
    }

    #[test]
    fn test_direct_bid_pays_seller_and_refunds_excess() {
        let mut world = world();
        world.mint(7, SELLER).unwrap();
        world.list_asset(SELLER, 7, 500, 500, 100).unwrap();
        world.fund(ALICE, 1_000).unwrap();

        let bid = AuctionCall::Bid { asset_id: 7 }.encode();
        let receipt = world.execute(Transaction::new(ALICE, AUCTION, 520, bid));
        assert!(receipt.success, "{:?}", receipt.error);

        assert_eq!(world.owner_of(7), Some(ALICE));
        assert_eq!(world.balance(&ALICE), 500);
        assert_eq!(world.balance(&SELLER), 500);
        assert_eq!(world.balance(&AUCTION), 0);
        assert_eq!(world.current_price(7), None);
    }

    #[test]
    fn test_cancel_returns_asset_to_seller() {
        let mut world = world();
        world.mint(7, SELLER).unwrap();
        world.list_asset(SELLER, 7, 500, 100, 100).unwrap();

        let cancel = AuctionCall::CancelAuction { asset_id: 7 }.encode();
        assert!(!world
            .execute(Transaction::new(ALICE, AUCTION, 0, cancel.clone()))
            .success);
        assert!(world
            .execute(Transaction::new(SELLER, AUCTION, 0, cancel))
            .success);
        assert_eq!(world.owner_of(7), Some(SELLER));
    }

    #[test]
    fn test_nested_access_is_metered() {
        let mut world = world();
        world.mint(7, SELLER).unwrap();
        world.list_asset(SELLER, 7, 500, 500, 100).unwrap();

        // Relay view call into the auction: relay starts warm, auction cold.
        let receipt = world.send_relay(ALICE, 0, &RelayCall::Owner);
        assert_eq!(receipt.gas_used, TX_BASE);

        let price = AuctionCall::GetCurrentPrice { asset_id: 7 }.encode();
        let receipt = world.send_relay(
            OWNER,
            0,
            &RelayCall::Call {
                target: AUCTION,
                value: 0,
                data: price,
            },
        );
        assert!(receipt.success);
        assert_eq!(receipt.gas_used, TX_BASE + COLD_ACCOUNT_ACCESS);
        assert!(world.is_warm(&AUCTION));
    }
}
