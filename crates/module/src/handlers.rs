//! Call handlers for the relay module.
//!
//! These functions implement the business logic for each call type. Every
//! state-changing handler checks access first, then takes the execution lock
//! for the rest of its body, so a nested call arriving through a collaborator
//! cannot observe or disturb a half-finished operation.

use relay_types::{
    decode_value, encode_value, is_zero_address, Address, Amount, AssetId, AuctionCall,
    AuctionRecord, Message, RegistryCall,
};
use tracing::{debug, info};

use crate::call::RelayCall;
use crate::error::RelayError;
use crate::event::RelayEvent;
use crate::host::RelayHost;
use crate::state::Operation;

/// Context provided by the runtime for each call.
#[derive(Clone, Debug)]
pub struct CallContext {
    /// Immediate caller
    pub sender: Address,
    /// Current block height
    pub block_height: u64,
    /// Current timestamp
    pub timestamp: u64,
    /// Value attached to the call, already credited to the relay
    pub value: Amount,
}

/// Result type for handlers.
pub type HandlerResult<T> = Result<T, RelayError>;

/// Decode calldata and route it to the matching handler.
///
/// Empty calldata is a plain value transfer. Return data is borsh-encoded,
/// except for [`RelayCall::Call`] which returns the callee's bytes as-is.
pub fn dispatch<H: RelayHost + ?Sized>(
    host: &mut H,
    ctx: &CallContext,
    data: &[u8],
) -> HandlerResult<Vec<u8>> {
    if data.is_empty() {
        handle_receive(host, ctx)?;
        return Ok(Vec::new());
    }

    let call = RelayCall::decode(data).map_err(|err| {
        debug!(error = %err, "Rejecting calldata");
        RelayError::from(err)
    })?;

    match call {
        RelayCall::Bid { asset_id } => handle_bid(host, ctx, asset_id).map(|()| Vec::new()),
        RelayCall::BidWithSpecificWarmups { asset_id, warmups } => {
            handle_bid_with_specific_warmups(host, ctx, asset_id, &warmups).map(|()| Vec::new())
        }
        RelayCall::RescueLostAsset {
            asset_id,
            recipient,
        } => handle_rescue_lost_asset(host, ctx, asset_id, recipient).map(|()| Vec::new()),
        RelayCall::Call {
            target,
            value,
            data,
        } => handle_call(host, ctx, target, value, data),
        RelayCall::TransferOwnership { new_owner } => {
            handle_transfer_ownership(host, ctx, new_owner).map(|()| Vec::new())
        }
        RelayCall::Pause => handle_pause(host, ctx).map(|()| Vec::new()),
        RelayCall::Unpause => handle_unpause(host, ctx).map(|()| Vec::new()),
        RelayCall::Owner => {
            reject_value(ctx)?;
            Ok(encode_value(&host.relay_state().access.owner()))
        }
        RelayCall::Paused => {
            reject_value(ctx)?;
            Ok(encode_value(&host.relay_state().access.paused()))
        }
    }
}

/// Handle a plain value transfer.
///
/// Zero value is always a no-op success. Non-zero value is only accepted
/// from the auction while a bid is in flight, i.e. change being returned
/// from the bid the relay placed.
pub fn handle_receive<H: RelayHost + ?Sized>(host: &mut H, ctx: &CallContext) -> HandlerResult<()> {
    let state = host.relay_state();
    state.access.require_not_paused()?;

    if ctx.value == 0 {
        return Ok(());
    }
    if ctx.sender == state.auction && state.lock.holder() == Some(Operation::Bid) {
        debug!(value = ctx.value, "Accepted change from auction");
        return Ok(());
    }
    Err(RelayError::UnsolicitedValueRejected)
}

/// Handle Bid call: bid with the default warmup list.
///
/// The defaults are the auction, the registry and the listing's seller. If
/// the listing cannot be read the seller is left out.
pub fn handle_bid<H: RelayHost + ?Sized>(
    host: &mut H,
    ctx: &CallContext,
    asset_id: AssetId,
) -> HandlerResult<()> {
    execute_bid(host, ctx, asset_id, None)
}

/// Handle BidWithSpecificWarmups call.
pub fn handle_bid_with_specific_warmups<H: RelayHost + ?Sized>(
    host: &mut H,
    ctx: &CallContext,
    asset_id: AssetId,
    warmups: &[Address],
) -> HandlerResult<()> {
    execute_bid(host, ctx, asset_id, Some(warmups))
}

fn execute_bid<H: RelayHost + ?Sized>(
    host: &mut H,
    ctx: &CallContext,
    asset_id: AssetId,
    warmups: Option<&[Address]>,
) -> HandlerResult<()> {
    host.relay_state().access.require_not_paused()?;

    non_reentrant(host, Operation::Bid, |host| {
        let relay = host.relay_address();
        let auction = host.relay_state().auction;
        let registry = host.relay_state().registry;

        // Balance excluding the value that came with this call.
        let balance_before = host
            .balance_of(&relay)
            .checked_sub(ctx.value)
            .ok_or(RelayError::BalanceUnderflow)?;

        match warmups {
            Some(targets) => prime(host, targets),
            None => {
                let targets = default_warmups(host, auction, registry, asset_id);
                prime(host, &targets);
            }
        }

        host.call(auction, ctx.value, AuctionCall::Bid { asset_id }.encode())
            .map_err(|revert| RelayError::ExternalCallFailed(revert.reason))?;

        host.call(
            registry,
            0,
            RegistryCall::Transfer {
                to: ctx.sender,
                asset_id,
            }
            .encode(),
        )
        .map_err(|revert| RelayError::AssetTransferFailed(revert.reason))?;

        let owner = owner_of(host, registry, asset_id)?;
        if owner != ctx.sender {
            return Err(RelayError::OwnershipVerificationFailed {
                expected: ctx.sender,
                actual: owner,
            });
        }

        let change = host
            .balance_of(&relay)
            .checked_sub(balance_before)
            .ok_or(RelayError::BalanceUnderflow)?;
        if change > 0 {
            host.call(ctx.sender, change, Vec::new())
                .map_err(|revert| RelayError::RefundFailed(revert.reason))?;
        }
        if host.balance_of(&relay) != balance_before {
            return Err(RelayError::RefundFailed(
                "relay balance not restored".to_string(),
            ));
        }

        let paid = ctx.value.saturating_sub(change);
        info!(asset_id, paid, refunded = change, "Bid relayed");
        host.emit(RelayEvent::BidRelayed {
            bidder: ctx.sender,
            asset_id,
            paid,
            refunded: change,
        });
        Ok(())
    })
}

/// Handle RescueLostAsset call.
pub fn handle_rescue_lost_asset<H: RelayHost + ?Sized>(
    host: &mut H,
    ctx: &CallContext,
    asset_id: AssetId,
    recipient: Address,
) -> HandlerResult<()> {
    reject_value(ctx)?;
    let access = &host.relay_state().access;
    access.require_owner(&ctx.sender)?;
    access.require_not_paused()?;

    non_reentrant(host, Operation::Rescue, |host| {
        let registry = host.relay_state().registry;
        host.call(
            registry,
            0,
            RegistryCall::Transfer {
                to: recipient,
                asset_id,
            }
            .encode(),
        )
        .map_err(|revert| RelayError::AssetTransferFailed(revert.reason))?;

        info!(asset_id, "Rescued asset held by the relay");
        host.emit(RelayEvent::AssetRescued {
            asset_id,
            recipient,
        });
        Ok(())
    })
}

/// Handle Call: owner-only arbitrary outbound call.
///
/// Forwards `value` and `data` to `target` and returns the raw response.
pub fn handle_call<H: RelayHost + ?Sized>(
    host: &mut H,
    ctx: &CallContext,
    target: Address,
    value: Amount,
    data: Vec<u8>,
) -> HandlerResult<Vec<u8>> {
    let access = &host.relay_state().access;
    access.require_owner(&ctx.sender)?;
    access.require_not_paused()?;
    if is_zero_address(&target) {
        return Err(RelayError::InvalidTarget);
    }

    non_reentrant(host, Operation::Call, |host| {
        let response = host
            .call(target, value, data)
            .map_err(|revert| RelayError::ExternalCallFailed(revert.reason))?;

        info!(value, response_len = response.len(), "Owner call executed");
        host.emit(RelayEvent::Executed { target, value });
        Ok(response)
    })
}

/// Handle TransferOwnership call. Available while paused.
pub fn handle_transfer_ownership<H: RelayHost + ?Sized>(
    host: &mut H,
    ctx: &CallContext,
    new_owner: Address,
) -> HandlerResult<()> {
    reject_value(ctx)?;
    host.relay_state().access.require_owner(&ctx.sender)?;

    non_reentrant(host, Operation::Admin, |host| {
        let previous_owner = host
            .relay_state_mut()
            .access
            .transfer_ownership(&ctx.sender, new_owner)?;

        info!("Ownership transferred");
        host.emit(RelayEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    })
}

/// Handle Pause call. Pausing twice is an error.
pub fn handle_pause<H: RelayHost + ?Sized>(host: &mut H, ctx: &CallContext) -> HandlerResult<()> {
    reject_value(ctx)?;
    host.relay_state().access.require_owner(&ctx.sender)?;

    non_reentrant(host, Operation::Admin, |host| {
        host.relay_state_mut().access.pause(&ctx.sender)?;
        info!("Relay paused");
        host.emit(RelayEvent::Paused { by: ctx.sender });
        Ok(())
    })
}

/// Handle Unpause call. Unpausing a running relay is an error.
pub fn handle_unpause<H: RelayHost + ?Sized>(host: &mut H, ctx: &CallContext) -> HandlerResult<()> {
    reject_value(ctx)?;
    host.relay_state().access.require_owner(&ctx.sender)?;

    non_reentrant(host, Operation::Admin, |host| {
        host.relay_state_mut().access.unpause(&ctx.sender)?;
        info!("Relay unpaused");
        host.emit(RelayEvent::Unpaused { by: ctx.sender });
        Ok(())
    })
}

/// Run `body` holding the execution lock. The lock is released on every
/// exit path.
fn non_reentrant<H, T, F>(host: &mut H, operation: Operation, body: F) -> HandlerResult<T>
where
    H: RelayHost + ?Sized,
    F: FnOnce(&mut H) -> HandlerResult<T>,
{
    host.relay_state_mut().lock.enter(operation)?;
    let result = body(host);
    host.relay_state_mut().lock.exit();
    result
}

/// Non-payable entry points refuse value so none is stranded in the relay.
fn reject_value(ctx: &CallContext) -> HandlerResult<()> {
    if ctx.value != 0 {
        return Err(RelayError::UnsolicitedValueRejected);
    }
    Ok(())
}

/// Touch each target. Duplicates, zero and unrelated addresses are fine.
fn prime<H: RelayHost + ?Sized>(host: &mut H, targets: &[Address]) {
    debug!(count = targets.len(), "Priming warmup targets");
    for target in targets {
        host.warm(target);
    }
}

fn default_warmups<H: RelayHost + ?Sized>(
    host: &mut H,
    auction: Address,
    registry: Address,
    asset_id: AssetId,
) -> Vec<Address> {
    let mut targets = vec![auction, registry];
    let record = host
        .call(auction, 0, AuctionCall::GetAuction { asset_id }.encode())
        .ok()
        .and_then(|data| decode_value::<AuctionRecord>(&data).ok());
    match record {
        Some(record) => targets.push(record.seller),
        None => debug!(asset_id, "Listing unreadable, seller not primed"),
    }
    targets
}

fn owner_of<H: RelayHost + ?Sized>(
    host: &mut H,
    registry: Address,
    asset_id: AssetId,
) -> HandlerResult<Address> {
    let data = host
        .call(registry, 0, RegistryCall::OwnerOf { asset_id }.encode())
        .map_err(|revert| RelayError::ExternalCallFailed(revert.reason))?;
    decode_value(&data)
        .map_err(|err| RelayError::ExternalCallFailed(format!("ownerOf returned {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::RelayState;
    use relay_types::{encode_bare_call, Revert, ZERO_ADDRESS};
    use std::collections::{HashMap, HashSet};

    const OWNER: Address = [1u8; 32];
    const BIDDER: Address = [2u8; 32];
    const SELLER: Address = [3u8; 32];
    const STRANGER: Address = [4u8; 32];
    const RELAY: Address = [10u8; 32];
    const AUCTION: Address = [11u8; 32];
    const REGISTRY: Address = [12u8; 32];

    const ASSET: AssetId = 42;
    const PRICE: Amount = 1_000;

    /// Scripted environment: a fixed-price auction for one asset and a
    /// registry, with switches for misbehaving collaborators.
    struct FakeHost {
        state: RelayState,
        balances: HashMap<Address, Amount>,
        owners: HashMap<AssetId, Address>,
        listed: bool,
        warmed: Vec<Address>,
        events: Vec<RelayEvent>,
        outbound: Vec<(Address, Amount, Vec<u8>)>,
        rejects_value: HashSet<Address>,
        registry_lies: bool,
        /// Acknowledge value sent to plain accounts without moving it
        swallows_value: bool,
        reenter_with: Option<Vec<u8>>,
    }

    impl FakeHost {
        fn new() -> Self {
            let mut owners = HashMap::new();
            owners.insert(ASSET, AUCTION);
            Self {
                state: RelayState::new(OWNER, AUCTION, REGISTRY),
                balances: HashMap::new(),
                owners,
                listed: true,
                warmed: Vec::new(),
                events: Vec::new(),
                outbound: Vec::new(),
                rejects_value: HashSet::new(),
                registry_lies: false,
                swallows_value: false,
                reenter_with: None,
            }
        }

        fn balance(&self, address: &Address) -> Amount {
            self.balances.get(address).copied().unwrap_or(0)
        }

        fn fund(&mut self, address: Address, amount: Amount) {
            *self.balances.entry(address).or_insert(0) += amount;
        }

        fn move_value(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), Revert> {
            let from_balance = self.balance(&from);
            if from_balance < amount {
                return Err(Revert::new("insufficient balance"));
            }
            self.balances.insert(from, from_balance - amount);
            self.fund(to, amount);
            Ok(())
        }

        /// Caller sends `value` with the call; the relay is credited first.
        fn send(&mut self, sender: Address, value: Amount, data: &[u8]) -> HandlerResult<Vec<u8>> {
            self.move_value(sender, RELAY, value)
                .map_err(|r| RelayError::ExternalCallFailed(r.reason))?;
            let ctx = ctx(sender, value);
            dispatch(self, &ctx, data)
        }

        fn run_auction(&mut self, value: Amount, data: &[u8]) -> Result<Vec<u8>, Revert> {
            match AuctionCall::decode(data).map_err(|e| Revert::new(e.to_string()))? {
                AuctionCall::GetAuction { .. } if self.listed => Ok(encode_value(&AuctionRecord {
                    seller: SELLER,
                    current_price: PRICE,
                })),
                AuctionCall::Bid { asset_id } if self.listed => {
                    if value < PRICE {
                        return Err(Revert::new("bid below current price"));
                    }
                    if let Some(data) = self.reenter_with.take() {
                        let ctx = ctx(AUCTION, 0);
                        dispatch(self, &ctx, &data).map_err(|e| Revert::new(e.to_string()))?;
                    }
                    self.listed = false;
                    self.move_value(AUCTION, SELLER, PRICE)?;
                    self.owners.insert(asset_id, RELAY);
                    let change = value - PRICE;
                    if change > 0 {
                        self.move_value(AUCTION, RELAY, change)?;
                        let ctx = ctx(AUCTION, change);
                        handle_receive(self, &ctx).map_err(|e| Revert::new(e.to_string()))?;
                    }
                    Ok(Vec::new())
                }
                _ => Err(Revert::new("no such listing")),
            }
        }

        fn run_registry(&mut self, data: &[u8]) -> Result<Vec<u8>, Revert> {
            match RegistryCall::decode(data).map_err(|e| Revert::new(e.to_string()))? {
                RegistryCall::OwnerOf { asset_id } => self
                    .owners
                    .get(&asset_id)
                    .map(encode_value)
                    .ok_or_else(|| Revert::new("unknown asset")),
                RegistryCall::Transfer { to, asset_id } => {
                    if self.owners.get(&asset_id) != Some(&RELAY) {
                        return Err(Revert::new("sender does not own asset"));
                    }
                    if !self.registry_lies {
                        self.owners.insert(asset_id, to);
                    }
                    Ok(Vec::new())
                }
            }
        }
    }

    impl RelayHost for FakeHost {
        fn relay_address(&self) -> Address {
            RELAY
        }

        fn relay_state(&self) -> &RelayState {
            &self.state
        }

        fn relay_state_mut(&mut self) -> &mut RelayState {
            &mut self.state
        }

        fn balance_of(&mut self, address: &Address) -> Amount {
            self.balance(address)
        }

        fn warm(&mut self, address: &Address) {
            self.warmed.push(*address);
        }

        fn call(&mut self, to: Address, value: Amount, data: Vec<u8>) -> Result<Vec<u8>, Revert> {
            self.outbound.push((to, value, data.clone()));
            if self.rejects_value.contains(&to) && value > 0 {
                return Err(Revert::new("value not accepted"));
            }
            if self.swallows_value && to != AUCTION && to != REGISTRY {
                return Ok(Vec::new());
            }
            self.move_value(RELAY, to, value)?;
            match to {
                AUCTION => self.run_auction(value, &data),
                REGISTRY => self.run_registry(&data),
                _ => Ok(b"pong".to_vec()),
            }
        }

        fn emit(&mut self, event: RelayEvent) {
            self.events.push(event);
        }
    }

    fn ctx(sender: Address, value: Amount) -> CallContext {
        CallContext {
            sender,
            block_height: 100,
            timestamp: 1000,
            value,
        }
    }

    fn bid_call(warmups: Vec<Address>) -> Vec<u8> {
        RelayCall::BidWithSpecificWarmups {
            asset_id: ASSET,
            warmups,
        }
        .encode()
    }

    #[test]
    fn test_bid_exact_price() {
        let mut host = FakeHost::new();
        host.fund(BIDDER, PRICE);

        host.send(BIDDER, PRICE, &bid_call(vec![])).unwrap();

        assert_eq!(host.owners[&ASSET], BIDDER);
        assert_eq!(host.balance(&BIDDER), 0);
        assert_eq!(host.balance(&SELLER), PRICE);
        assert_eq!(host.balance(&RELAY), 0);
        assert!(host.warmed.is_empty());
        assert!(!host.state.lock.is_held());
        assert_eq!(
            host.events,
            vec![RelayEvent::BidRelayed {
                bidder: BIDDER,
                asset_id: ASSET,
                paid: PRICE,
                refunded: 0,
            }]
        );
    }

    #[test]
    fn test_bid_overpayment_is_refunded() {
        let mut host = FakeHost::new();
        host.fund(BIDDER, PRICE + 250);

        host.send(BIDDER, PRICE + 250, &bid_call(vec![])).unwrap();

        assert_eq!(host.owners[&ASSET], BIDDER);
        assert_eq!(host.balance(&BIDDER), 250);
        assert_eq!(host.balance(&RELAY), 0);
    }

    #[test]
    fn test_bid_default_warmups() {
        let mut host = FakeHost::new();
        host.fund(BIDDER, PRICE);

        host.send(BIDDER, PRICE, &RelayCall::Bid { asset_id: ASSET }.encode())
            .unwrap();

        assert_eq!(host.warmed, vec![AUCTION, REGISTRY, SELLER]);
        assert_eq!(host.owners[&ASSET], BIDDER);
    }

    #[test]
    fn test_bid_with_odd_warmups() {
        let mut host = FakeHost::new();
        host.fund(BIDDER, PRICE + 1);

        let warmups = vec![ZERO_ADDRESS, STRANGER, STRANGER, AUCTION];
        host.send(BIDDER, PRICE + 1, &bid_call(warmups.clone()))
            .unwrap();

        assert_eq!(host.warmed, warmups);
        assert_eq!(host.balance(&BIDDER), 1);
        assert_eq!(host.owners[&ASSET], BIDDER);
    }

    #[test]
    fn test_bid_underpayment_passes_reason_through() {
        let mut host = FakeHost::new();
        host.fund(BIDDER, PRICE);

        let result = host.send(BIDDER, PRICE - 1, &bid_call(vec![]));

        assert_eq!(
            result,
            Err(RelayError::ExternalCallFailed("bid below current price".into()))
        );
        assert!(!host.state.lock.is_held());
        assert!(host.events.is_empty());
    }

    #[test]
    fn test_bid_while_paused() {
        let mut host = FakeHost::new();
        host.state.access.pause(&OWNER).unwrap();
        host.fund(BIDDER, PRICE);

        let result = host.send(BIDDER, PRICE, &bid_call(vec![]));
        assert_eq!(result, Err(RelayError::ContractPaused));
        assert!(host.outbound.is_empty());
    }

    #[test]
    fn test_bid_registry_lies_about_transfer() {
        let mut host = FakeHost::new();
        host.registry_lies = true;
        host.fund(BIDDER, PRICE);

        let result = host.send(BIDDER, PRICE, &bid_call(vec![]));
        assert_eq!(
            result,
            Err(RelayError::OwnershipVerificationFailed {
                expected: BIDDER,
                actual: RELAY,
            })
        );
    }

    #[test]
    fn test_bid_refund_rejected() {
        let mut host = FakeHost::new();
        host.rejects_value.insert(BIDDER);
        host.fund(BIDDER, PRICE + 5);

        let result = host.send(BIDDER, PRICE + 5, &bid_call(vec![]));
        assert_eq!(
            result,
            Err(RelayError::RefundFailed("value not accepted".into()))
        );
        assert!(!host.state.lock.is_held());
    }

    #[test]
    fn test_bid_refund_that_moves_nothing() {
        let mut host = FakeHost::new();
        host.swallows_value = true;
        host.fund(BIDDER, PRICE + 50);

        let result = host.send(BIDDER, PRICE + 50, &bid_call(vec![]));
        assert_eq!(
            result,
            Err(RelayError::RefundFailed("relay balance not restored".into()))
        );
        assert_eq!(host.balance(&RELAY), 50);
        assert!(host.events.is_empty());
        assert!(!host.state.lock.is_held());
    }

    #[test]
    fn test_reentrant_bid_is_blocked() {
        let mut host = FakeHost::new();
        host.reenter_with = Some(bid_call(vec![]));
        host.fund(BIDDER, PRICE);

        let result = host.send(BIDDER, PRICE, &bid_call(vec![]));
        assert_eq!(
            result,
            Err(RelayError::ExternalCallFailed(
                RelayError::ReentrantCall.to_string()
            ))
        );
        assert!(!host.state.lock.is_held());
    }

    #[test]
    fn test_receive_zero_value_is_noop() {
        let mut host = FakeHost::new();
        assert_eq!(host.send(STRANGER, 0, &[]), Ok(Vec::new()));
        assert!(host.outbound.is_empty());
    }

    #[test]
    fn test_receive_rejects_unsolicited_value() {
        let mut host = FakeHost::new();
        host.fund(STRANGER, 10);
        host.fund(AUCTION, 10);

        assert_eq!(
            host.send(STRANGER, 10, &[]),
            Err(RelayError::UnsolicitedValueRejected)
        );
        // The auction outside a bid is no different.
        assert_eq!(
            host.send(AUCTION, 10, &[]),
            Err(RelayError::UnsolicitedValueRejected)
        );
    }

    #[test]
    fn test_receive_accepts_auction_change_only_during_bid() {
        let mut host = FakeHost::new();
        let change = ctx(AUCTION, 5);

        for operation in [Operation::Rescue, Operation::Call, Operation::Admin] {
            host.state.lock.enter(operation).unwrap();
            assert_eq!(
                handle_receive(&mut host, &change),
                Err(RelayError::UnsolicitedValueRejected)
            );
            host.state.lock.exit();
        }

        host.state.lock.enter(Operation::Bid).unwrap();
        assert_eq!(handle_receive(&mut host, &change), Ok(()));
    }

    #[test]
    fn test_owner_call_cannot_collect_auction_change() {
        let mut host = FakeHost::new();
        host.fund(RELAY, PRICE + 50);

        let overbid = RelayCall::Call {
            target: AUCTION,
            value: PRICE + 50,
            data: AuctionCall::Bid { asset_id: ASSET }.encode(),
        };
        assert_eq!(
            host.send(OWNER, 0, &overbid.encode()),
            Err(RelayError::ExternalCallFailed(
                RelayError::UnsolicitedValueRejected.to_string()
            ))
        );
        assert!(!host.state.lock.is_held());
    }

    #[test]
    fn test_receive_while_paused() {
        let mut host = FakeHost::new();
        host.state.access.pause(&OWNER).unwrap();
        assert_eq!(host.send(STRANGER, 0, &[]), Err(RelayError::ContractPaused));
    }

    #[test]
    fn test_unknown_selector() {
        let mut host = FakeHost::new();
        let data = encode_bare_call("withdrawAll()");
        assert_eq!(host.send(STRANGER, 0, &data), Err(RelayError::UnknownSelector));
        assert_eq!(host.send(STRANGER, 0, &[1, 2]), Err(RelayError::UnknownSelector));
    }

    #[test]
    fn test_non_payable_rejects_value() {
        let mut host = FakeHost::new();
        host.fund(OWNER, 5);
        assert_eq!(
            host.send(OWNER, 5, &RelayCall::Pause.encode()),
            Err(RelayError::UnsolicitedValueRejected)
        );
        assert!(!host.state.access.paused());
    }

    #[test]
    fn test_views() {
        let mut host = FakeHost::new();
        let owner = host.send(STRANGER, 0, &RelayCall::Owner.encode()).unwrap();
        assert_eq!(decode_value::<Address>(&owner).unwrap(), OWNER);

        let paused = host.send(STRANGER, 0, &RelayCall::Paused.encode()).unwrap();
        assert!(!decode_value::<bool>(&paused).unwrap());
    }

    #[test]
    fn test_owner_call_forwards_value_and_payload() {
        let mut host = FakeHost::new();
        host.fund(OWNER, 30);

        let call = RelayCall::Call {
            target: STRANGER,
            value: 30,
            data: vec![9, 8, 7],
        };
        let response = host.send(OWNER, 30, &call.encode()).unwrap();

        assert_eq!(response, b"pong".to_vec());
        assert_eq!(host.outbound, vec![(STRANGER, 30, vec![9, 8, 7])]);
        assert_eq!(host.balance(&STRANGER), 30);
        assert_eq!(
            host.events,
            vec![RelayEvent::Executed {
                target: STRANGER,
                value: 30
            }]
        );
    }

    #[test]
    fn test_call_failure_passes_reason_through() {
        let mut host = FakeHost::new();
        host.rejects_value.insert(STRANGER);
        let call = RelayCall::Call {
            target: STRANGER,
            value: 0,
            data: vec![],
        };
        // Zero value is not refused by the fake.
        assert!(host.send(OWNER, 0, &call.encode()).is_ok());

        host.fund(RELAY, 1);
        let call = RelayCall::Call {
            target: STRANGER,
            value: 1,
            data: vec![],
        };
        assert_eq!(
            host.send(OWNER, 0, &call.encode()),
            Err(RelayError::ExternalCallFailed("value not accepted".into()))
        );
    }

    #[test]
    fn test_call_restrictions() {
        let mut host = FakeHost::new();
        let call = RelayCall::Call {
            target: STRANGER,
            value: 0,
            data: vec![1],
        };
        assert_eq!(
            host.send(STRANGER, 0, &call.encode()),
            Err(RelayError::Unauthorized)
        );

        let zero = RelayCall::Call {
            target: ZERO_ADDRESS,
            value: 0,
            data: vec![],
        };
        assert_eq!(
            host.send(OWNER, 0, &zero.encode()),
            Err(RelayError::InvalidTarget)
        );
        assert!(host.outbound.is_empty());
    }

    #[test]
    fn test_rescue_lost_asset() {
        let mut host = FakeHost::new();
        host.owners.insert(7, RELAY);

        let rescue = RelayCall::RescueLostAsset {
            asset_id: 7,
            recipient: STRANGER,
        };
        assert_eq!(
            host.send(STRANGER, 0, &rescue.encode()),
            Err(RelayError::Unauthorized)
        );
        assert_eq!(host.owners[&7], RELAY);

        host.send(OWNER, 0, &rescue.encode()).unwrap();
        assert_eq!(host.owners[&7], STRANGER);

        // The relay no longer holds it.
        assert!(matches!(
            host.send(OWNER, 0, &rescue.encode()),
            Err(RelayError::AssetTransferFailed(_))
        ));
    }

    #[test]
    fn test_owner_actions_blocked_while_paused() {
        let mut host = FakeHost::new();
        host.owners.insert(7, RELAY);
        host.send(OWNER, 0, &RelayCall::Pause.encode()).unwrap();

        let rescue = RelayCall::RescueLostAsset {
            asset_id: 7,
            recipient: OWNER,
        };
        assert_eq!(
            host.send(OWNER, 0, &rescue.encode()),
            Err(RelayError::ContractPaused)
        );

        let transfer = RelayCall::TransferOwnership {
            new_owner: STRANGER,
        };
        host.send(OWNER, 0, &transfer.encode()).unwrap();
        host.send(STRANGER, 0, &RelayCall::Unpause.encode()).unwrap();

        assert!(!host.state.access.paused());
        assert_eq!(host.state.access.owner(), STRANGER);
        assert_eq!(
            host.events,
            vec![
                RelayEvent::Paused { by: OWNER },
                RelayEvent::OwnershipTransferred {
                    previous_owner: OWNER,
                    new_owner: STRANGER,
                },
                RelayEvent::Unpaused { by: STRANGER },
            ]
        );
    }
}
