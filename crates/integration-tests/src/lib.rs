//! End-to-end integration tests for the bid relay.
//!
//! These tests exercise the relay inside the mock chain world:
//! 1. Genesis and listing setup
//! 2. Bidding through the relay, with and without change
//! 3. Failure paths and their rollback
//! 4. Owner operations and the pause lifecycle
//! 5. Warmup lists and their effect on metering

use relay_mock_chain::meter::{COLD_ACCOUNT_ACCESS, WARM_ACCOUNT_ACCESS};
use relay_mock_chain::{Receipt, Transaction, World};
use relay_module::{RelayCall, RelayError, RelayEvent, RelayGenesisConfig};
use relay_types::{
    decode_value, Address, Amount, AssetId, AuctionCall, Message, ZERO_ADDRESS,
};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const OWNER: Address = [1u8; 32];
const BIDDER: Address = [2u8; 32];
const SELLER: Address = [3u8; 32];
const STRANGER: Address = [4u8; 32];
const RELAY: Address = [10u8; 32];
const AUCTION: Address = [11u8; 32];
const REGISTRY: Address = [12u8; 32];

const ASSET: AssetId = 42;
const PRICE: Amount = 1_000;
const BIDDER_FUNDS: Amount = 10_000;

/// Deploy the relay and list asset 42 at a flat price.
fn setup() -> World {
    let genesis = RelayGenesisConfig::new(OWNER, AUCTION, REGISTRY);
    let mut world = World::new(&genesis, RELAY).unwrap();

    world.fund(BIDDER, BIDDER_FUNDS).unwrap();
    world.mint(ASSET, SELLER).unwrap();
    world.list_asset(SELLER, ASSET, PRICE, PRICE, 3_600).unwrap();
    world
}

fn bid(world: &mut World, value: Amount) -> Receipt {
    world.send_relay(BIDDER, value, &RelayCall::Bid { asset_id: ASSET })
}

fn assert_failed(receipt: &Receipt, expected: RelayError) {
    assert!(!receipt.success, "transaction unexpectedly succeeded");
    assert_eq!(receipt.error, Some(expected.to_string()));
    assert!(receipt.events.is_empty());
}

/// Nothing moved: balances, ownership and the listing are as after setup.
fn assert_untouched(world: &World) {
    assert_eq!(world.balance(&BIDDER), BIDDER_FUNDS);
    assert_eq!(world.balance(&SELLER), 0);
    assert_eq!(world.balance(&RELAY), 0);
    assert_eq!(world.balance(&AUCTION), 0);
    assert_eq!(world.owner_of(ASSET), Some(AUCTION));
    assert_eq!(world.current_price(ASSET), Some(PRICE));
    assert!(!world.relay().lock.is_held());
}

/// Test the complete bid flow at exactly the current price.
#[test]
fn test_full_bid_flow() {
    let mut world = setup();
    assert_eq!(world.relay().access.owner(), OWNER);

    let receipt = bid(&mut world, PRICE);
    assert!(receipt.success, "{:?}", receipt.error);

    assert_eq!(world.owner_of(ASSET), Some(BIDDER));
    assert_eq!(world.balance(&BIDDER), BIDDER_FUNDS - PRICE);
    assert_eq!(world.balance(&SELLER), PRICE);
    assert_eq!(world.balance(&RELAY), 0);
    assert_eq!(world.current_price(ASSET), None);
    assert_eq!(
        receipt.events,
        vec![RelayEvent::BidRelayed {
            bidder: BIDDER,
            asset_id: ASSET,
            paid: PRICE,
            refunded: 0,
        }]
    );

    println!("Bid relayed, gas used: {}", receipt.gas_used);
}

#[test]
fn test_overpayment_is_refunded() {
    let mut world = setup();

    let receipt = bid(&mut world, PRICE + 50);
    assert!(receipt.success, "{:?}", receipt.error);

    assert_eq!(world.owner_of(ASSET), Some(BIDDER));
    assert_eq!(world.balance(&BIDDER), BIDDER_FUNDS - PRICE);
    assert_eq!(world.balance(&SELLER), PRICE);
    assert_eq!(world.balance(&RELAY), 0);
    assert!(matches!(
        receipt.events.as_slice(),
        [RelayEvent::BidRelayed {
            paid: PRICE,
            refunded: 50,
            ..
        }]
    ));
}

#[test]
fn test_bid_at_declining_price() {
    let genesis = RelayGenesisConfig::new(OWNER, AUCTION, REGISTRY);
    let mut world = World::new(&genesis, RELAY).unwrap();
    world.fund(BIDDER, BIDDER_FUNDS).unwrap();
    world.mint(ASSET, SELLER).unwrap();
    world.set_timestamp(1_000);
    world.list_asset(SELLER, ASSET, 2_000, 1_000, 100).unwrap();

    world.set_timestamp(1_050);
    let price = world.current_price(ASSET).unwrap();
    assert_eq!(price, 1_500);

    // Offering the price the bidder saw earlier still buys at today's price.
    let receipt = bid(&mut world, 2_000);
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(world.balance(&BIDDER), BIDDER_FUNDS - price);
    assert_eq!(world.balance(&SELLER), price);
}

#[test]
fn test_underpayment_rolls_back() {
    let mut world = setup();

    let receipt = bid(&mut world, PRICE - 1);
    assert_failed(
        &receipt,
        RelayError::ExternalCallFailed("bid below current price".to_string()),
    );
    assert_untouched(&world);
}

#[test]
fn test_bid_on_unlisted_asset() {
    let mut world = setup();

    let receipt = world.send_relay(BIDDER, PRICE, &RelayCall::Bid { asset_id: 7 });
    assert_failed(
        &receipt,
        RelayError::ExternalCallFailed("asset is not on auction".to_string()),
    );
    assert_untouched(&world);
}

#[test]
fn test_overpayment_tolerance() {
    let mut world = setup();
    world.set_overpayment_tolerance(Some(10));

    let receipt = bid(&mut world, PRICE + 11);
    assert_failed(
        &receipt,
        RelayError::ExternalCallFailed("overpayment above tolerance".to_string()),
    );
    assert_untouched(&world);

    let receipt = bid(&mut world, PRICE + 10);
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(world.balance(&BIDDER), BIDDER_FUNDS - PRICE);
}

#[test]
fn test_lying_registry_rolls_back() {
    let mut world = setup();
    world.set_registry_faulty(true);

    let receipt = bid(&mut world, PRICE);
    assert_failed(
        &receipt,
        RelayError::OwnershipVerificationFailed {
            expected: BIDDER,
            actual: AUCTION,
        },
    );

    world.set_registry_faulty(false);
    assert_untouched(&world);
}

#[test]
fn test_rejected_refund_rolls_back() {
    let mut world = setup();
    world.set_rejects_value(BIDDER, true);

    let receipt = bid(&mut world, PRICE + 5);
    assert_failed(
        &receipt,
        RelayError::RefundFailed("recipient rejects value".to_string()),
    );
    assert_untouched(&world);

    // Without change there is nothing to refuse.
    let receipt = bid(&mut world, PRICE);
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(world.owner_of(ASSET), Some(BIDDER));
}

#[test]
fn test_unsolicited_value() {
    let mut world = setup();
    world.fund(STRANGER, 100).unwrap();

    let receipt = world.execute(Transaction::new(STRANGER, RELAY, 10, Vec::new()));
    assert_failed(&receipt, RelayError::UnsolicitedValueRejected);
    assert_eq!(world.balance(&STRANGER), 100);
    assert_eq!(world.balance(&RELAY), 0);

    let receipt = world.execute(Transaction::new(STRANGER, RELAY, 0, Vec::new()));
    assert!(receipt.success);
    assert!(receipt.output.is_empty());

    // Value on a non-payable entry point.
    world.fund(OWNER, 10).unwrap();
    let receipt = world.send_relay(OWNER, 10, &RelayCall::Pause);
    assert_failed(&receipt, RelayError::UnsolicitedValueRejected);
    assert!(!world.relay().access.paused());
    assert_eq!(world.balance(&OWNER), 10);
}

#[test]
fn test_unknown_calldata() {
    let mut world = setup();

    let receipt = world.execute(Transaction::new(STRANGER, RELAY, 0, vec![0xde, 0xad]));
    assert_failed(&receipt, RelayError::UnknownSelector);

    let receipt = world.execute(Transaction::new(
        STRANGER,
        RELAY,
        0,
        vec![0xde, 0xad, 0xbe, 0xef],
    ));
    assert_failed(&receipt, RelayError::UnknownSelector);
}

#[test]
fn test_owner_queries() {
    let mut world = setup();

    let receipt = world.send_relay(STRANGER, 0, &RelayCall::Owner);
    assert_eq!(decode_value::<Address>(&receipt.output).unwrap(), OWNER);

    let receipt = world.send_relay(STRANGER, 0, &RelayCall::Paused);
    assert!(!decode_value::<bool>(&receipt.output).unwrap());
}

#[test]
fn test_owner_call_forwards_value_and_payload() {
    let mut world = setup();
    world.fund(RELAY, 30).unwrap();

    // Raw response comes back unchanged.
    let query = RelayCall::Call {
        target: AUCTION,
        value: 0,
        data: AuctionCall::GetCurrentPrice { asset_id: ASSET }.encode(),
    };
    let receipt = world.send_relay(OWNER, 0, &query);
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(decode_value::<Amount>(&receipt.output).unwrap(), PRICE);

    let payout = RelayCall::Call {
        target: STRANGER,
        value: 30,
        data: Vec::new(),
    };
    let receipt = world.send_relay(STRANGER, 0, &payout);
    assert_failed(&receipt, RelayError::Unauthorized);
    assert_eq!(world.balance(&RELAY), 30);

    let receipt = world.send_relay(OWNER, 0, &payout);
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(world.balance(&STRANGER), 30);
    assert_eq!(world.balance(&RELAY), 0);
    assert_eq!(
        receipt.events,
        vec![RelayEvent::Executed {
            target: STRANGER,
            value: 30,
        }]
    );
}

#[test]
fn test_owner_call_failure_passes_reason_through() {
    let mut world = setup();

    let cancel = RelayCall::Call {
        target: AUCTION,
        value: 0,
        data: AuctionCall::CancelAuction { asset_id: ASSET }.encode(),
    };
    let receipt = world.send_relay(OWNER, 0, &cancel);
    assert_failed(
        &receipt,
        RelayError::ExternalCallFailed("only the seller can cancel".to_string()),
    );
}

#[test]
fn test_reentrant_bid_is_blocked() {
    let mut world = setup();
    world.fund(RELAY, PRICE).unwrap();

    // The owner makes the relay call into itself while its lock is held.
    let reenter = RelayCall::Call {
        target: RELAY,
        value: 0,
        data: RelayCall::Bid { asset_id: ASSET }.encode(),
    };
    let receipt = world.send_relay(OWNER, 0, &reenter);
    assert_failed(
        &receipt,
        RelayError::ExternalCallFailed(RelayError::ReentrantCall.to_string()),
    );
    assert_eq!(world.balance(&RELAY), PRICE);
    assert_eq!(world.owner_of(ASSET), Some(AUCTION));
}

#[test]
fn test_non_owner_admin_calls() {
    let mut world = setup();
    world.mint(7, RELAY).unwrap();

    let calls = [
        RelayCall::TransferOwnership { new_owner: STRANGER },
        RelayCall::Pause,
        RelayCall::Unpause,
        RelayCall::RescueLostAsset {
            asset_id: 7,
            recipient: STRANGER,
        },
        RelayCall::Call {
            target: STRANGER,
            value: 0,
            data: Vec::new(),
        },
    ];
    for call in &calls {
        let receipt = world.send_relay(STRANGER, 0, call);
        assert_failed(&receipt, RelayError::Unauthorized);
    }

    assert_eq!(world.relay().access.owner(), OWNER);
    assert!(!world.relay().access.paused());
    assert_eq!(world.owner_of(7), Some(RELAY));
}

#[test]
fn test_rescue_lost_asset() {
    let mut world = setup();
    world.mint(7, RELAY).unwrap();

    let rescue = RelayCall::RescueLostAsset {
        asset_id: 7,
        recipient: STRANGER,
    };
    let receipt = world.send_relay(OWNER, 0, &rescue);
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(world.owner_of(7), Some(STRANGER));

    // The relay no longer holds it.
    let receipt = world.send_relay(OWNER, 0, &rescue);
    assert_failed(
        &receipt,
        RelayError::AssetTransferFailed("sender does not own asset".to_string()),
    );
}

#[test]
fn test_transfer_ownership_rules() {
    let mut world = setup();

    for new_owner in [ZERO_ADDRESS, OWNER] {
        let receipt = world.send_relay(OWNER, 0, &RelayCall::TransferOwnership { new_owner });
        assert_failed(&receipt, RelayError::InvalidTarget);
    }
    assert_eq!(world.relay().access.owner(), OWNER);
}

#[test]
fn test_pause_transfer_unpause() {
    let mut world = setup();

    let receipt = world.send_relay(OWNER, 0, &RelayCall::Pause);
    assert!(receipt.success);

    // Bids and plain transfers stop.
    assert_failed(&bid(&mut world, PRICE), RelayError::ContractPaused);
    let receipt = world.execute(Transaction::new(STRANGER, RELAY, 0, Vec::new()));
    assert_failed(&receipt, RelayError::ContractPaused);

    // Pausing twice is refused.
    assert!(!world.send_relay(OWNER, 0, &RelayCall::Pause).success);

    let receipt = world.send_relay(
        OWNER,
        0,
        &RelayCall::TransferOwnership {
            new_owner: STRANGER,
        },
    );
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(
        receipt.events,
        vec![RelayEvent::OwnershipTransferred {
            previous_owner: OWNER,
            new_owner: STRANGER,
        }]
    );

    assert_failed(
        &world.send_relay(OWNER, 0, &RelayCall::Unpause),
        RelayError::Unauthorized,
    );
    let receipt = world.send_relay(STRANGER, 0, &RelayCall::Unpause);
    assert!(receipt.success, "{:?}", receipt.error);
    assert!(!world.relay().access.paused());

    let receipt = bid(&mut world, PRICE);
    assert!(receipt.success, "{:?}", receipt.error);
    assert_eq!(world.owner_of(ASSET), Some(BIDDER));
}

/// Bid with an explicit warmup list on a fresh world.
fn bid_with_warmups(value: Amount, warmups: Vec<Address>) -> (World, Receipt) {
    let mut world = setup();
    let receipt = world.send_relay(
        BIDDER,
        value,
        &RelayCall::BidWithSpecificWarmups {
            asset_id: ASSET,
            warmups,
        },
    );
    (world, receipt)
}

/// Empty, zero, duplicate, related and random warmup lists.
fn warmup_lists() -> Vec<Vec<Address>> {
    let mut rng = StdRng::seed_from_u64(42);
    let known = [ZERO_ADDRESS, AUCTION, REGISTRY, SELLER, BIDDER, RELAY, STRANGER];

    let mut lists: Vec<Vec<Address>> = vec![
        Vec::new(),
        vec![ZERO_ADDRESS],
        vec![AUCTION, AUCTION, AUCTION],
    ];
    for _ in 0..20 {
        let len = rng.gen_range(0..12);
        let list = (0..len)
            .map(|_| {
                if rng.gen_bool(0.5) {
                    known[rng.gen_range(0..known.len())]
                } else {
                    rng.gen()
                }
            })
            .collect();
        lists.push(list);
    }
    lists
}

#[test]
fn test_warmups_never_change_success() {
    for warmups in warmup_lists() {
        let (world, receipt) = bid_with_warmups(PRICE + 25, warmups.clone());
        assert!(receipt.success, "{:?} with {:?}", receipt.error, warmups);
        assert_eq!(world.owner_of(ASSET), Some(BIDDER));
        assert_eq!(world.balance(&BIDDER), BIDDER_FUNDS - PRICE);
        assert_eq!(world.balance(&SELLER), PRICE);
        assert_eq!(world.balance(&RELAY), 0);
        assert!(matches!(
            receipt.events.as_slice(),
            [RelayEvent::BidRelayed {
                paid: PRICE,
                refunded: 25,
                ..
            }]
        ));
    }
}

#[test]
fn test_warmups_never_change_failure() {
    for warmups in warmup_lists() {
        let (world, receipt) = bid_with_warmups(PRICE - 1, warmups);
        assert_failed(
            &receipt,
            RelayError::ExternalCallFailed("bid below current price".to_string()),
        );
        assert_untouched(&world);
    }
}

#[test]
fn test_warmups_are_visible_in_gas_only() {
    let (_, baseline) = bid_with_warmups(PRICE + 25, Vec::new());
    let unrelated: Address = [99u8; 32];

    // An unrelated target costs one cold access, a repeat one warm access.
    let (_, primed) = bid_with_warmups(PRICE + 25, vec![unrelated, unrelated]);
    assert_eq!(
        primed.gas_used,
        baseline.gas_used + COLD_ACCOUNT_ACCESS + WARM_ACCOUNT_ACCESS
    );

    // Priming a target that is used later moves its cold access forward.
    let (_, primed) = bid_with_warmups(PRICE + 25, vec![AUCTION]);
    assert_eq!(primed.gas_used, baseline.gas_used + WARM_ACCOUNT_ACCESS);
}

#[test]
fn test_default_warmups_include_seller() {
    let mut world = setup();

    let receipt = bid(&mut world, PRICE);
    assert!(receipt.success, "{:?}", receipt.error);
    assert!(world.is_warm(&AUCTION));
    assert!(world.is_warm(&REGISTRY));
    assert!(world.is_warm(&SELLER));
}
