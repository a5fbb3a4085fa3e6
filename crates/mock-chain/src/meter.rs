//! Access metering.
//!
//! The first touch of an address within a transaction is charged as cold,
//! every later touch as warm. This is what makes pre-priming observable: a
//! relay that warms its targets up front pays the cold price at a point of
//! its choosing.

use relay_types::Address;
use std::collections::HashSet;

pub const TX_BASE: u64 = 21_000;
pub const COLD_ACCOUNT_ACCESS: u64 = 2_600;
pub const WARM_ACCOUNT_ACCESS: u64 = 100;
pub const VALUE_TRANSFER: u64 = 9_000;

#[derive(Debug, Default)]
pub struct Meter {
    accessed: HashSet<Address>,
    used: u64,
}

impl Meter {
    /// Start a transaction. `preloaded` addresses begin warm.
    pub fn begin(&mut self, preloaded: &[Address]) {
        self.accessed.clear();
        self.accessed.extend(preloaded.iter().copied());
        self.used = TX_BASE;
    }

    /// Charge an access to `address` and return its cost.
    pub fn access(&mut self, address: &Address) -> u64 {
        let cost = if self.accessed.insert(*address) {
            COLD_ACCOUNT_ACCESS
        } else {
            WARM_ACCOUNT_ACCESS
        };
        self.used += cost;
        cost
    }

    pub fn charge(&mut self, amount: u64) {
        self.used += amount;
    }

    pub fn is_warm(&self, address: &Address) -> bool {
        self.accessed.contains(address)
    }

    /// Gas used by the current transaction so far.
    pub fn used(&self) -> u64 {
        self.used
    }
}
