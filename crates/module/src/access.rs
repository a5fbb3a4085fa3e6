//! Owner and pause gating.
//!
//! Every state-changing handler consults an [`AccessControl`] before doing
//! anything else. Ownership transfer is the one owner action that stays
//! available while paused, so a stuck owner flow can still hand off control.

use serde::{Deserialize, Serialize};

use relay_types::{is_zero_address, Address};

use crate::error::RelayError;
use crate::handlers::HandlerResult;

/// Owner identity and pause flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
    paused: bool,
}

impl AccessControl {
    /// Create a controller owned by `owner`, unpaused.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            paused: false,
        }
    }

    /// Create a controller owned by `owner` that starts paused.
    pub fn new_paused(owner: Address) -> Self {
        Self {
            owner,
            paused: true,
        }
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether state-changing entry points are blocked.
    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn require_owner(&self, caller: &Address) -> HandlerResult<()> {
        if *caller != self.owner {
            return Err(RelayError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_not_paused(&self) -> HandlerResult<()> {
        if self.paused {
            return Err(RelayError::ContractPaused);
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`. Returns the previous owner.
    ///
    /// Allowed while paused. The zero address and the current owner are
    /// rejected so a repeated call surfaces as an error.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> HandlerResult<Address> {
        self.require_owner(caller)?;
        if is_zero_address(&new_owner) || new_owner == self.owner {
            return Err(RelayError::InvalidTarget);
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        Ok(previous)
    }

    pub fn pause(&mut self, caller: &Address) -> HandlerResult<()> {
        self.require_owner(caller)?;
        if self.paused {
            return Err(RelayError::InvalidState("already paused"));
        }
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> HandlerResult<()> {
        self.require_owner(caller)?;
        if !self.paused {
            return Err(RelayError::InvalidState("not paused"));
        }
        self.paused = false;
        Ok(())
    }
}
