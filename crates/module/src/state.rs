//! Relay module state.

use relay_types::Address;
use serde::{Deserialize, Serialize};

use crate::access::AccessControl;
use crate::error::RelayError;
use crate::genesis::RelayGenesisConfig;
use crate::handlers::HandlerResult;

/// Relay state.
///
/// A handful of scalars: the access controller, the two collaborator
/// addresses fixed at genesis and the execution lock. The relay stores no
/// balances and no assets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayState {
    /// Owner and pause flag
    pub access: AccessControl,

    /// External auction service
    pub auction: Address,

    /// External asset registry
    pub registry: Address,

    /// Held while a state-changing entry point runs
    pub lock: ExecutionLock,
}

impl RelayState {
    /// Create relay state owned by `owner`.
    pub fn new(owner: Address, auction: Address, registry: Address) -> Self {
        Self {
            access: AccessControl::new(owner),
            auction,
            registry,
            lock: ExecutionLock::default(),
        }
    }

    /// Build state from a validated genesis config.
    pub fn from_genesis(config: &RelayGenesisConfig) -> Self {
        let access = if config.start_paused {
            AccessControl::new_paused(config.owner)
        } else {
            AccessControl::new(config.owner)
        };
        Self {
            access,
            auction: config.auction,
            registry: config.registry,
            lock: ExecutionLock::default(),
        }
    }
}

/// Entry point holding the execution lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Bid,
    Rescue,
    Call,
    Admin,
}

/// Non-reentrancy flag, remembering which operation is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLock {
    holder: Option<Operation>,
}

impl ExecutionLock {
    /// Whether an entry point is currently executing.
    pub fn is_held(&self) -> bool {
        self.holder.is_some()
    }

    pub fn holder(&self) -> Option<Operation> {
        self.holder
    }

    pub fn enter(&mut self, operation: Operation) -> HandlerResult<()> {
        if self.holder.is_some() {
            return Err(RelayError::ReentrantCall);
        }
        self.holder = Some(operation);
        Ok(())
    }

    pub fn exit(&mut self) {
        self.holder = None;
    }
}
