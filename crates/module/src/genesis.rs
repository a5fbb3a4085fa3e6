//! Genesis configuration for the relay module.
//!
//! The owner is fixed to the deployer at construction; the collaborator
//! addresses cannot change afterwards.

use relay_types::{is_zero_address, Address};
use serde::{Deserialize, Serialize};

/// Genesis configuration for the relay module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayGenesisConfig {
    /// Deployer, becomes the initial owner
    pub owner: Address,

    /// External auction service
    pub auction: Address,

    /// External asset registry
    pub registry: Address,

    /// Start in the paused state
    #[serde(default)]
    pub start_paused: bool,
}

impl RelayGenesisConfig {
    pub fn new(owner: Address, auction: Address, registry: Address) -> Self {
        Self {
            owner,
            auction,
            registry,
            start_paused: false,
        }
    }

    /// Validate the genesis configuration.
    pub fn validate(&self) -> Result<(), GenesisValidationError> {
        if is_zero_address(&self.owner) {
            return Err(GenesisValidationError::ZeroAddress("owner"));
        }
        if is_zero_address(&self.auction) {
            return Err(GenesisValidationError::ZeroAddress("auction"));
        }
        if is_zero_address(&self.registry) {
            return Err(GenesisValidationError::ZeroAddress("registry"));
        }
        if self.auction == self.registry {
            return Err(GenesisValidationError::CollaboratorsCollide);
        }
        Ok(())
    }
}

/// Errors that can occur during genesis validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenesisValidationError {
    #[error("{0} address cannot be zero")]
    ZeroAddress(&'static str),

    #[error("Auction and registry must be distinct")]
    CollaboratorsCollide,
}
