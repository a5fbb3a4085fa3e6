//! Relay module error types.

use thiserror::Error;

use relay_types::{Address, CodecError};

/// Errors that can occur in the relay module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Caller is not the owner")]
    Unauthorized,

    #[error("Contract is paused")]
    ContractPaused,

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("Invalid target address")]
    InvalidTarget,

    #[error("Unsolicited value rejected")]
    UnsolicitedValueRejected,

    #[error("Unknown selector")]
    UnknownSelector,

    #[error("Invalid calldata: {0}")]
    InvalidCalldata(String),

    #[error("External call failed: {0}")]
    ExternalCallFailed(String),

    #[error("Asset transfer failed: {0}")]
    AssetTransferFailed(String),

    #[error("Ownership verification failed")]
    OwnershipVerificationFailed { expected: Address, actual: Address },

    #[error("Refund failed: {0}")]
    RefundFailed(String),

    #[error("Reentrant call")]
    ReentrantCall,

    #[error("Relay balance fell below its pre-bid level")]
    BalanceUnderflow,
}

impl From<CodecError> for RelayError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnknownSelector(_) | CodecError::MissingSelector => {
                RelayError::UnknownSelector
            }
            other => RelayError::InvalidCalldata(other.to_string()),
        }
    }
}
