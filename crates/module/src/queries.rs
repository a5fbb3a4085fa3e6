//! Query handlers for the relay module.
//!
//! These functions provide read-only access to relay state.

use relay_types::Address;
use serde::{Deserialize, Serialize};

use crate::state::RelayState;

/// Query request types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RelayQuery {
    /// Current owner.
    Owner,

    /// Whether the relay is paused.
    Paused,

    /// Configured auction address.
    Auction,

    /// Configured registry address.
    Registry,

    /// Whether an operation is executing.
    Locked,
}

/// Query response types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayQueryResponse {
    Owner(Address),
    Paused(bool),
    Auction(Address),
    Registry(Address),
    Locked(bool),
}

/// Handle a query.
pub fn handle_query(state: &RelayState, query: RelayQuery) -> RelayQueryResponse {
    match query {
        RelayQuery::Owner => RelayQueryResponse::Owner(state.access.owner()),
        RelayQuery::Paused => RelayQueryResponse::Paused(state.access.paused()),
        RelayQuery::Auction => RelayQueryResponse::Auction(state.auction),
        RelayQuery::Registry => RelayQueryResponse::Registry(state.registry),
        RelayQuery::Locked => RelayQueryResponse::Locked(state.lock.is_held()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_query() {
        let state = RelayState::new([1u8; 32], [2u8; 32], [3u8; 32]);
        assert_eq!(
            handle_query(&state, RelayQuery::Owner),
            RelayQueryResponse::Owner([1u8; 32])
        );
    }

    #[test]
    fn test_paused_query_follows_state() {
        let mut state = RelayState::new([1u8; 32], [2u8; 32], [3u8; 32]);
        assert_eq!(
            handle_query(&state, RelayQuery::Paused),
            RelayQueryResponse::Paused(false)
        );
        state.access.pause(&[1u8; 32]).unwrap();
        assert_eq!(
            handle_query(&state, RelayQuery::Paused),
            RelayQueryResponse::Paused(true)
        );
    }

    #[test]
    fn test_locked_query_idle() {
        let state = RelayState::new([1u8; 32], [2u8; 32], [3u8; 32]);
        assert!(matches!(
            handle_query(&state, RelayQuery::Locked),
            RelayQueryResponse::Locked(false)
        ));
    }
}
