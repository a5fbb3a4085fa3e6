//! The environment a relay executes in.
//!
//! Handlers never touch balances, collaborators or storage directly; they go
//! through a [`RelayHost`]. The mock chain implements it over its simulated
//! world, unit tests implement it over a scripted fake.

use relay_types::{Address, Amount, Revert};

use crate::event::RelayEvent;
use crate::state::RelayState;

pub trait RelayHost {
    /// Address the relay lives at.
    fn relay_address(&self) -> Address;

    fn relay_state(&self) -> &RelayState;

    fn relay_state_mut(&mut self) -> &mut RelayState;

    /// Native balance of `address`.
    fn balance_of(&mut self, address: &Address) -> Amount;

    /// Read-only touch of `address`.
    ///
    /// Has no observable effect besides metering cost and cannot fail.
    /// Hosts without access metering implement it as a no-op.
    fn warm(&mut self, address: &Address);

    /// Synchronous outbound call from the relay carrying `value`.
    ///
    /// Control returns only after the callee has finished; a failure is
    /// reported as the callee's [`Revert`].
    fn call(&mut self, to: Address, value: Amount, data: Vec<u8>) -> Result<Vec<u8>, Revert>;

    fn emit(&mut self, event: RelayEvent);
}
