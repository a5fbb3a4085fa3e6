//! Reference asset registry.

use relay_types::{
    encode_value, is_zero_address, Address, Amount, AssetId, Message, RegistryCall, Revert,
};
use std::collections::HashMap;

/// Ownership ledger for non-fungible assets.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    owners: HashMap<AssetId, Address>,
    /// Acknowledge every transfer without checking or applying it
    faulty: bool,
}

impl Registry {
    /// Create a new asset. Fails if the id is taken.
    pub fn mint(&mut self, asset_id: AssetId, owner: Address) -> Result<(), Revert> {
        if is_zero_address(&owner) {
            return Err(Revert::new("mint to zero address"));
        }
        if self.owners.contains_key(&asset_id) {
            return Err(Revert::new("asset already exists"));
        }
        self.owners.insert(asset_id, owner);
        Ok(())
    }

    pub fn owner_of(&self, asset_id: AssetId) -> Option<Address> {
        self.owners.get(&asset_id).copied()
    }

    pub fn set_faulty(&mut self, faulty: bool) {
        self.faulty = faulty;
    }

    /// Execute a call from `sender`.
    pub(crate) fn execute(
        &mut self,
        sender: Address,
        value: Amount,
        data: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        if value != 0 {
            return Err(Revert::new("registry is not payable"));
        }
        match RegistryCall::decode(data).map_err(|e| Revert::new(e.to_string()))? {
            RegistryCall::OwnerOf { asset_id } => self
                .owner_of(asset_id)
                .map(|owner| encode_value(&owner))
                .ok_or_else(|| Revert::new("asset does not exist")),
            RegistryCall::Transfer { to, asset_id } => {
                if self.faulty {
                    return Ok(Vec::new());
                }
                if self.owner_of(asset_id) != Some(sender) {
                    return Err(Revert::new("sender does not own asset"));
                }
                if is_zero_address(&to) {
                    return Err(Revert::new("transfer to zero address"));
                }
                self.owners.insert(asset_id, to);
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::{decode_value, ZERO_ADDRESS};

    const ALICE: Address = [1u8; 32];
    const BOB: Address = [2u8; 32];

    #[test]
    fn test_transfer_by_owner() {
        let mut registry = Registry::default();
        registry.mint(1, ALICE).unwrap();

        let data = RegistryCall::Transfer { to: BOB, asset_id: 1 }.encode();
        registry.execute(ALICE, 0, &data).unwrap();
        assert_eq!(registry.owner_of(1), Some(BOB));

        let owner = registry
            .execute(BOB, 0, &RegistryCall::OwnerOf { asset_id: 1 }.encode())
            .unwrap();
        assert_eq!(decode_value::<Address>(&owner).unwrap(), BOB);
    }

    #[test]
    fn test_transfer_rules() {
        let mut registry = Registry::default();
        registry.mint(1, ALICE).unwrap();

        let steal = RegistryCall::Transfer { to: BOB, asset_id: 1 }.encode();
        assert!(registry.execute(BOB, 0, &steal).is_err());

        let burn = RegistryCall::Transfer {
            to: ZERO_ADDRESS,
            asset_id: 1,
        }
        .encode();
        assert!(registry.execute(ALICE, 0, &burn).is_err());

        let paid = RegistryCall::Transfer { to: BOB, asset_id: 1 }.encode();
        assert!(registry.execute(ALICE, 5, &paid).is_err());
        assert_eq!(registry.owner_of(1), Some(ALICE));
    }

    #[test]
    fn test_faulty_registry_acknowledges_without_applying() {
        let mut registry = Registry::default();
        registry.mint(1, ALICE).unwrap();
        registry.set_faulty(true);

        let data = RegistryCall::Transfer { to: BOB, asset_id: 1 }.encode();
        assert!(registry.execute(ALICE, 0, &data).is_ok());
        assert!(registry.execute(BOB, 0, &data).is_ok());
        assert_eq!(registry.owner_of(1), Some(ALICE));
    }

    #[test]
    fn test_mint_twice() {
        let mut registry = Registry::default();
        registry.mint(1, ALICE).unwrap();
        assert!(registry.mint(1, BOB).is_err());
    }
}
