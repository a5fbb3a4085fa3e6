//! Implementation of the mock chain RPC server.

use jsonrpsee::core::{async_trait, RpcResult};
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::RwLock;
use relay_module::{RelayCall, RelayQuery, RelayQueryResponse};
use relay_types::{format_address, parse_address, Address};
use std::sync::Arc;
use tracing::info;

use crate::rpc::MockChainApiServer;
use crate::types::*;
use crate::world::{Transaction, World};

pub struct MockChainServer {
    world: Arc<RwLock<World>>,
}

impl MockChainServer {
    pub fn new(world: World) -> Self {
        Self {
            world: Arc::new(RwLock::new(world)),
        }
    }

    /// Shared handle to the world, for embedding the server in tests.
    pub fn world(&self) -> Arc<RwLock<World>> {
        self.world.clone()
    }

    fn rpc_error(msg: &str) -> ErrorObjectOwned {
        ErrorObjectOwned::owned(-32000, msg.to_string(), None::<()>)
    }

    fn address(s: &str) -> RpcResult<Address> {
        parse_address(s).map_err(|e| Self::rpc_error(&e.to_string()))
    }

    fn relay_tx(&self, sender: &str, value: u64, call: RelayCall) -> RpcResult<ReceiptRpc> {
        let sender = Self::address(sender)?;
        let mut world = self.world.write();
        let receipt = world.send_relay(sender, value, &call);
        info!(
            success = receipt.success,
            gas_used = receipt.gas_used,
            "Relay transaction from {}",
            format_address(&sender)
        );
        Ok(receipt.into())
    }
}

#[async_trait]
impl MockChainApiServer for MockChainServer {
    async fn admin_fund(&self, address: String, amount: u64) -> RpcResult<u64> {
        let address = Self::address(&address)?;
        self.world
            .write()
            .fund(address, amount)
            .map_err(|e| Self::rpc_error(&format!("Failed to fund: {}", e)))
    }

    async fn admin_mint(&self, asset_id: u64, owner: String) -> RpcResult<bool> {
        let owner = Self::address(&owner)?;
        self.world
            .write()
            .mint(asset_id, owner)
            .map_err(|e| Self::rpc_error(&format!("Failed to mint: {}", e)))?;
        Ok(true)
    }

    async fn admin_list_asset(&self, params: ListAssetParams) -> RpcResult<bool> {
        let seller = Self::address(&params.seller)?;
        self.world
            .write()
            .list_asset(
                seller,
                params.asset_id,
                params.start_price,
                params.end_price,
                params.duration,
            )
            .map_err(|e| Self::rpc_error(&format!("Failed to list asset: {}", e)))?;
        Ok(true)
    }

    async fn admin_advance_block(&self) -> RpcResult<BlockInfo> {
        let mut world = self.world.write();
        world.advance_block();
        Ok(BlockInfo {
            height: world.block_height(),
            timestamp: world.timestamp(),
        })
    }

    async fn admin_set_timestamp(&self, timestamp: u64) -> RpcResult<bool> {
        self.world.write().set_timestamp(timestamp);
        info!("Timestamp set to {}", timestamp);
        Ok(true)
    }

    async fn admin_set_rejects_value(&self, address: String, rejects: bool) -> RpcResult<bool> {
        let address = Self::address(&address)?;
        self.world.write().set_rejects_value(address, rejects);
        Ok(true)
    }

    async fn admin_set_registry_faulty(&self, faulty: bool) -> RpcResult<bool> {
        self.world.write().set_registry_faulty(faulty);
        info!(faulty, "Registry mode changed");
        Ok(true)
    }

    async fn admin_set_overpayment_tolerance(&self, tolerance: Option<u64>) -> RpcResult<bool> {
        self.world.write().set_overpayment_tolerance(tolerance);
        Ok(true)
    }

    async fn relay_bid(&self, params: BidParams) -> RpcResult<ReceiptRpc> {
        let call = match params.warmups {
            None => RelayCall::Bid {
                asset_id: params.asset_id,
            },
            Some(warmups) => RelayCall::BidWithSpecificWarmups {
                asset_id: params.asset_id,
                warmups: warmups
                    .iter()
                    .map(|w| Self::address(w))
                    .collect::<RpcResult<Vec<_>>>()?,
            },
        };
        self.relay_tx(&params.sender, params.value, call)
    }

    async fn relay_rescue_lost_asset(
        &self,
        sender: String,
        asset_id: u64,
        recipient: String,
    ) -> RpcResult<ReceiptRpc> {
        let recipient = Self::address(&recipient)?;
        self.relay_tx(
            &sender,
            0,
            RelayCall::RescueLostAsset {
                asset_id,
                recipient,
            },
        )
    }

    async fn relay_call(&self, params: CallParams) -> RpcResult<ReceiptRpc> {
        let target = Self::address(&params.target)?;
        let data = hex::decode(params.data.trim_start_matches("0x"))
            .map_err(|e| Self::rpc_error(&format!("Invalid calldata hex: {}", e)))?;
        self.relay_tx(
            &params.sender,
            params.attached,
            RelayCall::Call {
                target,
                value: params.value,
                data,
            },
        )
    }

    async fn relay_transfer_ownership(
        &self,
        sender: String,
        new_owner: String,
    ) -> RpcResult<ReceiptRpc> {
        let new_owner = Self::address(&new_owner)?;
        self.relay_tx(&sender, 0, RelayCall::TransferOwnership { new_owner })
    }

    async fn relay_pause(&self, sender: String) -> RpcResult<ReceiptRpc> {
        self.relay_tx(&sender, 0, RelayCall::Pause)
    }

    async fn relay_unpause(&self, sender: String) -> RpcResult<ReceiptRpc> {
        self.relay_tx(&sender, 0, RelayCall::Unpause)
    }

    async fn chain_send(&self, tx: TransactionRpc) -> RpcResult<ReceiptRpc> {
        let from = Self::address(&tx.from)?;
        let to = Self::address(&tx.to)?;
        let data = hex::decode(tx.data.trim_start_matches("0x"))
            .map_err(|e| Self::rpc_error(&format!("Invalid calldata hex: {}", e)))?;

        let receipt = self
            .world
            .write()
            .execute(Transaction::new(from, to, tx.value, data));
        Ok(receipt.into())
    }

    async fn query_block_info(&self) -> RpcResult<BlockInfo> {
        let world = self.world.read();
        Ok(BlockInfo {
            height: world.block_height(),
            timestamp: world.timestamp(),
        })
    }

    async fn query_relay_info(&self) -> RpcResult<RelayInfo> {
        let world = self.world.read();
        let relay = world.relay();
        let locked = matches!(
            world.query(RelayQuery::Locked),
            RelayQueryResponse::Locked(true)
        );
        Ok(RelayInfo {
            relay: address_rpc(&world.relay_address()),
            owner: address_rpc(&relay.access.owner()),
            paused: relay.access.paused(),
            auction: address_rpc(&relay.auction),
            registry: address_rpc(&relay.registry),
            locked,
        })
    }

    async fn query_owner(&self) -> RpcResult<String> {
        match self.world.read().query(RelayQuery::Owner) {
            RelayQueryResponse::Owner(owner) => Ok(address_rpc(&owner)),
            other => Err(Self::rpc_error(&format!("Unexpected response {:?}", other))),
        }
    }

    async fn query_paused(&self) -> RpcResult<bool> {
        match self.world.read().query(RelayQuery::Paused) {
            RelayQueryResponse::Paused(paused) => Ok(paused),
            other => Err(Self::rpc_error(&format!("Unexpected response {:?}", other))),
        }
    }

    async fn query_balance(&self, address: String) -> RpcResult<u64> {
        let address = Self::address(&address)?;
        Ok(self.world.read().balance(&address))
    }

    async fn query_owner_of(&self, asset_id: u64) -> RpcResult<Option<String>> {
        Ok(self
            .world
            .read()
            .owner_of(asset_id)
            .map(|owner| address_rpc(&owner)))
    }

    async fn query_current_price(&self, asset_id: u64) -> RpcResult<Option<u64>> {
        Ok(self.world.read().current_price(asset_id))
    }
}
