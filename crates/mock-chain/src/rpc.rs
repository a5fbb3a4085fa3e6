//! RPC API definition for the mock chain.
//!
//! Both the server side and a typed client are generated from this trait.

use jsonrpsee::core::RpcResult;
use jsonrpsee::proc_macros::rpc;

use crate::types::*;

#[rpc(server, client)]
pub trait MockChainApi {
    // ============ Admin Methods ============

    /// Credit an account. Returns the new balance.
    #[method(name = "admin_fund")]
    async fn admin_fund(&self, address: String, amount: u64) -> RpcResult<u64>;

    /// Create an asset owned by `owner`.
    #[method(name = "admin_mint")]
    async fn admin_mint(&self, asset_id: u64, owner: String) -> RpcResult<bool>;

    /// Hand an asset to the auction and list it on behalf of its owner.
    #[method(name = "admin_listAsset")]
    async fn admin_list_asset(&self, params: ListAssetParams) -> RpcResult<bool>;

    /// Advance the chain by one block.
    #[method(name = "admin_advanceBlock")]
    async fn admin_advance_block(&self) -> RpcResult<BlockInfo>;

    /// Set the current timestamp (for testing time-dependent logic).
    #[method(name = "admin_setTimestamp")]
    async fn admin_set_timestamp(&self, timestamp: u64) -> RpcResult<bool>;

    /// Make an account refuse incoming value.
    #[method(name = "admin_setRejectsValue")]
    async fn admin_set_rejects_value(&self, address: String, rejects: bool) -> RpcResult<bool>;

    /// Make the registry acknowledge transfers without applying them.
    #[method(name = "admin_setRegistryFaulty")]
    async fn admin_set_registry_faulty(&self, faulty: bool) -> RpcResult<bool>;

    /// Cap the excess a bid may carry over the current price.
    #[method(name = "admin_setOverpaymentTolerance")]
    async fn admin_set_overpayment_tolerance(&self, tolerance: Option<u64>) -> RpcResult<bool>;

    // ============ Relay Methods ============

    /// Bid through the relay.
    #[method(name = "relay_bid")]
    async fn relay_bid(&self, params: BidParams) -> RpcResult<ReceiptRpc>;

    /// Move an asset held by the relay (owner only).
    #[method(name = "relay_rescueLostAsset")]
    async fn relay_rescue_lost_asset(
        &self,
        sender: String,
        asset_id: u64,
        recipient: String,
    ) -> RpcResult<ReceiptRpc>;

    /// Arbitrary call from the relay (owner only).
    #[method(name = "relay_call")]
    async fn relay_call(&self, params: CallParams) -> RpcResult<ReceiptRpc>;

    #[method(name = "relay_transferOwnership")]
    async fn relay_transfer_ownership(
        &self,
        sender: String,
        new_owner: String,
    ) -> RpcResult<ReceiptRpc>;

    #[method(name = "relay_pause")]
    async fn relay_pause(&self, sender: String) -> RpcResult<ReceiptRpc>;

    #[method(name = "relay_unpause")]
    async fn relay_unpause(&self, sender: String) -> RpcResult<ReceiptRpc>;

    // ============ Chain Methods ============

    /// Execute a raw transaction.
    #[method(name = "chain_send")]
    async fn chain_send(&self, tx: TransactionRpc) -> RpcResult<ReceiptRpc>;

    // ============ Query Methods ============

    #[method(name = "query_blockInfo")]
    async fn query_block_info(&self) -> RpcResult<BlockInfo>;

    #[method(name = "query_relayInfo")]
    async fn query_relay_info(&self) -> RpcResult<RelayInfo>;

    #[method(name = "query_owner")]
    async fn query_owner(&self) -> RpcResult<String>;

    #[method(name = "query_paused")]
    async fn query_paused(&self) -> RpcResult<bool>;

    #[method(name = "query_balance")]
    async fn query_balance(&self, address: String) -> RpcResult<u64>;

    /// Owner of an asset, if it exists.
    #[method(name = "query_ownerOf")]
    async fn query_owner_of(&self, asset_id: u64) -> RpcResult<Option<String>>;

    /// Current auction price, if the asset is listed.
    #[method(name = "query_currentPrice")]
    async fn query_current_price(&self, asset_id: u64) -> RpcResult<Option<u64>>;
}
