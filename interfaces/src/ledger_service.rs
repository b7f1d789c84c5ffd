use std::sync::Arc;

use entities::ledger::{AssetCreateParams, AssetHolding, AssetInfo, CreatedAsset, SignedTransaction, UnsignedAssetCreate};
use thiserror::Error;

/// Signs transactions on behalf of the connected wallet.
/// The keys never leave the wallet, we only get the signed bytes back.
#[async_trait::async_trait]
pub trait TransactionSigner {
    async fn sign_asset_create(&self, txn: &UnsignedAssetCreate) -> anyhow::Result<SignedTransaction>;
}

pub type ArcedSigner = Arc<dyn TransactionSigner + Sync + Send>;

#[async_trait::async_trait]
pub trait LedgerService {
    /// Lists every asset the account holds, in the order the ledger returns them
    async fn held_assets(&self, address: &str) -> anyhow::Result<Vec<AssetHolding>>;

    async fn asset_info(&self, asset_id: u64) -> anyhow::Result<AssetInfo>;

    /// Binds the signer used by [`LedgerService::create_asset`].
    /// Binding the same or another signer again simply replaces it.
    async fn bind_signer(&self, signer: ArcedSigner);

    /// Submits an asset-create transaction signed by the bound signer
    /// and waits for it to be confirmed.
    /// ## Args:
    /// * `params` - asset fields; `params.sender` pays the fee
    async fn create_asset(&self, params: AssetCreateParams) -> anyhow::Result<CreatedAsset>;
}

#[derive(Error, Debug)]
pub enum MintError {
    #[error("No transaction signer is bound")]
    SignerMissing,
    #[error("Failed to sign transaction: {0}")]
    SigningFailed(String),
    #[error("Ledger rejected transaction: {0}")]
    Rejected(String),
    #[error("Transaction {tx_id} was not confirmed after {rounds} rounds")]
    NotConfirmed { tx_id: String, rounds: u64 },
    #[error("Confirmed transaction {0} carries no asset index")]
    MissingAssetIndex(String),
}
