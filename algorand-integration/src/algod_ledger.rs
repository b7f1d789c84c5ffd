use anyhow::Context;
use entities::ledger::{AssetCreateParams, AssetHolding, AssetInfo, CreatedAsset, SignedTransaction, UnsignedAssetCreate};
use interfaces::ledger_service::{ArcedSigner, LedgerService, MintError};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info};
use util::{config::LedgerCfg, str_util::form_url};

use crate::algod_types::{
    AccountResponse, AssetResponse, ErrorResponse, NodeStatusResponse, PendingTransactionResponse,
    PostTransactionsResponse, TransactionParamsResponse,
};

const API_TOKEN_HEADER: &str = "X-Algo-API-Token";
const BINARY_CONTENT_TYPE: &str = "application/x-binary";

/// Number of rounds a transaction stays valid for after the current one
const VALIDITY_WINDOW: u64 = 1000;

/// [`LedgerService`] speaking to an Algorand node over the algod v2 REST API
pub struct AlgodLedger {
    client: reqwest::Client,
    server: String,
    port: u16,
    token: String,
    confirmation_rounds: u64,
    signer: RwLock<Option<ArcedSigner>>,
}

impl AlgodLedger {
    pub fn new(server: &str, port: u16, token: &str, confirmation_rounds: u64) -> AlgodLedger {
        AlgodLedger {
            client: reqwest::Client::new(),
            server: server.to_string(),
            port,
            token: token.to_string(),
            confirmation_rounds,
            signer: RwLock::new(None),
        }
    }

    pub fn from_cfg(cfg: &LedgerCfg) -> AlgodLedger {
        AlgodLedger::new(&cfg.server, cfg.port, &cfg.token, cfg.confirmation_rounds)
    }

    fn url(&self, path: &str) -> String {
        form_url(&self.server, self.port, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .header(API_TOKEN_HEADER, &self.token)
            .send()
            .await
            .with_context(|| format!("Ledger node is unreachable, requesting '{path}'"))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            anyhow::bail!("Ledger node responded to '{path}' with status {status}: {message}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Malformed ledger response for '{path}'"))
    }

    async fn unsigned_asset_create(&self, params: AssetCreateParams) -> anyhow::Result<UnsignedAssetCreate> {
        let suggested: TransactionParamsResponse = self.get_json("v2/transactions/params").await?;

        Ok(UnsignedAssetCreate {
            params,
            fee: suggested.min_fee,
            first_valid: suggested.last_round,
            last_valid: suggested.last_round + VALIDITY_WINDOW,
            genesis_id: suggested.genesis_id,
            genesis_hash: suggested.genesis_hash,
        })
    }

    async fn submit(&self, signed: &SignedTransaction) -> anyhow::Result<String> {
        let response = self
            .client
            .post(self.url("v2/transactions"))
            .header(API_TOKEN_HEADER, &self.token)
            .header(reqwest::header::CONTENT_TYPE, BINARY_CONTENT_TYPE)
            .body(signed.blob.clone())
            .send()
            .await
            .map_err(|e| MintError::Rejected(format!("Ledger node is unreachable: {e}")))?;

        if !response.status().is_success() {
            // e.g. the sender can't pay the fee or the minimum balance
            anyhow::bail!(MintError::Rejected(error_message(response).await));
        }

        let posted: PostTransactionsResponse = response.json().await.context("Malformed ledger response")?;
        Ok(posted.tx_id)
    }

    /// Waits up to `confirmation_rounds` blocks for the transaction
    /// and returns the index of the created asset
    async fn wait_for_confirmation(&self, tx_id: &str) -> anyhow::Result<u64> {
        let status: NodeStatusResponse = self.get_json("v2/status").await?;
        let mut round = status.last_round;

        for _ in 0..self.confirmation_rounds.max(1) {
            let pending: PendingTransactionResponse =
                self.get_json(&format!("v2/transactions/pending/{tx_id}")).await?;

            if pending.confirmed_round.is_some_and(|r| r > 0) {
                return pending
                    .asset_index
                    .ok_or_else(|| MintError::MissingAssetIndex(tx_id.to_string()).into());
            }
            if !pending.pool_error.is_empty() {
                anyhow::bail!(MintError::Rejected(pending.pool_error));
            }

            debug!("Transaction '{tx_id}' is still pending at round {round}");
            let _: NodeStatusResponse = self
                .get_json(&format!("v2/status/wait-for-block-after/{round}"))
                .await?;
            round += 1;
        }

        anyhow::bail!(MintError::NotConfirmed { tx_id: tx_id.to_string(), rounds: self.confirmation_rounds })
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.message)
        .unwrap_or(text)
}

#[async_trait::async_trait]
impl LedgerService for AlgodLedger {
    async fn held_assets(&self, address: &str) -> anyhow::Result<Vec<AssetHolding>> {
        let account: AccountResponse = self.get_json(&format!("v2/accounts/{address}")).await?;

        Ok(account
            .assets
            .into_iter()
            .map(|holding| AssetHolding { asset_id: holding.asset_id, amount: holding.amount })
            .collect())
    }

    async fn asset_info(&self, asset_id: u64) -> anyhow::Result<AssetInfo> {
        let asset: AssetResponse = self.get_json(&format!("v2/assets/{asset_id}")).await?;

        Ok(AssetInfo {
            asset_id: asset.index,
            unit_name: asset.params.unit_name,
            asset_name: asset.params.name,
            url: asset.params.url,
        })
    }

    async fn bind_signer(&self, signer: ArcedSigner) {
        *self.signer.write().await = Some(signer);
    }

    async fn create_asset(&self, params: AssetCreateParams) -> anyhow::Result<CreatedAsset> {
        let Some(signer) = self.signer.read().await.clone() else {
            anyhow::bail!(MintError::SignerMissing);
        };

        let txn = self.unsigned_asset_create(params).await?;
        let signed = signer
            .sign_asset_create(&txn)
            .await
            .map_err(|e| MintError::SigningFailed(format!("{e:#}")))?;

        let tx_id = self.submit(&signed).await?;
        info!("Submitted asset creation '{}' as transaction '{tx_id}'", txn.params.unit_name);

        let asset_id = self.wait_for_confirmation(&tx_id).await?;
        info!("Transaction '{tx_id}' confirmed, created asset {asset_id}");

        Ok(CreatedAsset { asset_id })
    }
}
