//! Subset of the algod v2 REST API payloads we rely on
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    #[serde(default)]
    pub assets: Vec<AssetHoldingDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetHoldingDto {
    pub asset_id: u64,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct AssetResponse {
    pub index: u64,
    pub params: AssetParamsDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetParamsDto {
    pub name: Option<String>,
    pub unit_name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransactionParamsResponse {
    pub genesis_hash: String,
    pub genesis_id: String,
    pub last_round: u64,
    pub min_fee: u64,
}

#[derive(Debug, Deserialize)]
pub struct PostTransactionsResponse {
    #[serde(rename = "txId")]
    pub tx_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PendingTransactionResponse {
    pub confirmed_round: Option<u64>,
    #[serde(default)]
    pub pool_error: String,
    pub asset_index: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NodeStatusResponse {
    pub last_round: u64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
