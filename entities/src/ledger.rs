use serde::{Deserialize, Serialize};

/// One asset held by an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHolding {
    pub asset_id: u64,
    pub amount: u64,
}

/// Descriptive fields of a ledger asset.
/// Any of them may be absent for assets created by other applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub asset_id: u64,
    pub unit_name: Option<String>,
    pub asset_name: Option<String>,
    pub url: Option<String>,
}

/// Parameters of an asset-create transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCreateParams {
    /// Address that pays for and signs the transaction
    pub sender: String,
    pub asset_name: String,
    pub unit_name: String,
    pub url: String,
    pub default_frozen: bool,
    pub total: u64,
    pub decimals: u32,
}

impl AssetCreateParams {
    /// Single, indivisible and frozen by default, as a moment is
    pub fn unique_frozen(sender: &str, asset_name: &str, unit_name: &str, url: &str) -> Self {
        Self {
            sender: sender.to_string(),
            asset_name: asset_name.to_string(),
            unit_name: unit_name.to_string(),
            url: url.to_string(),
            default_frozen: true,
            total: 1,
            decimals: 0,
        }
    }
}

/// Asset-create transaction ready to be signed by the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedAssetCreate {
    pub params: AssetCreateParams,
    /// Flat fee in microalgos
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    /// Base64 encoded genesis hash, as returned by the node
    pub genesis_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx_id: String,
    /// Encoded signed transaction, submitted as is
    pub blob: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedAsset {
    pub asset_id: u64,
}
