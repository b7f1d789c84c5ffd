//! In-memory stand-ins for the remote collaborators
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Mutex,
    },
};

use chrono::NaiveDate;
use entities::{
    ledger::{AssetCreateParams, AssetHolding, AssetInfo, CreatedAsset, SignedTransaction, UnsignedAssetCreate},
    metadata::{ContentId, ResolvedMetadata},
};
use interfaces::{
    clock::Clock,
    ledger_service::{ArcedSigner, LedgerService, MintError, TransactionSigner},
    metadata_resolver::{MetadataResolver, ResolutionError},
    object_store::{ObjectStore, UploadError},
};
use util::nft_json::{metadata_location, parse_metadata, resolve_metadata};

pub const FAKE_GATEWAY: &str = "https://gateway.test/ipfs";

const FIRST_ASSET_ID: u64 = 1000;

/// Object store keeping everything in memory.
/// It also resolves the metadata it stores, as a gateway in front of it would.
#[derive(Default)]
pub struct InMemoryObjectStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    documents: Mutex<HashMap<String, serde_json::Value>>,
    next_id: AtomicU64,
    pub fail_blobs: AtomicBool,
    pub fail_documents: AtomicBool,
    pub blob_calls: AtomicUsize,
    pub document_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,
}

impl InMemoryObjectStore {
    pub fn put_document(&self, cid: &str, document: serde_json::Value) {
        self.documents.lock().unwrap().insert(cid.to_string(), document);
    }

    pub fn document(&self, cid: &ContentId) -> Option<serde_json::Value> {
        self.documents.lock().unwrap().get(cid.as_str()).cloned()
    }

    pub fn blob(&self, cid: &ContentId) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(cid.as_str()).cloned()
    }

    /// Number of calls that reached the store, successful or not
    pub fn upload_calls(&self) -> usize {
        self.blob_calls.load(Ordering::SeqCst) + self.document_calls.load(Ordering::SeqCst)
    }

    fn next_cid(&self, kind: &str) -> String {
        format!("Qm{kind}{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn store_blob(&self, bytes: Vec<u8>, _file_name: &str, _mime: &str) -> anyhow::Result<ContentId> {
        self.blob_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_blobs.load(Ordering::SeqCst) {
            anyhow::bail!(UploadError::Rejected { status: 401, body: "Invalid JWT".to_string() });
        }

        let cid = self.next_cid("Image");
        self.blobs.lock().unwrap().insert(cid.clone(), bytes);
        Ok(ContentId::new(cid))
    }

    async fn store_json(&self, document: &serde_json::Value, _name: &str) -> anyhow::Result<ContentId> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_documents.load(Ordering::SeqCst) {
            anyhow::bail!(UploadError::Unreachable("connection reset".to_string()));
        }

        let cid = self.next_cid("Meta");
        self.put_document(&cid, document.clone());
        Ok(ContentId::new(cid))
    }
}

#[async_trait::async_trait]
impl MetadataResolver for InMemoryObjectStore {
    async fn resolve(&self, reference_url: &str) -> anyhow::Result<ResolvedMetadata> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);

        let url = metadata_location(FAKE_GATEWAY, reference_url)
            .map_err(|_| ResolutionError::UnresolvableReference(reference_url.to_string()))?;
        let cid = url.trim_start_matches(FAKE_GATEWAY).trim_start_matches('/');

        let Some(document) = self.documents.lock().unwrap().get(cid).cloned() else {
            anyhow::bail!(ResolutionError::Status { url, status: 404 });
        };

        let metadata = parse_metadata(&document.to_string())
            .map_err(|e| ResolutionError::Malformed { url, message: e.to_string() })?;

        Ok(resolve_metadata(FAKE_GATEWAY, metadata))
    }
}

/// Ledger keeping accounts and assets in memory.
/// Created assets are added to the sender's holdings.
pub struct InMemoryLedger {
    holdings: Mutex<HashMap<String, Vec<u64>>>,
    assets: Mutex<HashMap<u64, AssetInfo>>,
    signer: Mutex<Option<ArcedSigner>>,
    next_asset_id: AtomicU64,
    pub fail_holdings: AtomicBool,
    /// Message the ledger rejects asset creation with
    pub reject_mints: Mutex<Option<String>>,
    pub holdings_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        InMemoryLedger {
            holdings: Mutex::new(HashMap::new()),
            assets: Mutex::new(HashMap::new()),
            signer: Mutex::new(None),
            next_asset_id: AtomicU64::new(FIRST_ASSET_ID),
            fail_holdings: AtomicBool::new(false),
            reject_mints: Mutex::new(None),
            holdings_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }
}

impl InMemoryLedger {
    /// Registers an asset and makes `owner` hold it
    pub fn add_asset(&self, owner: &str, asset: AssetInfo) {
        self.holdings
            .lock()
            .unwrap()
            .entry(owner.to_string())
            .or_default()
            .push(asset.asset_id);
        self.assets.lock().unwrap().insert(asset.asset_id, asset);
    }

    pub fn held_by(&self, owner: &str) -> Vec<u64> {
        self.holdings.lock().unwrap().get(owner).cloned().unwrap_or_default()
    }

    pub fn asset(&self, asset_id: u64) -> Option<AssetInfo> {
        self.assets.lock().unwrap().get(&asset_id).cloned()
    }

    pub fn has_signer(&self) -> bool {
        self.signer.lock().unwrap().is_some()
    }

    /// Remote calls made so far, signer binding excluded
    pub fn remote_calls(&self) -> usize {
        self.holdings_calls.load(Ordering::SeqCst) + self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LedgerService for InMemoryLedger {
    async fn held_assets(&self, address: &str) -> anyhow::Result<Vec<AssetHolding>> {
        self.holdings_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_holdings.load(Ordering::SeqCst) {
            anyhow::bail!("Ledger node is unreachable");
        }

        Ok(self
            .held_by(address)
            .into_iter()
            .map(|asset_id| AssetHolding { asset_id, amount: 1 })
            .collect())
    }

    async fn asset_info(&self, asset_id: u64) -> anyhow::Result<AssetInfo> {
        self.asset(asset_id)
            .ok_or_else(|| anyhow::anyhow!("Ledger node responded with status 404: asset does not exist"))
    }

    async fn bind_signer(&self, signer: ArcedSigner) {
        *self.signer.lock().unwrap() = Some(signer);
    }

    async fn create_asset(&self, params: AssetCreateParams) -> anyhow::Result<CreatedAsset> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let Some(signer) = self.signer.lock().unwrap().clone() else {
            anyhow::bail!(MintError::SignerMissing);
        };

        let txn = UnsignedAssetCreate {
            params,
            fee: 1000,
            first_valid: 1,
            last_valid: 1001,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=".to_string(),
        };
        signer
            .sign_asset_create(&txn)
            .await
            .map_err(|e| MintError::SigningFailed(format!("{e:#}")))?;

        if let Some(message) = self.reject_mints.lock().unwrap().clone() {
            anyhow::bail!(MintError::Rejected(message));
        }

        let asset_id = self.next_asset_id.fetch_add(1, Ordering::SeqCst);
        let params = txn.params;
        self.add_asset(
            &params.sender,
            AssetInfo {
                asset_id,
                unit_name: Some(params.unit_name),
                asset_name: Some(params.asset_name),
                url: Some(params.url),
            },
        );

        Ok(CreatedAsset { asset_id })
    }
}

/// Wallet signer that signs everything, unless told to refuse
#[derive(Default)]
pub struct FakeSigner {
    pub refuse: AtomicBool,
    signed: Mutex<Vec<UnsignedAssetCreate>>,
}

impl FakeSigner {
    pub fn signed(&self) -> Vec<UnsignedAssetCreate> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TransactionSigner for FakeSigner {
    async fn sign_asset_create(&self, txn: &UnsignedAssetCreate) -> anyhow::Result<SignedTransaction> {
        if self.refuse.load(Ordering::SeqCst) {
            anyhow::bail!("User rejected the request");
        }

        let mut signed = self.signed.lock().unwrap();
        signed.push(txn.clone());

        Ok(SignedTransaction {
            tx_id: format!("TX{}", signed.len()),
            blob: serde_json::to_vec(txn)?,
        })
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
