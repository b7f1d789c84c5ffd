use std::fmt;

use async_trait::async_trait;
use entities::{diary::DiaryAsset, metadata::ContentId, upload::PendingUpload};
use thiserror::Error;

use crate::ledger_service::ArcedSigner;

/// Connected wallet: the account address and the signer it exposes
#[derive(Clone)]
pub struct WalletSession {
    pub address: String,
    pub signer: ArcedSigner,
}

impl WalletSession {
    pub fn new(address: &str, signer: ArcedSigner) -> Self {
        Self { address: address.to_string(), signer }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession").field("address", &self.address).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedMoment {
    pub asset_id: u64,
    pub asset_name: String,
    pub unit_name: String,
    pub reference_url: String,
    pub image_cid: ContentId,
    pub metadata_cid: ContentId,
}

/// Step of the creation workflow a failure happened at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStage {
    Preconditions,
    QuotaCheck,
    ImageUpload,
    MetadataUpload,
    Mint,
}

impl fmt::Display for CreationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreationStage::Preconditions => "preconditions check",
            CreationStage::QuotaCheck => "daily quota check",
            CreationStage::ImageUpload => "image upload to IPFS",
            CreationStage::MetadataUpload => "metadata upload to IPFS",
            CreationStage::Mint => "asset creation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MomentCreationError {
    #[error("Please connect wallet first")]
    WalletNotConnected,
    #[error("Please upload an image first")]
    NoImageSelected,
    #[error("Selected file is not an image: '{0}'")]
    NotAnImage(String),
    #[error("Please describe the moment")]
    EmptyDescription,
    #[error("Description cannot be longer than {0} characters")]
    DescriptionTooLong(usize),
    #[error("You can only upload one moment per day")]
    QuotaExceeded,
    #[error("Error during {stage}: {message}")]
    Upload { stage: CreationStage, message: String },
    #[error("Error during asset creation: {0}")]
    Mint(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Moment creation failed at {stage}: {error}")]
pub struct CreationFailure {
    pub stage: CreationStage,
    pub error: MomentCreationError,
}

impl CreationFailure {
    pub fn new(stage: CreationStage, error: MomentCreationError) -> Self {
        Self { stage, error }
    }
}

/// States of the creation workflow.
/// It only ever moves forward, or to `Failed` from any non terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationState {
    Idle,
    QuotaChecked,
    ImageUploaded { image_cid: ContentId },
    MetadataUploaded { image_cid: ContentId, metadata_cid: ContentId },
    Minted { moment: MintedMoment },
    CacheInvalidated { moment: MintedMoment },
    Failed(CreationFailure),
}

impl CreationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CreationState::CacheInvalidated { .. } | CreationState::Failed(_))
    }
}

#[async_trait]
pub trait MomentService {
    /// Creates today's moment from the pending upload.
    /// The upload is cleared only when the whole workflow succeeded.
    async fn create_moment(
        &self,
        wallet: Option<&WalletSession>,
        upload: &mut PendingUpload,
    ) -> Result<MintedMoment, CreationFailure>;

    /// Moments of the account, served from the session cache when possible
    async fn fetch_moments(&self, address: &str) -> anyhow::Result<Vec<DiaryAsset>>;

    /// Same as [`MomentService::fetch_moments`], but a failure degrades to an empty list
    async fn moments_or_empty(&self, address: &str) -> Vec<DiaryAsset>;

    async fn has_uploaded_today(&self, address: &str) -> bool;

    /// Forgets everything cached for the account
    async fn disconnect(&self, address: &str);
}
