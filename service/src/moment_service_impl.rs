use std::sync::Arc;

use chrono::NaiveDate;
use entities::{
    diary::{asset_name_for, unit_name_for, DiaryAsset},
    ledger::AssetCreateParams,
    metadata::{ContentId, MomentMetadata},
    upload::{ImageBlob, PendingUpload, MAX_DESCRIPTION_CHARS},
};
use futures::lock::Mutex;
use interfaces::{
    clock::Clock,
    ledger_service::LedgerService,
    moment_service::{
        CreationFailure, CreationStage, CreationState, MintedMoment, MomentCreationError, MomentService,
        WalletSession,
    },
    object_store::ObjectStore,
};
use tracing::{error, info, warn};
use util::nft_json::arc3_reference_url;

use crate::{discovery::DiaryAssetDiscovery, quota::has_uploaded_today};

const METADATA_DOCUMENT_NAME: &str = "metadata.json";

#[derive(Clone)]
pub struct MomentServiceImpl {
    pub object_store: Arc<dyn ObjectStore + Sync + Send>,
    pub ledger: Arc<dyn LedgerService + Sync + Send>,
    pub discovery: DiaryAssetDiscovery,
    pub clock: Arc<dyn Clock + Sync + Send>,
    pub bypass_daily_limit: bool,
    /// The ledger holds a single bound signer, so binding and minting
    /// must not interleave between creations
    mint_lock: Arc<Mutex<()>>,
}

/// One run of the creation workflow, advanced step by step
/// with [`MomentServiceImpl::advance`].
#[derive(Debug)]
pub struct MomentCreation {
    wallet: WalletSession,
    image: ImageBlob,
    description: String,
    today: NaiveDate,
    state: CreationState,
}

impl MomentCreation {
    pub fn state(&self) -> &CreationState {
        &self.state
    }

    pub fn address(&self) -> &str {
        &self.wallet.address
    }

    /// Day the moment is minted for
    pub fn today(&self) -> NaiveDate {
        self.today
    }
}

fn failed(stage: CreationStage, error: MomentCreationError) -> CreationState {
    error!("Moment creation failed during {stage}: {error}");
    CreationState::Failed(CreationFailure::new(stage, error))
}

fn upload_failed(stage: CreationStage, e: anyhow::Error) -> CreationState {
    failed(stage, MomentCreationError::Upload { stage, message: format!("{e:#}") })
}

impl MomentServiceImpl {
    pub fn new(
        object_store: Arc<dyn ObjectStore + Sync + Send>,
        ledger: Arc<dyn LedgerService + Sync + Send>,
        discovery: DiaryAssetDiscovery,
        clock: Arc<dyn Clock + Sync + Send>,
        bypass_daily_limit: bool,
    ) -> MomentServiceImpl {
        MomentServiceImpl {
            object_store,
            ledger,
            discovery,
            clock,
            bypass_daily_limit,
            mint_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Validates what the user selected and binds the wallet signer.
    /// Nothing remote is touched when a precondition fails.
    pub async fn start_creation(
        &self,
        wallet: Option<&WalletSession>,
        upload: &PendingUpload,
    ) -> Result<MomentCreation, CreationFailure> {
        let precondition = |e| CreationFailure::new(CreationStage::Preconditions, e);

        let Some(wallet) = wallet else {
            return Err(precondition(MomentCreationError::WalletNotConnected));
        };
        let Some(image) = upload.image() else {
            return Err(precondition(MomentCreationError::NoImageSelected));
        };
        if !image.is_image() {
            return Err(precondition(MomentCreationError::NotAnImage(image.mime_type.clone())));
        }
        let description = upload.description();
        if description.trim().is_empty() {
            return Err(precondition(MomentCreationError::EmptyDescription));
        }
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(precondition(MomentCreationError::DescriptionTooLong(MAX_DESCRIPTION_CHARS)));
        }

        self.ledger.bind_signer(wallet.signer.clone()).await;

        Ok(MomentCreation {
            wallet: wallet.clone(),
            image: image.clone(),
            description: description.to_string(),
            today: self.clock.today(),
            state: CreationState::Idle,
        })
    }

    /// Performs the transition out of the current state.
    /// Terminal states are left as they are.
    pub async fn advance(&self, creation: &mut MomentCreation) {
        let current = std::mem::replace(&mut creation.state, CreationState::Idle);

        let next = match current {
            CreationState::Idle => self.check_quota(creation).await,
            CreationState::QuotaChecked => self.upload_image(creation).await,
            CreationState::ImageUploaded { image_cid } => self.upload_metadata(creation, image_cid).await,
            CreationState::MetadataUploaded { image_cid, metadata_cid } => {
                self.mint(creation, image_cid, metadata_cid).await
            }
            CreationState::Minted { moment } => {
                self.discovery.invalidate(creation.address());
                CreationState::CacheInvalidated { moment }
            }
            terminal => terminal,
        };

        creation.state = next;
    }

    async fn check_quota(&self, creation: &MomentCreation) -> CreationState {
        let assets = self.moments_or_empty(creation.address()).await;

        if has_uploaded_today(&assets, creation.today, self.bypass_daily_limit) {
            return failed(CreationStage::QuotaCheck, MomentCreationError::QuotaExceeded);
        }
        CreationState::QuotaChecked
    }

    async fn upload_image(&self, creation: &MomentCreation) -> CreationState {
        let image = &creation.image;

        match self
            .object_store
            .store_blob(image.bytes.clone(), &image.file_name, &image.mime_type)
            .await
        {
            Ok(image_cid) => CreationState::ImageUploaded { image_cid },
            Err(e) => upload_failed(CreationStage::ImageUpload, e),
        }
    }

    async fn upload_metadata(&self, creation: &MomentCreation, image_cid: ContentId) -> CreationState {
        let metadata = MomentMetadata::for_moment(
            &asset_name_for(creation.today),
            &image_cid,
            &creation.image.mime_type,
            &creation.description,
        );
        let document = match serde_json::to_value(&metadata) {
            Ok(document) => document,
            Err(e) => return upload_failed(CreationStage::MetadataUpload, e.into()),
        };

        match self.object_store.store_json(&document, METADATA_DOCUMENT_NAME).await {
            Ok(metadata_cid) => CreationState::MetadataUploaded { image_cid, metadata_cid },
            Err(e) => upload_failed(CreationStage::MetadataUpload, e),
        }
    }

    async fn mint(&self, creation: &MomentCreation, image_cid: ContentId, metadata_cid: ContentId) -> CreationState {
        let asset_name = asset_name_for(creation.today);
        let unit_name = unit_name_for(creation.today);
        let reference_url = arc3_reference_url(&metadata_cid);

        let params = AssetCreateParams::unique_frozen(creation.address(), &asset_name, &unit_name, &reference_url);

        // a failure leaves the pinned image and metadata orphaned,
        // nothing on the ledger references them
        let minted = {
            let _guard = self.mint_lock.lock().await;
            self.ledger.bind_signer(creation.wallet.signer.clone()).await;
            self.ledger.create_asset(params).await
        };

        match minted {
            Ok(created) => CreationState::Minted {
                moment: MintedMoment {
                    asset_id: created.asset_id,
                    asset_name,
                    unit_name,
                    reference_url,
                    image_cid,
                    metadata_cid,
                },
            },
            Err(e) => failed(CreationStage::Mint, MomentCreationError::Mint(format!("{e:#}"))),
        }
    }
}

#[async_trait::async_trait]
impl MomentService for MomentServiceImpl {
    async fn create_moment(
        &self,
        wallet: Option<&WalletSession>,
        upload: &mut PendingUpload,
    ) -> Result<MintedMoment, CreationFailure> {
        let mut creation = self
            .start_creation(wallet, upload)
            .await
            .inspect_err(|failure| warn!("{failure}"))?;

        loop {
            match creation.state() {
                CreationState::CacheInvalidated { moment } => {
                    info!("Successfully created moment with asset ID {}", moment.asset_id);
                    let moment = moment.clone();
                    upload.clear();
                    return Ok(moment);
                }
                CreationState::Failed(failure) => return Err(failure.clone()),
                _ => self.advance(&mut creation).await,
            }
        }
    }

    async fn fetch_moments(&self, address: &str) -> anyhow::Result<Vec<DiaryAsset>> {
        self.discovery.load(address).await
    }

    async fn moments_or_empty(&self, address: &str) -> Vec<DiaryAsset> {
        self.fetch_moments(address).await.unwrap_or_else(|e| {
            warn!("Failed to load moments for '{address}', showing none: {e:#}");
            Vec::new()
        })
    }

    async fn has_uploaded_today(&self, address: &str) -> bool {
        let assets = self.moments_or_empty(address).await;
        has_uploaded_today(&assets, self.clock.today(), self.bypass_daily_limit)
    }

    async fn disconnect(&self, address: &str) {
        self.discovery.invalidate(address);
        info!("Wallet '{address}' disconnected, cached moments dropped");
    }
}
