use std::sync::Arc;

use entities::{
    diary::{CachedDiary, DiaryAsset, UNIT_NAME_PREFIX},
    metadata::MOMENT_ASSET_TYPE,
};
use futures::future::try_join_all;
use interfaces::{ledger_service::LedgerService, metadata_resolver::MetadataResolver, session_cache::SessionCache};
use tracing::{debug, info, warn};
use util::{config::MomentsCfg, nft_json::is_resolvable_reference};

/// What to do with a held asset whose ledger info or metadata can't be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPolicy {
    /// Fail the whole discovery
    Abort,
    /// Log it and leave it out of the result
    Skip,
}

impl ResolutionPolicy {
    pub fn from_cfg(cfg: &MomentsCfg) -> ResolutionPolicy {
        if cfg.skip_unresolvable_assets {
            ResolutionPolicy::Skip
        } else {
            ResolutionPolicy::Abort
        }
    }
}

/// Rebuilds the list of diary moments of an account from the ledger and the object store
#[derive(Clone)]
pub struct DiaryAssetDiscovery {
    pub ledger: Arc<dyn LedgerService + Sync + Send>,
    pub metadata_resolver: Arc<dyn MetadataResolver + Sync + Send>,
    pub session_cache: Arc<dyn SessionCache + Sync + Send>,
    pub policy: ResolutionPolicy,
    pub max_concurrent_lookups: usize,
}

impl DiaryAssetDiscovery {
    /// Scans every asset held by the account.
    /// The result keeps the order the ledger lists holdings in.
    pub async fn discover(&self, address: &str) -> anyhow::Result<Vec<DiaryAsset>> {
        let holdings = self.ledger.held_assets(address).await?;
        debug!("Account '{address}' holds {} assets", holdings.len());

        // `try_join_all` keeps input order, whatever order lookups complete in
        let mut assets = Vec::with_capacity(holdings.len());
        for batch in holdings.chunks(self.max_concurrent_lookups.max(1)) {
            let inspected = try_join_all(batch.iter().map(|holding| self.inspect(holding.asset_id))).await?;
            assets.extend(inspected.into_iter().flatten());
        }
        info!("Discovered {} moments for '{address}'", assets.len());

        Ok(assets)
    }

    /// Cached [`DiaryAssetDiscovery::discover`]
    pub async fn load(&self, address: &str) -> anyhow::Result<Vec<DiaryAsset>> {
        if let Some(entry) = self.session_cache.get(address).filter(|entry| entry.fetched) {
            debug!("Serving {} cached moments for '{address}'", entry.assets.len());
            return Ok(entry.assets);
        }

        let assets = self.discover(address).await?;
        self.session_cache.put(address, CachedDiary::fetched(assets.clone()));

        Ok(assets)
    }

    pub fn invalidate(&self, address: &str) {
        self.session_cache.invalidate(address);
    }

    async fn inspect(&self, asset_id: u64) -> anyhow::Result<Option<DiaryAsset>> {
        match self.try_inspect(asset_id).await {
            Ok(asset) => Ok(asset),
            Err(e) if self.policy == ResolutionPolicy::Skip => {
                warn!("Skipping asset {asset_id}: {e:#}");
                Ok(None)
            }
            Err(e) => Err(e.context(format!("Failed to inspect asset {asset_id}"))),
        }
    }

    async fn try_inspect(&self, asset_id: u64) -> anyhow::Result<Option<DiaryAsset>> {
        let info = self.ledger.asset_info(asset_id).await?;

        let (Some(unit_name), Some(url)) = (info.unit_name, info.url) else {
            debug!("Asset {asset_id} has no unit name or URL");
            return Ok(None);
        };
        if !is_resolvable_reference(&url) {
            debug!("Asset {asset_id} references no metadata: '{url}'");
            return Ok(None);
        }
        if !unit_name.starts_with(UNIT_NAME_PREFIX) {
            return Ok(None);
        }

        let metadata = self.metadata_resolver.resolve(&url).await?;
        if metadata.asset_type.as_deref() != Some(MOMENT_ASSET_TYPE) {
            debug!("Asset {asset_id} metadata has asset type {:?}", metadata.asset_type);
            return Ok(None);
        }

        Ok(Some(DiaryAsset {
            asset_id: info.asset_id,
            unit_name,
            asset_name: info.asset_name.unwrap_or_default(),
            description: metadata.description,
            image_url: metadata.image_url,
            asset_type: MOMENT_ASSET_TYPE.to_string(),
        }))
    }
}
