use std::sync::Arc;

use algorand_integration::algod_ledger::AlgodLedger;
use interfaces::moment_service::MomentService;
use service::{
    clock::SystemClock,
    discovery::{DiaryAssetDiscovery, ResolutionPolicy},
    moment_service_impl::MomentServiceImpl,
};
use storage::{
    ipfs_metadata_resolver::IpfsGatewayResolver, pinata_storage::PinataStorage,
    session_cache_memory::InMemorySessionCache,
};
use tracing::info;
use util::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub moment_service: Arc<dyn MomentService + Sync + Send>,
}

impl AppState {
    pub fn create_app_state(cfg: &Settings) -> anyhow::Result<AppState> {
        info!("Ledger: {:?}", cfg.ledger);
        info!("Object store: {:?}", cfg.object_store);

        let ledger = Arc::new(AlgodLedger::from_cfg(&cfg.ledger));
        let object_store = Arc::new(PinataStorage::from_cfg(&cfg.object_store)?);
        let metadata_resolver = Arc::new(IpfsGatewayResolver::from_cfg(&cfg.object_store)?);

        let discovery = DiaryAssetDiscovery {
            ledger: ledger.clone(),
            metadata_resolver,
            session_cache: Arc::new(InMemorySessionCache::new()),
            policy: ResolutionPolicy::from_cfg(&cfg.moments),
            max_concurrent_lookups: cfg.moments.max_concurrent_lookups,
        };

        let moment_service = Arc::new(MomentServiceImpl::new(
            object_store,
            ledger,
            discovery,
            Arc::new(SystemClock),
            cfg.moments.bypass_daily_limit,
        ));

        Ok(AppState { moment_service })
    }
}
