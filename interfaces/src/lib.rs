pub mod clock;
pub mod ledger_service;
pub mod metadata_resolver;
pub mod moment_service;
pub mod object_store;
pub mod session_cache;
