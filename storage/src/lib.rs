pub mod ipfs_metadata_resolver;
pub mod pinata_storage;
pub mod session_cache_memory;
