use entities::diary::CachedDiary;

/// Session scoped memo of discovered moments, keyed by account address.
/// Last writer wins; there is no coordination between processes.
pub trait SessionCache {
    fn get(&self, address: &str) -> Option<CachedDiary>;
    fn put(&self, address: &str, entry: CachedDiary);
    fn invalidate(&self, address: &str);
}
