use dashmap::DashMap;
use entities::diary::{CachedDiary, DiaryAsset};
use interfaces::session_cache::SessionCache;
use tracing::warn;

/// Process scoped [`SessionCache`].
///
/// Keeps two entries per account, the "fetched" flag and the serialized list,
/// the same way a browser session storage would.
#[derive(Debug, Default)]
pub struct InMemorySessionCache {
    entries: DashMap<String, String>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fetched_key(address: &str) -> String {
    format!("fetched:{address}")
}

fn moments_key(address: &str) -> String {
    format!("moments:{address}")
}

impl SessionCache for InMemorySessionCache {
    fn get(&self, address: &str) -> Option<CachedDiary> {
        let fetched = self
            .entries
            .get(&fetched_key(address))
            .map(|flag| flag.value() == "true")?;

        let raw_assets = self.entries.get(&moments_key(address)).map(|v| v.value().clone());

        let assets = match raw_assets {
            Some(raw) => match serde_json::from_str::<Vec<DiaryAsset>>(&raw) {
                Ok(assets) => assets,
                Err(e) => {
                    warn!("Dropping corrupted cache entry for '{address}': {e}");
                    self.invalidate(address);
                    return None;
                }
            },
            None => Vec::new(),
        };

        Some(CachedDiary { fetched, assets })
    }

    fn put(&self, address: &str, entry: CachedDiary) {
        match serde_json::to_string(&entry.assets) {
            Ok(raw) => {
                self.entries.insert(moments_key(address), raw);
                self.entries.insert(fetched_key(address), entry.fetched.to_string());
            }
            Err(e) => warn!("Failed to cache moments for '{address}': {e}"),
        }
    }

    fn invalidate(&self, address: &str) {
        self.entries.remove(&fetched_key(address));
        self.entries.remove(&moments_key(address));
    }
}
