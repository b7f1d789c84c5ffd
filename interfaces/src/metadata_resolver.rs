use async_trait::async_trait;
use entities::metadata::ResolvedMetadata;
use thiserror::Error;

#[async_trait]
pub trait MetadataResolver {
    /// Fetches the metadata document an asset's reference URL points to
    /// and resolves the image it references to a fetchable URL.
    /// ## Args:
    /// * `reference_url` - asset URL, e.g. `ipfs://<cid>/#arc3`
    async fn resolve(&self, reference_url: &str) -> anyhow::Result<ResolvedMetadata>;
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Reference URL '{0}' does not point to any content")]
    UnresolvableReference(String),
    #[error("Failed to fetch metadata from '{url}': {message}")]
    Fetch { url: String, message: String },
    #[error("Gateway responded to '{url}' with status {status}")]
    Status { url: String, status: u16 },
    #[error("Malformed metadata document at '{url}': {message}")]
    Malformed { url: String, message: String },
}
