use async_trait::async_trait;
use entities::metadata::ContentId;
use thiserror::Error;

/// Content addressed storage for images and metadata documents.
/// Every call creates a new durable object; nothing is ever updated or deleted.
#[async_trait]
pub trait ObjectStore {
    async fn store_blob(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> anyhow::Result<ContentId>;
    async fn store_json(&self, document: &serde_json::Value, name: &str) -> anyhow::Result<ContentId>;
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Object store is unreachable: {0}")]
    Unreachable(String),
    #[error("Object store rejected the upload with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Malformed object store response: {0}")]
    MalformedResponse(String),
}
