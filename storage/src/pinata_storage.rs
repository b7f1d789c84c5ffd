use std::time::Duration;

use anyhow::Context;
use entities::metadata::ContentId;
use interfaces::object_store::{ObjectStore, UploadError};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use util::config::ObjectStoreCfg;

const PIN_FILE_PATH: &str = "pinning/pinFileToIPFS";
const PIN_JSON_PATH: &str = "pinning/pinJSONToIPFS";

/// [`ObjectStore`] backed by the Pinata pinning API
#[derive(Clone, Debug)]
pub struct PinataStorage {
    client: reqwest::Client,
    api_url: String,
    jwt: String,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: Option<String>,
}

#[derive(Debug, Serialize)]
struct PinataMetadata<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PinJsonRequest<'a> {
    pinata_content: &'a serde_json::Value,
    pinata_metadata: PinataMetadata<'a>,
}

impl PinataStorage {
    pub fn new(api_url: &str, jwt: &str, client: reqwest::Client) -> PinataStorage {
        PinataStorage {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            jwt: jwt.to_string(),
        }
    }

    pub fn from_cfg(cfg: &ObjectStoreCfg) -> anyhow::Result<PinataStorage> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .context("Failed to build HTTP client for the pinning service")?;

        Ok(PinataStorage::new(&cfg.api_url, &cfg.jwt, client))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    async fn read_pin_response(response: reqwest::Response) -> anyhow::Result<ContentId> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(UploadError::Rejected { status: status.as_u16(), body });
        }

        let pin: PinResponse = response
            .json()
            .await
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

        match pin.ipfs_hash.filter(|hash| !hash.is_empty()) {
            Some(hash) => Ok(ContentId::new(hash)),
            None => anyhow::bail!(UploadError::MalformedResponse("no 'IpfsHash' in response".to_string())),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for PinataStorage {
    async fn store_blob(&self, bytes: Vec<u8>, file_name: &str, mime: &str) -> anyhow::Result<ContentId> {
        debug!("Pinning file '{file_name}' ({} bytes, {mime})", bytes.len());

        let file_part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .with_context(|| format!("Invalid MIME type '{mime}'"))?;
        let pinata_metadata = serde_json::to_string(&PinataMetadata { name: file_name })?;

        let form = Form::new()
            .part("file", file_part)
            .text("pinataMetadata", pinata_metadata);

        let response = self
            .client
            .post(self.endpoint(PIN_FILE_PATH))
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Unreachable(e.to_string()))?;

        let cid = Self::read_pin_response(response).await?;
        info!("Pinned file '{file_name}' as '{cid}'");
        Ok(cid)
    }

    async fn store_json(&self, document: &serde_json::Value, name: &str) -> anyhow::Result<ContentId> {
        let request = PinJsonRequest { pinata_content: document, pinata_metadata: PinataMetadata { name } };

        let response = self
            .client
            .post(self.endpoint(PIN_JSON_PATH))
            .bearer_auth(&self.jwt)
            .json(&request)
            .send()
            .await
            .map_err(|e| UploadError::Unreachable(e.to_string()))?;

        let cid = Self::read_pin_response(response).await?;
        info!("Pinned JSON document '{name}' as '{cid}'");
        Ok(cid)
    }
}
