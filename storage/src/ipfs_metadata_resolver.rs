use std::time::Duration;

use anyhow::Context;
use entities::metadata::ResolvedMetadata;
use interfaces::metadata_resolver::{MetadataResolver, ResolutionError};
use tracing::debug;
use util::{
    config::ObjectStoreCfg,
    nft_json::{metadata_location, parse_metadata, resolve_metadata},
};

/// Reads metadata documents back through a public IPFS gateway
#[derive(Clone, Debug)]
pub struct IpfsGatewayResolver {
    client: reqwest::Client,
    gateway_url: String,
}

impl IpfsGatewayResolver {
    pub fn new(gateway_url: &str, client: reqwest::Client) -> IpfsGatewayResolver {
        IpfsGatewayResolver { client, gateway_url: gateway_url.to_string() }
    }

    pub fn from_cfg(cfg: &ObjectStoreCfg) -> anyhow::Result<IpfsGatewayResolver> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .context("Failed to build HTTP client for the IPFS gateway")?;

        Ok(IpfsGatewayResolver::new(&cfg.gateway_url, client))
    }
}

#[async_trait::async_trait]
impl MetadataResolver for IpfsGatewayResolver {
    async fn resolve(&self, reference_url: &str) -> anyhow::Result<ResolvedMetadata> {
        let url = metadata_location(&self.gateway_url, reference_url)
            .map_err(|_| ResolutionError::UnresolvableReference(reference_url.to_string()))?;

        debug!("Fetching metadata for '{reference_url}' from '{url}'");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolutionError::Fetch { url: url.clone(), message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!(ResolutionError::Status { url, status: status.as_u16() });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ResolutionError::Fetch { url: url.clone(), message: e.to_string() })?;

        let metadata =
            parse_metadata(&text).map_err(|e| ResolutionError::Malformed { url, message: e.to_string() })?;

        Ok(resolve_metadata(&self.gateway_url, metadata))
    }
}
