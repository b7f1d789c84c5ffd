use entities::metadata::{ContentId, MomentMetadata, ResolvedMetadata};
use thiserror::Error;
use url::Url;

pub const IPFS_SCHEME: &str = "ipfs://";
pub const ARC3_SUFFIX: &str = "#arc3";

/// Reference left by mints whose metadata upload silently failed
pub const UNDEFINED_REFERENCE: &str = "ipfs://undefined/#arc3";

const UNDEFINED_CID: &str = "undefined";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JsonMetadataError {
    #[error("Metadata contains no image")]
    NoImage,
    #[error("Malformed metadata JSON: {0}")]
    Malformed(String),
    #[error("Reference '{0}' does not point to any content")]
    UnresolvableReference(String),
}

/// Builds the ARC-3 asset URL for a metadata document: `ipfs://<cid>/#arc3`
pub fn arc3_reference_url(metadata_cid: &ContentId) -> String {
    format!("{IPFS_SCHEME}{metadata_cid}/{ARC3_SUFFIX}")
}

/// Whether an asset URL can point to a metadata document at all
pub fn is_resolvable_reference(reference_url: &str) -> bool {
    !reference_url.trim().is_empty() && reference_url != UNDEFINED_REFERENCE
}

/// Location of the metadata document an asset URL points to.
///
/// `ipfs://` references are served through the gateway, with the ARC-3
/// fragment and trailing slash dropped. Absolute HTTP(S) URLs are used as is.
pub fn metadata_location(gateway: &str, reference_url: &str) -> Result<String, JsonMetadataError> {
    let unresolvable = || JsonMetadataError::UnresolvableReference(reference_url.to_string());

    if !is_resolvable_reference(reference_url) {
        return Err(unresolvable());
    }

    let without_fragment = reference_url.split('#').next().unwrap_or_default();

    if let Some(path) = without_fragment.strip_prefix(IPFS_SCHEME) {
        let path = path.trim_end_matches('/');
        if path.is_empty() || path == UNDEFINED_CID {
            return Err(unresolvable());
        }
        return Ok(gateway_url(gateway, path));
    }

    if is_http_url(without_fragment) {
        return Ok(without_fragment.to_string());
    }

    Err(unresolvable())
}

/// Resolves the `image` field of a metadata document to a fetchable URL.
///
/// The field may hold an `ipfs://` reference, a bare content id, or an absolute
/// URL. The first two end up behind the same gateway URL.
pub fn image_url(gateway: &str, image: &str) -> String {
    if let Some(path) = image.strip_prefix(IPFS_SCHEME) {
        gateway_url(gateway, path)
    } else if is_http_url(image) {
        image.to_string()
    } else {
        gateway_url(gateway, image)
    }
}

pub fn gateway_url(gateway: &str, path: &str) -> String {
    format!("{}/{}", gateway.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Parses and validates a metadata JSON document
pub fn parse_metadata(json_metadata: &str) -> Result<MomentMetadata, JsonMetadataError> {
    let metadata: MomentMetadata =
        serde_json::from_str(json_metadata).map_err(|e| JsonMetadataError::Malformed(e.to_string()))?;

    if metadata.image.trim().is_empty() {
        return Err(JsonMetadataError::NoImage);
    }

    Ok(metadata)
}

/// Normalizes a parsed document, resolving its image through the gateway
pub fn resolve_metadata(gateway: &str, metadata: MomentMetadata) -> ResolvedMetadata {
    ResolvedMetadata {
        image_url: image_url(gateway, &metadata.image),
        description: metadata.description,
        asset_type: metadata.properties.asset_type,
    }
}

fn is_http_url(s: &str) -> bool {
    Url::parse(s)
        .map(|url| url.scheme() == "http" || url.scheme() == "https")
        .unwrap_or(false)
}
