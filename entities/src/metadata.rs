use serde::{Deserialize, Serialize};
use std::fmt;

pub const ARC3_STANDARD: &str = "arc3";

/// Value of `properties.assetType` for documents produced by this application
pub const MOMENT_ASSET_TYPE: &str = "timestone-moments";

/// Opaque identifier returned by the object store for stored content
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ContentId(String);

impl ContentId {
    pub fn new<T: Into<String>>(value: T) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataProperties {
    #[serde(rename = "assetType", default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
}

/// ARC-3 metadata document, as written on mint and read back on discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_standard")]
    pub standard: String,
    /// Either a bare content id, an `ipfs://` reference or an absolute URL
    pub image: String,
    #[serde(default)]
    pub image_mime_type: String,
    pub description: String,
    #[serde(default)]
    pub properties: MetadataProperties,
}

fn default_standard() -> String {
    ARC3_STANDARD.to_string()
}

impl MomentMetadata {
    pub fn for_moment(name: &str, image: &ContentId, image_mime_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            standard: ARC3_STANDARD.to_string(),
            image: image.to_string(),
            image_mime_type: image_mime_type.to_string(),
            description: description.to_string(),
            properties: MetadataProperties { asset_type: Some(MOMENT_ASSET_TYPE.to_string()) },
        }
    }

    pub fn asset_type(&self) -> Option<&str> {
        self.properties.asset_type.as_deref()
    }
}

/// Metadata with the image reference normalized to a fetchable URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub image_url: String,
    pub description: String,
    pub asset_type: Option<String>,
}
