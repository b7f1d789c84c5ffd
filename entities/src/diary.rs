use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Unit name prefix that marks an asset as a diary moment.
pub const UNIT_NAME_PREFIX: &str = "pd";

/// Format of the asset name, which is also the moment's date.
pub const ASSET_NAME_DATE_FORMAT: &str = "%Y-%m-%d";

/// Compact date format appended to [`UNIT_NAME_PREFIX`].
pub const UNIT_NAME_DATE_FORMAT: &str = "%y%m%d";

pub const INVALID_DATE_LABEL: &str = "Invalid date";

/// Represents one minted moment, as reconstructed from the ledger
/// and the off-chain metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryAsset {
    /// Ledger asset ID
    pub asset_id: u64,

    /// Always starts with [`UNIT_NAME_PREFIX`]
    pub unit_name: String,

    /// Creation date in `yyyy-MM-dd` form. It's the source of truth
    /// for the moment date, not the mint timestamp.
    pub asset_name: String,

    pub description: String,

    /// HTTP(S) URL of the image, resolved through the gateway
    pub image_url: String,

    /// Tag from the metadata `properties.assetType`
    pub asset_type: String,
}

impl DiaryAsset {
    /// Calendar date of the moment.
    /// `None` means the asset name is not a date; such assets are kept
    /// and rendered as [`INVALID_DATE_LABEL`].
    pub fn date(&self) -> Option<NaiveDate> {
        parse_moment_date(&self.asset_name)
    }

    pub fn date_label(&self) -> String {
        self.date()
            .map(|d| d.format(ASSET_NAME_DATE_FORMAT).to_string())
            .unwrap_or_else(|| INVALID_DATE_LABEL.to_string())
    }
}

/// Parses an asset name into a date.
///
/// Plain `yyyy-MM-dd` is the expected shape, but full RFC 3339 timestamps
/// are accepted too and truncated to the UTC day.
pub fn parse_moment_date(asset_name: &str) -> Option<NaiveDate> {
    let trimmed = asset_name.trim();
    NaiveDate::parse_from_str(trimmed, ASSET_NAME_DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.naive_utc().date())
        })
}

/// Asset name for a moment created on `date`, e.g. `2025-06-15`
pub fn asset_name_for(date: NaiveDate) -> String {
    date.format(ASSET_NAME_DATE_FORMAT).to_string()
}

/// Unit name for a moment created on `date`, e.g. `pd250615`
pub fn unit_name_for(date: NaiveDate) -> String {
    format!("{UNIT_NAME_PREFIX}{}", date.format(UNIT_NAME_DATE_FORMAT))
}

/// Session cached result of a discovery for one account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedDiary {
    pub fetched: bool,
    pub assets: Vec<DiaryAsset>,
}

impl CachedDiary {
    pub fn fetched(assets: Vec<DiaryAsset>) -> Self {
        Self { fetched: true, assets }
    }
}
