use chrono::NaiveDate;
use entities::diary::DiaryAsset;
use tracing::debug;

/// One moment per calendar day rule.
///
/// Dates are compared at day granularity in UTC. This is advisory only:
/// nothing stops another client from minting for the same day.
pub fn has_uploaded_today(assets: &[DiaryAsset], today: NaiveDate, bypass: bool) -> bool {
    if bypass {
        debug!("Daily upload limit is bypassed");
        return false;
    }

    assets.iter().any(|asset| asset.date() == Some(today))
}
