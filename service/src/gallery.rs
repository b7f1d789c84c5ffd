//! Grid and calendar projections of the discovered moments
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use entities::diary::DiaryAsset;

/// Moments newest first. Moments without a valid date go last.
pub fn grid(assets: &[DiaryAsset]) -> Vec<DiaryAsset> {
    let mut sorted = assets.to_vec();
    sorted.sort_by(|a, b| {
        b.date()
            .cmp(&a.date())
            .then_with(|| b.asset_id.cmp(&a.asset_id))
    });
    sorted
}

/// Day to moment index used by the calendar view.
/// Only days with a moment can be selected.
#[derive(Debug, Clone, Default)]
pub struct MomentCalendar {
    by_day: BTreeMap<NaiveDate, DiaryAsset>,
}

impl MomentCalendar {
    pub fn new(assets: &[DiaryAsset]) -> MomentCalendar {
        let mut by_day = BTreeMap::new();
        for asset in assets {
            if let Some(date) = asset.date() {
                // first one wins if the daily limit was bypassed
                by_day.entry(date).or_insert_with(|| asset.clone());
            }
        }
        MomentCalendar { by_day }
    }

    pub fn moment_on(&self, date: NaiveDate) -> Option<&DiaryAsset> {
        self.by_day.get(&date)
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.by_day.contains_key(&date)
    }

    /// Days of the month that have a moment
    pub fn highlighted_days(&self, year: i32, month: u32) -> Vec<u32> {
        self.by_day
            .keys()
            .filter(|date| date.year() == year && date.month() == month)
            .map(|date| date.day())
            .collect()
    }

    /// Most recent day with a moment
    pub fn latest(&self) -> Option<NaiveDate> {
        self.by_day.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.by_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}
