use chrono::NaiveDate;

/// Source of "today", in the UTC reference zone moments are dated in
pub trait Clock {
    fn today(&self) -> NaiveDate;
}
