pub mod diary;
pub mod ledger;
pub mod metadata;
pub mod upload;
