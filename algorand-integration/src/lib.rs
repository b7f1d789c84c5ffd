pub mod algod_ledger;
mod algod_types;
