pub mod config;
pub mod nft_json;
pub mod str_util;
