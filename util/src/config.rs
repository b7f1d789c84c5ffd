//! This module contain application configuration related functionality.
//!
//! All the application configurations should be set in corresponding
//! TOML file in `config` directory.
use config::{Config, ConfigError, Environment, File};

use crate::str_util::{mask_creds, mask_url_passwd};
use serde::Deserialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

const DEFAULT_CONFIG_FILE_PREFIX: &str = "config";
const DEFAULT_CONFIG_FILE_NAME: &str = "default.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EnvProfile {
    Prod,
    Local,
    Dev,
    Test,
}

/// Algorand node (algod) connection
#[derive(Deserialize, Clone)]
pub struct LedgerCfg {
    pub server: String,
    pub port: u16,
    pub token: String,
    /// How many rounds to wait for a submitted transaction to be confirmed
    pub confirmation_rounds: u64,
}

impl fmt::Debug for LedgerCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerCfg")
            .field("server", &mask_url_passwd(&self.server))
            .field("port", &self.port)
            .field("token", &mask_creds(&self.token))
            .field("confirmation_rounds", &self.confirmation_rounds)
            .finish()
    }
}

/// Pinning service and the IPFS gateway content is read back from
#[derive(Deserialize, Clone)]
pub struct ObjectStoreCfg {
    pub api_url: String,
    pub jwt: String,
    pub gateway_url: String,
    pub request_timeout_ms: u64,
}

impl fmt::Debug for ObjectStoreCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreCfg")
            .field("api_url", &self.api_url)
            .field("jwt", &mask_creds(&self.jwt))
            .field("gateway_url", &self.gateway_url)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MomentsCfg {
    /// Disables the one moment per day rule, never allowed in production
    pub bypass_daily_limit: bool,
    /// Skip assets whose metadata can't be resolved instead of failing the whole discovery
    pub skip_unresolvable_assets: bool,
    pub max_concurrent_lookups: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub ledger: LedgerCfg,
    pub object_store: ObjectStoreCfg,
    pub moments: MomentsCfg,
    pub log_level: String,
    pub env: EnvProfile,
}

impl Settings {
    pub fn for_env(env_name: &str) -> Result<Self, ConfigError> {
        Settings::load(Some(env_name), None)
    }

    pub fn from_dir(env_name: &str, config_dir: &str) -> Result<Self, ConfigError> {
        Settings::load(Some(env_name), Some(config_dir))
    }

    /// This method should be used for production.
    /// It loads application configuration based on the environment variables.
    #[allow(clippy::should_implement_trait)]
    pub fn default() -> Result<Self, ConfigError> {
        Settings::load(None, None)
    }

    pub fn is_production_profile(&self) -> bool {
        self.env.eq(&EnvProfile::Prod)
    }

    pub fn is_not_production_profile(&self) -> bool {
        !self.is_production_profile()
    }

    fn load(env_name: Option<&str>, config_path: Option<&str>) -> Result<Self, ConfigError> {
        let configs_path = config_path.map(|s| s.to_string()).unwrap_or(
            std::env::var("RUN_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_FILE_PREFIX.to_string()),
        );

        let env = env_name
            .map(|s| s.to_string())
            .unwrap_or(std::env::var("RUN_ENV").unwrap_or_else(|_| "local".into()));
        println!("Using profile: {}", &env);

        let config_dir = config_dir_path(&configs_path)?;

        let raw_config = Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(File::from(config_dir.join(DEFAULT_CONFIG_FILE_NAME).as_path()))
            // Add in the current environment file, Default to 'local' env
            // Note that this file is _optional_
            .add_source(File::with_name(&config_dir.join(&env).to_string_lossy()).required(false))
            // Add in settings from the environment (with a prefix of APP)
            // Eg.. `APP_OBJECT_STORE__JWT=... ./target/app` would set the `object_store.jwt` key
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("env", env)?
            .build()?;

        let settings: Settings = raw_config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production_profile() && self.moments.bypass_daily_limit {
            return Err(ConfigError::Message(
                "'moments.bypass_daily_limit' cannot be enabled in production".to_string(),
            ));
        }
        if self.moments.max_concurrent_lookups == 0 {
            return Err(ConfigError::Message(
                "'moments.max_concurrent_lookups' should be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn config_dir_path(base_path: &str) -> Result<PathBuf, ConfigError> {
    // Check if the base path is a full path
    let full_path = Path::new(base_path);
    if full_path.is_absolute() || full_path.exists() {
        return Ok(full_path.to_owned());
    }

    let current_dir = std::env::current_dir().map_err(|e| ConfigError::Foreign(Box::new(e)))?;

    let config_dir = current_dir.join(base_path);
    if config_dir.exists() {
        return Ok(config_dir);
    }

    // integration tests and crate binaries run from a workspace member dir
    Ok(current_dir
        .parent()
        .map(|workspace_dir| workspace_dir.join(base_path))
        .unwrap_or(config_dir))
}
