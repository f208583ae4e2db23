//! # Runtime Configuration
//!
//! One struct per component, each with defaults and validation, loaded from
//! `LD_*` environment variables. Loading fails fast: a variable that is set
//! but malformed is an error, never silently replaced by a default.
//!
//! Secrets are not part of the configuration. The credential section only
//! says where to find them; see [`crate::credentials`].

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use ld_03_distribution::{Allocation, DistributionConfig};
use ld_04_batch_dispatch::{BatchMode, DispatchConfig};
use ld_05_deployment::DeploymentConfig;
use shared_types::{Address, Amount};

/// Sub-wallet id used when `LD_WALLET_ID` is not set.
pub const DEFAULT_WALLET_ID: u32 = 698_983_191;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Target network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(format!("expected testnet or mainnet, got '{other}'")),
        }
    }
}

/// Where operator credentials come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// Mnemonic in `LD_MNEMONIC_TESTNET` / `LD_MNEMONIC_MAINNET`
    #[default]
    Env,
    /// Hex-encoded key in the file named by `LD_SECRET_KEY_FILE`
    File,
}

impl FromStr for CredentialSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "env" => Ok(Self::Env),
            "file" => Ok(Self::File),
            other => Err(format!("expected env or file, got '{other}'")),
        }
    }
}

/// Network and operator wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network: Network,
    /// Address of the operator's wallet program.
    pub wallet_address: Option<Address>,
    /// Sub-wallet id committed into every signed body.
    pub wallet_id: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            wallet_address: None,
            wallet_id: DEFAULT_WALLET_ID,
        }
    }
}

/// Credential lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredentialConfig {
    pub source: CredentialSource,
    /// Required when `source` is [`CredentialSource::File`].
    pub key_file: Option<PathBuf>,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub network: NetworkConfig,
    pub credentials: CredentialConfig,
    pub dispatch: DispatchConfig,
    pub deployment: DeploymentConfig,
    pub distribution: DistributionConfig,
}

impl RuntimeConfig {
    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LD_NETWORK`: testnet | mainnet (default: testnet)
    /// - `LD_WALLET_ADDRESS`: raw `<workchain>:<hex>` operator wallet
    /// - `LD_WALLET_ID`: sub-wallet id (default: 698983191)
    /// - `LD_CREDENTIAL_SOURCE`: env | file (default: env)
    /// - `LD_SECRET_KEY_FILE`: key file path for the file source
    /// - `LD_BATCH_SIZE`: messages per transaction, 1..=255 (default: 255)
    /// - `LD_BATCH_MODE`: strict | best_effort (default: best_effort)
    /// - `LD_GAS_PER_TRANSFER`: nano per message (default: 35000000)
    /// - `LD_INTER_BATCH_DELAY_MS`: pause between batches (default: 1000)
    /// - `LD_POLL_INTERVAL_MS`: deployment check interval (default: 1000)
    /// - `LD_DEPLOY_TIMEOUT_SECS`: deployment wait (default: 30)
    /// - `LD_ALLOCATION`: `<numerator>/<denominator>` (default: 314/100000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("LD_NETWORK") {
            config.network.network =
                value.parse().map_err(|e| ConfigError::invalid("LD_NETWORK", &value, e))?;
        }
        if let Some(value) = lookup("LD_WALLET_ADDRESS") {
            let address = value
                .parse()
                .map_err(|e| ConfigError::invalid("LD_WALLET_ADDRESS", &value, e))?;
            config.network.wallet_address = Some(address);
        }
        if let Some(value) = lookup("LD_WALLET_ID") {
            config.network.wallet_id = parse_number("LD_WALLET_ID", &value)?;
        }

        if let Some(value) = lookup("LD_CREDENTIAL_SOURCE") {
            config.credentials.source = value
                .parse()
                .map_err(|e| ConfigError::invalid("LD_CREDENTIAL_SOURCE", &value, e))?;
        }
        config.credentials.key_file = lookup("LD_SECRET_KEY_FILE").map(PathBuf::from);

        if let Some(value) = lookup("LD_BATCH_SIZE") {
            config.dispatch.batch_size = parse_number("LD_BATCH_SIZE", &value)?;
        }
        if let Some(value) = lookup("LD_BATCH_MODE") {
            config.dispatch.mode = value
                .parse::<BatchMode>()
                .map_err(|e| ConfigError::invalid("LD_BATCH_MODE", &value, e))?;
        }
        if let Some(value) = lookup("LD_GAS_PER_TRANSFER") {
            config.dispatch.gas_per_transfer = parse_number::<Amount>("LD_GAS_PER_TRANSFER", &value)?;
        }
        if let Some(value) = lookup("LD_INTER_BATCH_DELAY_MS") {
            config.dispatch.inter_batch_delay =
                Duration::from_millis(parse_number("LD_INTER_BATCH_DELAY_MS", &value)?);
        }

        if let Some(value) = lookup("LD_POLL_INTERVAL_MS") {
            config.deployment.poll_interval =
                Duration::from_millis(parse_number("LD_POLL_INTERVAL_MS", &value)?);
        }
        if let Some(value) = lookup("LD_DEPLOY_TIMEOUT_SECS") {
            config.deployment.timeout =
                Duration::from_secs(parse_number("LD_DEPLOY_TIMEOUT_SECS", &value)?);
        }

        if let Some(value) = lookup("LD_ALLOCATION") {
            config.distribution.allocation = parse_allocation(&value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every section. Called by [`from_lookup`](Self::from_lookup)
    /// and again when an engine context is created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dispatch.validate().map_err(|e| {
            ConfigError::invalid("LD_BATCH_SIZE", self.dispatch.batch_size.to_string(), e)
        })?;

        if self.deployment.poll_interval.is_zero() {
            return Err(ConfigError::invalid(
                "LD_POLL_INTERVAL_MS",
                "0",
                "poll interval must be positive",
            ));
        }
        if self.deployment.timeout < self.deployment.poll_interval {
            return Err(ConfigError::invalid(
                "LD_DEPLOY_TIMEOUT_SECS",
                self.deployment.timeout.as_secs().to_string(),
                "timeout shorter than one poll interval",
            ));
        }

        let allocation = self.distribution.allocation;
        allocation.validate().map_err(|e| {
            ConfigError::invalid(
                "LD_ALLOCATION",
                format!("{}/{}", allocation.numerator, allocation.denominator),
                e,
            )
        })?;

        if self.credentials.source == CredentialSource::File && self.credentials.key_file.is_none() {
            return Err(ConfigError::Missing("LD_SECRET_KEY_FILE"));
        }

        Ok(())
    }
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(var, value, e))
}

fn parse_allocation(value: &str) -> Result<Allocation, ConfigError> {
    let (numerator, denominator) = value
        .split_once('/')
        .ok_or_else(|| ConfigError::invalid("LD_ALLOCATION", value, "expected <numerator>/<denominator>"))?;
    Ok(Allocation::new(
        parse_number("LD_ALLOCATION", numerator)?,
        parse_number("LD_ALLOCATION", denominator)?,
    ))
}
