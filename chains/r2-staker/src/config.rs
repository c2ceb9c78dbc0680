use anyhow::Result;
use config::{Config, Environment, File};
use core_logic::{ChainConfig, ConfigError, WalletSource, DEFAULT_KEYS_ENV};
use ethers::types::Address;
use serde::Deserialize;

pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

#[derive(Debug, Deserialize, Clone)]
pub struct StakerConfig {
    pub rpc_url: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    pub r2usd_address: String,
    /// sR2USD vault that receives the stake call
    pub staking_address: String,
    #[serde(default = "default_stake_selector")]
    pub stake_selector: String,
    /// Zero words appended after the amount in the stake call data
    #[serde(default)]
    pub stake_padding_words: usize,
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
    #[serde(default = "default_keys_env")]
    pub private_keys_env: String,
    #[serde(default = "default_proxy_file")]
    pub proxy_file: String,
    #[serde(default)]
    pub use_proxies: bool,
}

fn default_chain_id() -> u64 {
    SEPOLIA_CHAIN_ID
}

fn default_stake_selector() -> String {
    "0x1a5f0f00".to_string()
}

fn default_token_decimals() -> u32 {
    6
}

fn default_confirmations() -> usize {
    1
}

fn default_keys_env() -> String {
    DEFAULT_KEYS_ENV.to_string()
}

fn default_proxy_file() -> String {
    core_logic::ProxyManager::PROXY_FILE.to_string()
}

impl StakerConfig {
    /// Loads `path` (TOML), then applies `R2_*` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("R2"))
            .build()?;

        let config: Self = settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.rpc_url).map_err(|_| ConfigError::InvalidRpcUrl {
            url: self.rpc_url.clone(),
        })?;
        self.r2usd()?;
        self.staking()?;
        self.selector()?;
        if self.token_decimals > 36 {
            return Err(ConfigError::InvalidValue {
                field: "token_decimals".to_string(),
                reason: format!("{} is out of range", self.token_decimals),
            });
        }
        Ok(())
    }

    pub fn r2usd(&self) -> Result<Address, ConfigError> {
        parse_address("r2usd_address", &self.r2usd_address)
    }

    pub fn staking(&self) -> Result<Address, ConfigError> {
        parse_address("staking_address", &self.staking_address)
    }

    pub fn selector(&self) -> Result<[u8; 4], ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "stake_selector".to_string(),
            reason: reason.to_string(),
        };
        let raw = self
            .stake_selector
            .strip_prefix("0x")
            .unwrap_or(&self.stake_selector);
        let bytes = ethers::utils::hex::decode(raw).map_err(|_| invalid("not hex"))?;
        bytes
            .try_into()
            .map_err(|_| invalid("expected exactly 4 bytes"))
    }

    pub fn wallet_source(&self) -> WalletSource {
        WalletSource::Env {
            key: self.private_keys_env.clone(),
        }
    }

    pub fn to_chain_config(&self) -> ChainConfig {
        ChainConfig {
            name: "Sepolia".to_string(),
            rpc_endpoint: self.rpc_url.clone(),
            chain_id: self.chain_id,
        }
    }
}

impl Default for StakerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            r2usd_address: "0x9e8FF356D35a2Da385C546d6Bf1D77ff85133365".to_string(),
            staking_address: "0x006CbF409CA275bA022111dB32BDAE054a97d488".to_string(),
            stake_selector: default_stake_selector(),
            stake_padding_words: 0,
            token_decimals: default_token_decimals(),
            confirmations: default_confirmations(),
            private_keys_env: default_keys_env(),
            proxy_file: default_proxy_file(),
            use_proxies: false,
        }
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("'{}' is not an address", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = StakerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.selector().unwrap(), [0x1a, 0x5f, 0x0f, 0x00]);
        assert_eq!(config.to_chain_config().chain_id, SEPOLIA_CHAIN_ID);
    }

    #[test]
    fn test_bad_selector_rejected() {
        let config = StakerConfig {
            stake_selector: "0x1234".to_string(),
            ..StakerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_bad_rpc_url_rejected() {
        let config = StakerConfig {
            rpc_url: "not a url".to_string(),
            ..StakerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRpcUrl { .. })
        ));
    }

    #[test]
    fn test_load_applies_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "rpc_url = \"http://127.0.0.1:8545\"").unwrap();
        writeln!(
            file,
            "r2usd_address = \"0x9e8FF356D35a2Da385C546d6Bf1D77ff85133365\""
        )
        .unwrap();
        writeln!(
            file,
            "staking_address = \"0x006CbF409CA275bA022111dB32BDAE054a97d488\""
        )
        .unwrap();

        let config = StakerConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.chain_id, SEPOLIA_CHAIN_ID);
        assert_eq!(config.token_decimals, 6);
        assert_eq!(config.private_keys_env, "PRIVATE_KEYS");
        assert!(!config.use_proxies);
    }
}
