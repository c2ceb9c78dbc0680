use serde::{Deserialize, Serialize};

/// Default environment variable holding the comma-delimited private keys.
pub const DEFAULT_KEYS_ENV: &str = "PRIVATE_KEYS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletSource {
    File { path: String },
    Env { key: String },
}

impl Default for WalletSource {
    fn default() -> Self {
        WalletSource::Env {
            key: DEFAULT_KEYS_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
}
