use crate::config::WalletSource;
use crate::error::WalletError;
use crate::traits::WalletLoader;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A raw private key as supplied by the user. Wiped on drop, never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Checks the key looks like 32 bytes of hex, with or without `0x`.
    pub fn validate(&self) -> Result<(), WalletError> {
        let hex = self.0.strip_prefix("0x").unwrap_or(&self.0);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WalletError::InvalidKeyFormat);
        }
        if hex.len() != 64 {
            return Err(WalletError::InvalidKeyLength { length: hex.len() });
        }
        Ok(())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***REDACTED***)")
    }
}

pub struct WalletManager {
    keys: Vec<PrivateKey>,
}

impl WalletManager {
    /// Reads a comma-delimited key list from the environment variable `var`.
    /// An unset variable yields an empty manager.
    pub fn from_env(var: &str) -> Self {
        match std::env::var(var) {
            Ok(raw) => Self::from_delimited(&raw),
            Err(_) => {
                warn!("{} is not set. No private keys loaded.", var);
                Self { keys: Vec::new() }
            }
        }
    }

    /// Parses `a,b,c` into keys, trimming whitespace and dropping empty entries.
    pub fn from_delimited(raw: &str) -> Self {
        let keys = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(PrivateKey::new)
            .collect();
        Self { keys }
    }

    /// One key per line; blank lines and `#` comments are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file {}", path.display()))?;
        let keys = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(PrivateKey::new)
            .collect::<Vec<_>>();
        info!("Loaded {} keys from {}", keys.len(), path.display());
        Ok(Self { keys })
    }

    pub fn from_source(source: &WalletSource) -> Result<Self> {
        match source {
            WalletSource::Env { key } => Ok(Self::from_env(key)),
            WalletSource::File { path } => Self::from_file(path),
        }
    }

    /// Returns the number of loaded keys
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[PrivateKey] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<PrivateKey> {
        self.keys
    }
}

#[async_trait]
impl WalletLoader for WalletManager {
    type Wallet = PrivateKey;

    async fn load_wallets(&self) -> Result<Vec<Self::Wallet>> {
        Ok(self.keys.clone())
    }
}
