use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::{NetworkError, PrivateKey, ProxyConfig};
use ethers::prelude::*;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

pub type StakeClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// An address plus everything needed to sign and submit from it.
#[derive(Clone, Debug)]
pub struct WalletHandle {
    pub address: Address,
    pub client: Arc<StakeClient>,
}

impl WalletHandle {
    /// Builds the signer and HTTP provider without touching the network.
    pub fn connect(
        key: &PrivateKey,
        rpc_url: &str,
        chain_id: u64,
        proxy_config: Option<&ProxyConfig>,
    ) -> Result<Self> {
        key.validate()?;
        let wallet = key
            .expose()
            .parse::<LocalWallet>()
            .context("Invalid private key")?
            .with_chain_id(chain_id);

        let mut client_builder = Client::builder();
        if let Some(proxy_conf) = proxy_config {
            let mut proxy = reqwest::Proxy::all(&proxy_conf.url)?;
            if let (Some(u), Some(p)) = (&proxy_conf.username, &proxy_conf.password) {
                proxy = proxy.basic_auth(u, p);
            }
            client_builder = client_builder.proxy(proxy);
        }
        let client = client_builder.build()?;

        let provider = Provider::new(Http::new_with_client(
            reqwest::Url::parse(rpc_url).context("Invalid RPC URL")?,
            client,
        ));

        Ok(Self {
            address: wallet.address(),
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
        })
    }
}

#[async_trait]
pub trait WalletInitializer: Send + Sync {
    async fn initialize(
        &self,
        key: &PrivateKey,
        proxy: Option<&ProxyConfig>,
    ) -> Result<WalletHandle>;
}

/// Connects over JSON-RPC and checks the endpoint serves the expected chain.
pub struct RpcWalletInitializer {
    rpc_url: String,
    chain_id: u64,
}

impl RpcWalletInitializer {
    pub fn new(rpc_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id,
        }
    }
}

#[async_trait]
impl WalletInitializer for RpcWalletInitializer {
    async fn initialize(
        &self,
        key: &PrivateKey,
        proxy: Option<&ProxyConfig>,
    ) -> Result<WalletHandle> {
        let handle = WalletHandle::connect(key, &self.rpc_url, self.chain_id, proxy)?;

        let actual = handle
            .client
            .get_chainid()
            .await
            .map_err(|e| NetworkError::ConnectionRefused {
                endpoint: self.rpc_url.clone(),
                reason: e.to_string(),
            })?
            .as_u64();

        if actual != self.chain_id {
            return Err(NetworkError::ChainIdMismatch {
                endpoint: self.rpc_url.clone(),
                expected: self.chain_id,
                actual,
            }
            .into());
        }

        Ok(handle)
    }
}

/// Initializes one handle per key, in key order. Failures are logged and skipped.
///
/// With `use_proxies`, key `i` is pinned to proxy `i % proxies.len()`.
pub async fn initialize_wallets(
    keys: &[PrivateKey],
    proxies: &[ProxyConfig],
    use_proxies: bool,
    initializer: &dyn WalletInitializer,
) -> Vec<WalletHandle> {
    let mut wallets = Vec::with_capacity(keys.len());

    for (i, key) in keys.iter().enumerate() {
        let proxy = if use_proxies && !proxies.is_empty() {
            Some(&proxies[i % proxies.len()])
        } else {
            None
        };

        match initializer.initialize(key, proxy).await {
            Ok(handle) => {
                match proxy {
                    Some(p) => info!("Wallet {:?} initialized via proxy {}", handle.address, p.url),
                    None => info!("Wallet {:?} initialized", handle.address),
                }
                wallets.push(handle);
            }
            Err(e) => {
                info!("Wallet initialization failed for key #{}: {:#}", i + 1, e);
            }
        }
    }

    wallets
}
