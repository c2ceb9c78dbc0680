use crate::config::StakerConfig;
use crate::menu::Prompter;
use crate::session::Session;
use crate::task::StakeTask;
use crate::wallet::{initialize_wallets, WalletHandle, WalletInitializer};
use colored::*;
use core_logic::{PrivateKey, ProxyConfig, WalletError};
use std::io;
use tracing::{error, info};

const BANNER: &str = r#"
 ____  ____    ____  _        _
|  _ \|___ \  / ___|| |_ __ _| | _____ _ __
| |_) | __) | \___ \| __/ _` | |/ / _ \ '__|
|  _ < / __/   ___) | || (_| |   <  __/ |
|_| \_\_____| |____/ \__\__,_|_|\_\___|_|
"#;

/// How the process should end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppExit {
    Normal,
    NoWallets,
    Failed,
}

impl AppExit {
    pub fn code(self) -> u8 {
        match self {
            AppExit::Normal => 0,
            AppExit::NoWallets | AppExit::Failed => 1,
        }
    }
}

/// Prints the startup summary and builds the wallet list.
/// Zero usable wallets is fatal.
pub async fn bootstrap<P: Prompter>(
    config: &StakerConfig,
    keys: &[PrivateKey],
    proxies: &[ProxyConfig],
    initializer: &dyn WalletInitializer,
    console: &mut P,
) -> io::Result<Result<Vec<WalletHandle>, WalletError>> {
    console.say(&BANNER.red().to_string())?;
    console.say(&format!("{}\n", "          R2USD staking bot - for testnet use only".red()))?;

    console.info(&format!("Loaded {} proxies from {}", proxies.len(), config.proxy_file))?;
    console.info(&format!("Loaded {} private keys", keys.len()))?;
    console.info("USDC/R2USD/sR2USD Bot Starting on Sepolia Testnet...")?;

    let wallets = initialize_wallets(keys, proxies, config.use_proxies, initializer).await;
    for _ in wallets.len()..keys.len() {
        console.error("Wallet initialization failed for a key.")?;
    }

    if wallets.is_empty() {
        info!("No valid wallets initialized. Exiting.");
        console.error("No valid wallets initialized. Exiting.")?;
        return Ok(Err(WalletError::NoWallets));
    }

    info!("{} wallet(s) ready", wallets.len());
    Ok(Ok(wallets))
}

/// Bootstraps, then runs the menu until the user exits.
pub async fn run_app<P: Prompter>(
    config: &StakerConfig,
    keys: &[PrivateKey],
    proxies: &[ProxyConfig],
    initializer: &dyn WalletInitializer,
    task: &StakeTask,
    console: &mut P,
) -> AppExit {
    let wallets = match bootstrap(config, keys, proxies, initializer, console).await {
        Ok(Ok(wallets)) => wallets,
        Ok(Err(_)) => return AppExit::NoWallets,
        Err(e) => {
            error!("An error occurred: {}", e);
            return AppExit::Failed;
        }
    };

    let mut session = Session::new(wallets, task, config.clone());
    match session.run(console).await {
        Ok(_) => AppExit::Normal,
        Err(e) => {
            error!("An error occurred: {:#}", e);
            AppExit::Failed
        }
    }
}
