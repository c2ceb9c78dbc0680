use clap::Parser;
use core_logic::{setup_logger, ProxyManager, WalletManager, WalletSource};
use dotenv::dotenv;
use r2_staker::menu::{Console, DialoguerPrompter};
use r2_staker::{run_app, RpcWalletInitializer, StakeR2usdTask, StakerConfig};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chains/r2-staker/config.toml")]
    config: String,
    /// Overrides `proxy_file` from the config
    #[arg(short, long)]
    proxies: Option<String>,
    /// Read keys one per line from this file instead of the environment
    #[arg(short, long)]
    keys_file: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Keep guard alive for file logging
    let _log_guard = setup_logger();
    dotenv().ok();

    let args = Args::parse();
    info!("Loading config from: {}", args.config);

    let mut config = match StakerConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            return ExitCode::from(1);
        }
    };
    if let Some(path) = args.proxies {
        config.proxy_file = path;
    }

    let chain = config.to_chain_config();
    info!(
        "Configuration loaded for {} (chain ID: {}) via {}",
        chain.name, chain.chain_id, chain.rpc_endpoint
    );

    let proxies = match ProxyManager::load_proxies(&config.proxy_file) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to load proxies: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let source = match args.keys_file {
        Some(path) => WalletSource::File { path },
        None => config.wallet_source(),
    };
    let keys = match WalletManager::from_source(&source) {
        Ok(manager) => manager.into_keys(),
        Err(e) => {
            error!("Failed to load private keys: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let initializer = RpcWalletInitializer::new(config.rpc_url.clone(), config.chain_id);
    let task = StakeR2usdTask::new();

    // Arrow-key menus need a terminal; piped input falls back to plain lines
    let outcome = if std::io::stdin().is_terminal() {
        let mut prompter = DialoguerPrompter::new();
        run_app(&config, &keys, &proxies, &initializer, &task, &mut prompter).await
    } else {
        let mut console = Console::stdio();
        run_app(&config, &keys, &proxies, &initializer, &task, &mut console).await
    };
    ExitCode::from(outcome.code())
}
