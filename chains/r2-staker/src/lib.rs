//! # R2 Staker
//!
//! Interactive bot that repeats "stake R2USD" transactions on Sepolia for
//! every configured wallet, one transaction at a time.

pub mod app;
pub mod config;
pub mod menu;
pub mod session;
pub mod task;
pub mod wallet;

pub use app::{run_app, AppExit};
pub use config::StakerConfig;
pub use menu::{Console, DialoguerPrompter, Prompter, StakeRequest};
pub use session::{run_staking, Session, SessionStats};
pub use task::{StakeContext, StakeR2usdTask, StakeTask};
pub use wallet::{initialize_wallets, RpcWalletInitializer, WalletHandle, WalletInitializer};
