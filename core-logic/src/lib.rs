//! # Core Logic - Shared Utilities for Testnet Bots
//!
//! This crate provides the pieces every chain bot in the workspace needs:
//! key loading, proxy loading, logging, typed errors and the task trait.
//!
//! ## Modules
//!
//! - [`config`] - Configuration structures shared by chain crates
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions
//! - [`utils`] - Utility modules (wallet keys, proxies, logger)

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{ChainConfig, ProxyConfig, WalletSource, DEFAULT_KEYS_ENV};
pub use error::{ConfigError, NetworkError, WalletError};
pub use traits::{Task, TaskResult, WalletLoader};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{
    highlight_status, setup_logger, PrivateKey, ProxyManager, WalletManager,
    TASK_RESULT_TARGET,
};
