//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod wallet_manager;

// Selective exports - only public utilities
pub use logger::{highlight_status, setup_logger, TASK_RESULT_TARGET};
pub use proxy_manager::ProxyManager;
pub use wallet_manager::{PrivateKey, WalletManager};
