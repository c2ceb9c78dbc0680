use crate::config::StakerConfig;
use crate::wallet::WalletHandle;

pub mod t01_stake_r2usd;

pub use self::t01_stake_r2usd::{amount_to_units, encode_stake_call, StakeR2usdTask};

pub use core_logic::traits::{Task, TaskResult};

#[derive(Clone, Debug)]
pub struct StakeContext {
    pub wallet: WalletHandle,
    /// Human amount of R2USD, already validated positive
    pub amount: f64,
    pub config: StakerConfig,
}

// Trait alias
pub type StakeTask = dyn Task<StakeContext> + Send + Sync;
