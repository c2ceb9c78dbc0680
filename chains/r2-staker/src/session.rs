use crate::config::StakerConfig;
use crate::menu::{emoji, MenuChoice, Prompter, StakePrompt, StakeRequest};
use crate::task::{amount_to_units, StakeContext, StakeTask};
use crate::wallet::WalletHandle;
use anyhow::Result;
use colored::*;
use core_logic::TASK_RESULT_TARGET;
use ethers::utils::to_checksum;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub success: u64,
    pub failed: u64,
}

impl SessionStats {
    fn absorb(&mut self, other: SessionStats) {
        self.success += other.success;
        self.failed += other.failed;
    }
}

/// Issues `request.count` stake calls per wallet, wallets in list order.
/// A failed call is reported and the loop moves on to the next one.
pub async fn run_staking(
    wallets: &[WalletHandle],
    request: &StakeRequest,
    task: &StakeTask,
    config: &StakerConfig,
) -> SessionStats {
    let mut stats = SessionStats::default();
    let total = request.count;

    for wallet in wallets {
        let address = to_checksum(&wallet.address, None);
        info!(target: TASK_RESULT_TARGET, "Processing wallet: {}", address);

        for i in 1..=total {
            info!(
                target: TASK_RESULT_TARGET,
                "{} Executing staking transaction {} of {} (Amount: {} R2USD)",
                emoji::LOADING,
                i,
                total,
                request.amount
            );

            let ctx = StakeContext {
                wallet: wallet.clone(),
                amount: request.amount,
                config: config.clone(),
            };

            let start_time = Instant::now();
            let outcome = task.run(ctx).await;
            let secs = start_time.elapsed().as_secs_f64();

            match outcome {
                Ok(res) if res.success => {
                    stats.success += 1;
                    let tx = res.tx_hash.as_deref().unwrap_or("-");
                    info!(
                        target: TASK_RESULT_TARGET,
                        "{} Staking transaction {} completed successfully! [{}] {} | tx {} in {:.1}s",
                        emoji::SUCCESS,
                        i,
                        task.name(),
                        res.message,
                        tx,
                        secs
                    );
                }
                Ok(res) => {
                    stats.failed += 1;
                    report_failure(i, &format!("[{}] {} in {:.1}s", task.name(), res.message, secs));
                }
                Err(e) => {
                    stats.failed += 1;
                    let raw_err = format!("{:#}", e).replace('\n', " | ");
                    report_failure(i, &format!("[{}] {} in {:.1}s", task.name(), raw_err, secs));
                }
            }
        }

        info!(
            target: TASK_RESULT_TARGET,
            "{} Completed {} staking transaction(s) for wallet {}.",
            emoji::SUCCESS,
            total,
            address
        );
    }

    stats
}

fn report_failure(i: u32, detail: &str) {
    warn!(
        target: TASK_RESULT_TARGET,
        "{} Staking transaction {} failed. Continuing to next transaction. {}",
        emoji::ERROR,
        i,
        detail
    );
}

enum Flow {
    Continue,
    Exit,
}

pub struct Session<'a> {
    wallets: Vec<WalletHandle>,
    task: &'a StakeTask,
    config: StakerConfig,
    stats: SessionStats,
}

impl<'a> Session<'a> {
    pub fn new(wallets: Vec<WalletHandle>, task: &'a StakeTask, config: StakerConfig) -> Self {
        Self {
            wallets,
            task,
            config,
            stats: SessionStats::default(),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Menu loop. Returns when the user exits or input ends; only console
    /// I/O failures escape as errors.
    pub async fn run<P: Prompter>(&mut self, console: &mut P) -> Result<SessionStats> {
        loop {
            match self.step(console).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.downcast_ref::<std::io::Error>().is_some() => return Err(e),
                Err(e) => {
                    error!("An error occurred during R2USD staking process: {:#}", e);
                    console.error(&format!(
                        "An error occurred during R2USD staking process: {:#}",
                        e
                    ))?;
                }
            }
        }

        console.say(&format!("{} {}", emoji::INFO, "Application exited.".bright_black()))?;
        info!(
            "Session finished: {} succeeded, {} failed",
            self.stats.success, self.stats.failed
        );
        Ok(self.stats)
    }

    async fn step<P: Prompter>(&mut self, console: &mut P) -> Result<Flow> {
        match console.choose()? {
            MenuChoice::Exit => Ok(Flow::Exit),
            MenuChoice::Invalid => {
                console.error("Invalid choice, please try again.")?;
                Ok(Flow::Continue)
            }
            MenuChoice::Stake => self.handle_stake(console).await,
        }
    }

    async fn handle_stake<P: Prompter>(&mut self, console: &mut P) -> Result<Flow> {
        let request = match console.prompt_stake_params()? {
            StakePrompt::Ready(request) => request,
            StakePrompt::Cancelled => return Ok(Flow::Continue),
            StakePrompt::Closed => return Ok(Flow::Exit),
        };

        // Reject amounts the token cannot represent before touching any wallet
        amount_to_units(request.amount, self.config.token_decimals)?;

        let stats = run_staking(&self.wallets, &request, self.task, &self.config).await;
        self.stats.absorb(stats);
        Ok(Flow::Continue)
    }
}
