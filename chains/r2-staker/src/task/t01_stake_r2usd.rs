use crate::task::{StakeContext, Task, TaskResult};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::utils::{format_units, parse_units};
use tracing::debug;

const ERC20_ABI: &str = r#"[
    {"type":"function","name":"balanceOf","stateMutability":"view","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"allowance","stateMutability":"view","inputs":[{"name":"owner","type":"address"},{"name":"spender","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
    {"type":"function","name":"approve","stateMutability":"nonpayable","inputs":[{"name":"spender","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]}
]"#;

pub struct StakeR2usdTask;

impl StakeR2usdTask {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StakeR2usdTask {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a human amount to token base units, rounding to `decimals` places.
pub fn amount_to_units(amount: f64, decimals: u32) -> Result<U256> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Amount must be a positive number, got {}", amount);
    }
    let fixed = format!("{:.*}", decimals as usize, amount);
    let units: U256 = parse_units(&fixed, decimals)
        .with_context(|| format!("Cannot convert {} to token units", fixed))?
        .into();
    if units.is_zero() {
        bail!(
            "Amount {} is below the token precision ({} decimals)",
            amount,
            decimals
        );
    }
    Ok(units)
}

/// `selector || uint256(units) || padding_words * 32 zero bytes`
pub fn encode_stake_call(selector: [u8; 4], units: U256, padding_words: usize) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 * (1 + padding_words));
    data.extend_from_slice(&selector);
    let mut word = [0u8; 32];
    units.to_big_endian(&mut word);
    data.extend_from_slice(&word);
    data.resize(data.len() + 32 * padding_words, 0);
    Bytes::from(data)
}

#[async_trait]
impl Task<StakeContext> for StakeR2usdTask {
    fn name(&self) -> &str {
        "01_stakeR2USD"
    }

    async fn run(&self, ctx: StakeContext) -> Result<TaskResult> {
        let client = ctx.wallet.client.clone();
        let address = ctx.wallet.address;
        let config = &ctx.config;
        let decimals = config.token_decimals;

        let r2usd = config.r2usd()?;
        let staking = config.staking()?;
        let units = amount_to_units(ctx.amount, decimals)?;
        let amount_formatted = format_units(units, decimals).unwrap_or_else(|_| units.to_string());

        let abi: abi::Abi = serde_json::from_str(ERC20_ABI)?;
        let token = Contract::new(r2usd, abi, client.clone());

        // 1. Balance Check
        let balance: U256 = token.method("balanceOf", address)?.call().await?;
        if balance < units {
            return Ok(TaskResult {
                success: false,
                message: format!(
                    "Insufficient R2USD: need {}, have {}",
                    amount_formatted,
                    format_units(balance, decimals).unwrap_or_else(|_| balance.to_string())
                ),
                tx_hash: None,
            });
        }

        // 2. Approve the vault if the allowance is short
        let allowance: U256 = token
            .method("allowance", (address, staking))?
            .call()
            .await?;
        if allowance < units {
            debug!("Allowance {} < {}, approving {:?}", allowance, units, staking);
            let approve = token.method::<_, bool>("approve", (staking, units))?;
            let pending = approve.send().await?;
            let receipt = pending
                .confirmations(config.confirmations)
                .await?
                .context("Failed to get approval receipt")?;
            if receipt.status != Some(U64::from(1)) {
                return Ok(TaskResult {
                    success: false,
                    message: format!("Approval of {} R2USD reverted", amount_formatted),
                    tx_hash: Some(format!("{:?}", receipt.transaction_hash)),
                });
            }
        }

        // 3. Stake
        let data = encode_stake_call(config.selector()?, units, config.stake_padding_words);
        let tx = Eip1559TransactionRequest::new()
            .to(staking)
            .data(data)
            .from(address);

        let pending_tx = client.send_transaction(tx, None).await?;
        let receipt = pending_tx
            .confirmations(config.confirmations)
            .await?
            .context("Failed to get transaction receipt")?;

        let success = receipt.status == Some(U64::from(1));
        let message = if success {
            format!("Staked {} R2USD into {:?}", amount_formatted, staking)
        } else {
            format!("Stake of {} R2USD reverted", amount_formatted)
        };

        Ok(TaskResult {
            success,
            message,
            tx_hash: Some(format!("{:?}", receipt.transaction_hash)),
        })
    }
}
