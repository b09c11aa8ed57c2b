use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use std::time::Duration;

use crate::chain::{ChainClient, TxReceipt};
use crate::contracts::IVMToken;
use crate::core::ChainAddress;
use crate::deploy::gate::wait_for_inclusion;
use crate::error::{ChainError, DeployError, Result};

/// Submit the one-time `setupAllocations` call and wait for inclusion.
///
/// The token contract rejects a second call; that revert is a hard failure here,
/// never retried or suppressed. Beneficiaries are passed in role order.
pub async fn initialize_allocations<C>(
    chain: &C,
    token: Address,
    beneficiaries: &[ChainAddress; 5],
    poll_interval: Duration,
) -> Result<TxReceipt>
where
    C: ChainClient + ?Sized,
{
    let [marketing, development, team, reserve, loyalty] = beneficiaries.map(ChainAddress::address);
    let calldata = IVMToken::setupAllocationsCall {
        marketing,
        development,
        team,
        reserve,
        loyalty,
    }
    .abi_encode();

    let pending = match chain.send_transaction(token, calldata.into()).await {
        Ok(pending) => pending,
        Err(ChainError::Reverted(reason)) => {
            return Err(DeployError::AllocationInitFailed(reason));
        }
        Err(other) => return Err(other.into()),
    };
    tracing::info!("[DEPLOY] setupAllocations sent: {:#x}", pending.hash);

    match wait_for_inclusion(chain, &pending, poll_interval).await? {
        Some(receipt) if receipt.success => Ok(receipt),
        Some(receipt) => Err(DeployError::AllocationInitFailed(format!(
            "setupAllocations {:#x} reverted in block {}",
            pending.hash, receipt.block_number
        ))),
        None => Err(DeployError::AllocationInitFailed(format!(
            "setupAllocations {:#x} was dropped or replaced",
            pending.hash
        ))),
    }
}
