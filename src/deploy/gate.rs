use std::time::Duration;

use crate::chain::{ChainClient, PendingTx, TxReceipt};
use crate::core::ConfirmationRequirement;
use crate::error::{DeployError, Result};

/// Consecutive polls with neither a receipt nor a node-side record before a
/// transaction counts as dropped. Load-balanced endpoints can briefly miss a
/// freshly broadcast transaction.
const DROPPED_AFTER_MISSES: u32 = 3;

enum GateOutcome {
    Final(TxReceipt),
    Reverted(TxReceipt),
    Dropped,
}

async fn poll_until_depth<C>(
    chain: &C,
    pending: &PendingTx,
    requirement: ConfirmationRequirement,
    poll_interval: Duration,
) -> Result<GateOutcome>
where
    C: ChainClient + ?Sized,
{
    let mut last_reported = 0u64;
    let mut misses = 0u32;
    loop {
        match chain.transaction_receipt(pending.hash).await? {
            Some(receipt) if !receipt.success => return Ok(GateOutcome::Reverted(receipt)),
            Some(receipt) => {
                misses = 0;
                let head = chain.block_number().await?;
                let confirmations = head
                    .saturating_add(1)
                    .saturating_sub(receipt.block_number);
                if confirmations >= requirement.get() {
                    return Ok(GateOutcome::Final(receipt));
                }
                if confirmations != last_reported {
                    tracing::debug!(
                        "[GATE] {:#x} at {}/{} confirmations (block={} head={})",
                        pending.hash,
                        confirmations,
                        requirement.get(),
                        receipt.block_number,
                        head
                    );
                    last_reported = confirmations;
                }
            }
            None => {
                if chain.transaction_known(pending.hash).await? {
                    misses = 0;
                } else {
                    misses += 1;
                    if misses >= DROPPED_AFTER_MISSES {
                        return Ok(GateOutcome::Dropped);
                    }
                    tracing::debug!(
                        "[GATE] {:#x} unknown to node ({}/{})",
                        pending.hash,
                        misses,
                        DROPPED_AFTER_MISSES
                    );
                }
            }
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Block until `pending` has `requirement` confirming blocks, inclusion block counted.
///
/// There is no timeout; callers that need one wrap this future.
pub async fn await_confirmations<C>(
    chain: &C,
    pending: &PendingTx,
    requirement: ConfirmationRequirement,
    poll_interval: Duration,
) -> Result<TxReceipt>
where
    C: ChainClient + ?Sized,
{
    tracing::info!(
        "[GATE] Waiting for {} confirmations of {:#x}...",
        requirement.get(),
        pending.hash
    );
    match poll_until_depth(chain, pending, requirement, poll_interval).await? {
        GateOutcome::Final(receipt) => Ok(receipt),
        GateOutcome::Reverted(receipt) => Err(DeployError::DeploymentNotFinal {
            tx: pending.hash,
            reason: format!("reverted in block {}", receipt.block_number),
        }),
        GateOutcome::Dropped => Err(DeployError::DeploymentNotFinal {
            tx: pending.hash,
            reason: "dropped or replaced before inclusion".to_string(),
        }),
    }
}

/// Wait for inclusion only. A reverted receipt is returned, not raised; the
/// caller decides what a revert means for its step.
pub async fn wait_for_inclusion<C>(
    chain: &C,
    pending: &PendingTx,
    poll_interval: Duration,
) -> Result<Option<TxReceipt>>
where
    C: ChainClient + ?Sized,
{
    match poll_until_depth(
        chain,
        pending,
        ConfirmationRequirement::inclusion(),
        poll_interval,
    )
    .await?
    {
        GateOutcome::Final(receipt) | GateOutcome::Reverted(receipt) => Ok(Some(receipt)),
        GateOutcome::Dropped => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{await_confirmations, wait_for_inclusion, DROPPED_AFTER_MISSES};
    use crate::chain::ChainClient;
    use crate::core::ConfirmationRequirement;
    use crate::error::DeployError;
    use crate::testing::MockChain;
    use alloy::primitives::Bytes;
    use std::time::Duration;

    #[tokio::test]
    async fn test_waits_until_requirement_is_met() {
        let chain = MockChain::new(100).with_mining();
        let pending = chain.deploy(Bytes::from_static(&[0x60])).await.unwrap();

        let requirement = ConfirmationRequirement::for_network("mainnet");
        let receipt = await_confirmations(&chain, &pending, requirement, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(receipt.block_number, 101);
        assert!(chain.head() + 1 - receipt.block_number >= 5);
        assert!(receipt.contract_address.is_some());
    }

    #[tokio::test]
    async fn test_single_confirmation_returns_at_inclusion() {
        let chain = MockChain::new(7);
        let pending = chain.deploy(Bytes::new()).await.unwrap();
        let receipt = await_confirmations(
            &chain,
            &pending,
            ConfirmationRequirement::inclusion(),
            Duration::ZERO,
        )
        .await
        .unwrap();
        assert_eq!(receipt.block_number, 8);
        assert_eq!(chain.counts().block_number, 1);
    }

    #[tokio::test]
    async fn test_dropped_transaction_is_not_final() {
        let chain = MockChain::new(1).with_mining();
        chain.drop_next_transaction();
        let pending = chain.deploy(Bytes::new()).await.unwrap();
        let err = await_confirmations(
            &chain,
            &pending,
            ConfirmationRequirement::for_network("local"),
            Duration::ZERO,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DeployError::DeploymentNotFinal { .. }));
        assert_eq!(chain.counts().transaction_known, DROPPED_AFTER_MISSES as usize);
    }

    #[tokio::test]
    async fn test_lagging_node_does_not_abort_landed_deployment() {
        let chain = MockChain::new(100).with_mining();
        chain.lag_lookups(DROPPED_AFTER_MISSES - 1);
        let pending = chain.deploy(Bytes::new()).await.unwrap();

        let receipt = await_confirmations(
            &chain,
            &pending,
            ConfirmationRequirement::for_network("mainnet"),
            Duration::ZERO,
        )
        .await
        .unwrap();
        assert_eq!(receipt.block_number, 101);
        assert!(chain.head() + 1 - receipt.block_number >= 5);
        assert_eq!(
            chain.counts().transaction_known,
            (DROPPED_AFTER_MISSES - 1) as usize
        );
    }

    #[tokio::test]
    async fn test_reverted_deployment_is_not_final() {
        let chain = MockChain::new(1).with_mining();
        chain.revert_next_receipt();
        let pending = chain.deploy(Bytes::new()).await.unwrap();
        let err = await_confirmations(
            &chain,
            &pending,
            ConfirmationRequirement::for_network("local"),
            Duration::ZERO,
        )
        .await
        .unwrap_err();
        let DeployError::DeploymentNotFinal { reason, .. } = err else {
            panic!("expected DeploymentNotFinal");
        };
        assert!(reason.contains("reverted"));
    }

    #[tokio::test]
    async fn test_inclusion_wait_reports_drop_as_none() {
        let chain = MockChain::new(1);
        chain.drop_next_transaction();
        let pending = chain.deploy(Bytes::new()).await.unwrap();
        let receipt = wait_for_inclusion(&chain, &pending, Duration::ZERO)
            .await
            .unwrap();
        assert!(receipt.is_none());
    }
}
