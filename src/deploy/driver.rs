use alloy::primitives::{Address, Bytes};
use std::time::Duration;

use crate::chain::{ChainClient, TxReceipt};
use crate::config::chains::NetworkProfile;
use crate::core::{BeneficiaryInputs, ConfirmationRequirement};
use crate::deploy::allocations::initialize_allocations;
use crate::deploy::gate::await_confirmations;
use crate::error::{DeployError, Result};
use crate::verify::{VerificationOutcome, VerificationSubmitter};

/// Inputs for one deployment run, fixed before the driver starts.
#[derive(Clone, Debug)]
pub struct DeploymentSettings {
    pub network: NetworkProfile,
    pub beneficiaries: BeneficiaryInputs,
    pub creation_code: Bytes,
    /// Contract path handed to the explorer; `None` uses the service default.
    pub token_contract: Option<String>,
    pub poll_interval: Duration,
}

#[derive(Clone, Debug)]
pub struct DeploymentReport {
    pub token: Address,
    pub confirmations: ConfirmationRequirement,
    pub deployment: TxReceipt,
    pub allocations: TxReceipt,
    pub verification: VerificationOutcome,
}

/// Deploy, wait for depth, initialise allocations once, verify.
///
/// A failure at any stage stops the run. Whatever already landed on chain
/// (for example a deployed but uninitialised token) is left for manual recovery.
pub struct DeploymentDriver<'a, C: ?Sized> {
    chain: &'a C,
    submitter: &'a VerificationSubmitter,
    settings: DeploymentSettings,
}

impl<'a, C> DeploymentDriver<'a, C>
where
    C: ChainClient + ?Sized,
{
    pub fn new(chain: &'a C, submitter: &'a VerificationSubmitter, settings: DeploymentSettings) -> Self {
        Self {
            chain,
            submitter,
            settings,
        }
    }

    pub async fn run(&self) -> Result<DeploymentReport> {
        let settings = &self.settings;
        let beneficiaries = settings.beneficiaries.validate()?;
        let confirmations = ConfirmationRequirement::for_network(&settings.network.name);

        let pending = self.chain.deploy(settings.creation_code.clone()).await?;
        tracing::info!("[DEPLOY] IVMToken creation sent: {:#x}", pending.hash);

        let deployment = await_confirmations(
            self.chain,
            &pending,
            confirmations,
            settings.poll_interval,
        )
        .await?;
        let token = deployment
            .contract_address
            .ok_or_else(|| DeployError::DeploymentNotFinal {
                tx: pending.hash,
                reason: "receipt carries no contract address".to_string(),
            })?;
        tracing::info!(
            "[DEPLOY] IVMToken deployed at {:#x} (block {}, {} confirmations)",
            token,
            deployment.block_number,
            confirmations.get()
        );

        let allocations = initialize_allocations(
            self.chain,
            token,
            &beneficiaries,
            settings.poll_interval,
        )
        .await?;
        tracing::info!(
            "[DEPLOY] Allocations initialized in block {}",
            allocations.block_number
        );

        let verification = self
            .submitter
            .verify(token, settings.token_contract.as_deref(), Bytes::new())
            .await;
        if let VerificationOutcome::Failed(reason) = &verification {
            tracing::warn!(
                "[DEPLOY] Verification of {:#x} failed, continuing: {}",
                token,
                reason
            );
        }

        Ok(DeploymentReport {
            token,
            confirmations,
            deployment,
            allocations,
            verification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DeploymentDriver, DeploymentSettings};
    use crate::config::chains::NetworkProfile;
    use crate::core::{AllocationRole, BeneficiaryInputs};
    use crate::error::{ChainError, DeployError};
    use crate::testing::{MockChain, MockExplorer};
    use crate::verify::{VerificationOutcome, VerificationService, VerificationSubmitter};
    use alloy::primitives::{Address, Bytes};
    use std::sync::Arc;
    use std::time::Duration;

    fn settings(network: &str) -> DeploymentSettings {
        DeploymentSettings {
            network: NetworkProfile::get(network),
            beneficiaries: BeneficiaryInputs::new([
                Some("0x1000000000000000000000000000000000000001".to_string()),
                Some("0x2000000000000000000000000000000000000002".to_string()),
                Some("0x3000000000000000000000000000000000000003".to_string()),
                Some("0x4000000000000000000000000000000000000004".to_string()),
                Some("0x5000000000000000000000000000000000000005".to_string()),
            ]),
            creation_code: Bytes::from_static(&[0x60, 0x80]),
            token_contract: None,
            poll_interval: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_failed_verification_does_not_fail_deployment() {
        let chain = MockChain::new(40).with_mining();
        let explorer = Arc::new(MockExplorer::scripted(vec![Err(
            "Fail - Unable to verify".to_string(),
        )]));
        let service: Arc<dyn VerificationService> = explorer.clone();
        let submitter = VerificationSubmitter::new(NetworkProfile::sepolia(), Some(service));

        let report = DeploymentDriver::new(&chain, &submitter, settings("sepolia"))
            .run()
            .await
            .unwrap();
        assert!(report.verification.is_failed());
        assert_eq!(explorer.requests().len(), 1);
        assert_eq!(explorer.requests()[0].address, report.token);
        assert!(explorer.requests()[0].constructor_args.is_empty());
    }

    #[tokio::test]
    async fn test_mainnet_waits_for_five_confirmations() {
        let chain = MockChain::new(40).with_mining();
        let submitter = VerificationSubmitter::new(NetworkProfile::mainnet(), None);
        let report = DeploymentDriver::new(&chain, &submitter, settings("mainnet"))
            .run()
            .await
            .unwrap();
        assert_eq!(report.confirmations.get(), 5);
        assert!(matches!(report.verification, VerificationOutcome::Skipped(_)));
        assert!(report.allocations.block_number > report.deployment.block_number + 3);
    }

    #[tokio::test]
    async fn test_reverted_deployment_stops_before_allocation() {
        let chain = MockChain::new(40).with_mining();
        chain.revert_next_receipt();
        let submitter = VerificationSubmitter::new(NetworkProfile::local("local"), None);
        let err = DeploymentDriver::new(&chain, &submitter, settings("local"))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::DeploymentNotFinal { .. }));
        assert_eq!(chain.counts().send_transaction, 0);
    }

    #[tokio::test]
    async fn test_deploy_transport_failure_propagates() {
        let chain = MockChain::new(40);
        chain.fail_sends_with(ChainError::Transport("connection refused".to_string()));
        let submitter = VerificationSubmitter::new(NetworkProfile::local("local"), None);
        let err = DeploymentDriver::new(&chain, &submitter, settings("local"))
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Chain(ChainError::Transport(_))));
    }

    #[tokio::test]
    async fn test_missing_beneficiary_named_in_error() {
        let chain = MockChain::new(40);
        let mut settings = settings("local");
        settings.beneficiaries = BeneficiaryInputs::default();
        settings.beneficiaries.set(AllocationRole::Team, format!("{:#x}", Address::repeat_byte(3)));
        let submitter = VerificationSubmitter::new(NetworkProfile::local("local"), None);
        let err = DeploymentDriver::new(&chain, &submitter, settings)
            .run()
            .await
            .unwrap_err();
        let DeployError::Configuration(message) = err else {
            panic!("expected configuration error");
        };
        assert!(message.contains("MARKETING_WALLET"));
        assert!(!message.contains("TEAM_WALLET"));
        assert_eq!(chain.counts().total(), 0);
    }
}
