//! Explorer source verification.
//!
//! The explorer has no "verify unless already verified" call. A repeated
//! submission comes back as a rejection whose text carries a known marker; the
//! submitter turns that into [`VerificationOutcome::AlreadyVerified`] so callers
//! can treat verification as idempotent.

pub mod etherscan;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::artifacts::ArtifactStore;
use crate::chain::ChainClient;
use crate::config::chains::NetworkProfile;
use crate::utils::classify::is_already_verified;
use crate::utils::config::Config;

pub use etherscan::EtherscanClient;

/// One contract to publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    pub address: Address,
    /// Fully qualified `path:Name`; `None` lets the service use its default contract.
    pub contract_path: Option<String>,
    /// ABI-encoded constructor arguments, without the creation code.
    pub constructor_args: Bytes,
}

/// Rejection from the verification backend, message text kept verbatim.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceRejection {
    pub message: String,
}

impl ServiceRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait VerificationService: Send + Sync {
    async fn submit(&self, request: &VerificationRequest) -> Result<(), ServiceRejection>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Submitted,
    AlreadyVerified,
    /// No call was made.
    Skipped(String),
    Failed(String),
}

impl VerificationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "submitted"),
            Self::AlreadyVerified => write!(f, "already verified"),
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Single attempt per contract; never retried here.
#[derive(Clone)]
pub struct VerificationSubmitter {
    network: NetworkProfile,
    service: Option<Arc<dyn VerificationService>>,
}

impl VerificationSubmitter {
    pub fn new(network: NetworkProfile, service: Option<Arc<dyn VerificationService>>) -> Self {
        Self { network, service }
    }

    pub async fn verify(
        &self,
        address: Address,
        contract_path: Option<&str>,
        constructor_args: Bytes,
    ) -> VerificationOutcome {
        if self.network.local {
            tracing::info!(
                "[VERIFY] Skipping verification of {:#x} on local network `{}`",
                address,
                self.network.name
            );
            return VerificationOutcome::Skipped(format!("local network `{}`", self.network.name));
        }
        let Some(service) = self.service.as_ref() else {
            tracing::info!("[VERIFY] ETHERSCAN_API_KEY missing; skipping verification of {:#x}", address);
            return VerificationOutcome::Skipped("no explorer credential".to_string());
        };

        let request = VerificationRequest {
            address,
            contract_path: contract_path.map(str::to_string),
            constructor_args,
        };
        tracing::info!(
            "[VERIFY] Verifying {:#x} ({}) on {}...",
            address,
            contract_path.unwrap_or("default contract"),
            self.network.name
        );
        match service.submit(&request).await {
            Ok(()) => {
                tracing::info!("[VERIFY] {:#x} verified", address);
                VerificationOutcome::Submitted
            }
            Err(rejection) if is_already_verified(&rejection.message) => {
                tracing::info!("[VERIFY] {:#x} already verified", address);
                VerificationOutcome::AlreadyVerified
            }
            Err(rejection) => {
                tracing::error!("[VERIFY] {:#x} failed: {}", address, rejection.message);
                VerificationOutcome::Failed(rejection.message)
            }
        }
    }
}

/// Explorer client for the configured network, or `None` when verification
/// cannot run (local network or no `ETHERSCAN_API_KEY`).
///
/// The chain id is only queried for networks without a pinned id.
pub async fn explorer_service<C>(
    config: &Config,
    chain: &C,
) -> crate::error::Result<Option<Arc<dyn VerificationService>>>
where
    C: ChainClient + ?Sized,
{
    if config.network.local {
        return Ok(None);
    }
    let Some(api_key) = config.etherscan_api_key.as_deref() else {
        return Ok(None);
    };
    let chain_id = match config.network.chain_id {
        Some(id) => id,
        None => chain.chain_id().await?,
    };
    let client = EtherscanClient::new(
        api_key,
        chain_id,
        ArtifactStore::new(config.artifacts_dir.clone()),
        config.token_contract.clone(),
    );
    let service: Arc<dyn VerificationService> = Arc::new(client);
    Ok(Some(service))
}

#[cfg(test)]
mod tests {
    use super::{explorer_service, VerificationOutcome, VerificationService, VerificationSubmitter};
    use crate::testing::MockChain;
    use crate::utils::config::Config;
    use crate::config::chains::NetworkProfile;
    use crate::testing::MockExplorer;
    use alloy::primitives::{address, Address, Bytes};
    use std::sync::Arc;

    const TARGET: Address = address!("a16E02E87b7454126E5E10d957A927A7F5B5d2be");

    fn submitter(network: &str, explorer: &Arc<MockExplorer>) -> VerificationSubmitter {
        let service: Arc<dyn VerificationService> = explorer.clone();
        VerificationSubmitter::new(NetworkProfile::get(network), Some(service))
    }

    #[tokio::test]
    async fn test_success_is_submitted() {
        let explorer = Arc::new(MockExplorer::accepting());
        let outcome = submitter("sepolia", &explorer)
            .verify(TARGET, Some("contracts/IVMToken.sol:LoyaltyVault"), Bytes::new())
            .await;
        assert_eq!(outcome, VerificationOutcome::Submitted);
        let requests = explorer.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].address, TARGET);
        assert_eq!(
            requests[0].contract_path.as_deref(),
            Some("contracts/IVMToken.sol:LoyaltyVault")
        );
    }

    #[tokio::test]
    async fn test_already_verified_marker_is_not_a_failure() {
        let messages = [
            "Already Verified",
            "Contract 0xa16e... is Already Verified on Etherscan",
            "NOTOK: Contract source code already verified",
        ];
        for message in messages {
            let explorer = Arc::new(MockExplorer::scripted(vec![Err(message.to_string())]));
            let outcome = submitter("mainnet", &explorer)
                .verify(TARGET, None, Bytes::new())
                .await;
            assert_eq!(outcome, VerificationOutcome::AlreadyVerified, "{message}");
        }
    }

    #[tokio::test]
    async fn test_other_rejection_is_failed_once() {
        let explorer = Arc::new(MockExplorer::scripted(vec![Err(
            "Fail - Unable to verify. Compiled contract deployment bytecode does NOT match".to_string(),
        )]));
        let outcome = submitter("sepolia", &explorer)
            .verify(TARGET, None, Bytes::new())
            .await;
        assert!(outcome.is_failed());
        assert_eq!(explorer.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_local_networks_make_no_call() {
        for network in ["hardhat", "localhost", "local"] {
            let explorer = Arc::new(MockExplorer::accepting());
            let outcome = submitter(network, &explorer)
                .verify(TARGET, None, Bytes::new())
                .await;
            assert!(matches!(outcome, VerificationOutcome::Skipped(_)), "{network}");
            assert!(explorer.requests().is_empty());
        }
    }

    fn config(pairs: &[(&str, &str)]) -> Config {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::load_from(None, move |key| {
            owned
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_explorer_service_selection() {
        let chain = MockChain::new(1);

        let local = config(&[("ETHERSCAN_API_KEY", "key")]);
        assert!(explorer_service(&local, &chain).await.unwrap().is_none());

        let no_key = config(&[
            ("NETWORK", "sepolia"),
            ("SEPOLIA_RPC_URL", "https://sepolia.example.org"),
        ]);
        assert!(explorer_service(&no_key, &chain).await.unwrap().is_none());

        let pinned = config(&[
            ("NETWORK", "sepolia"),
            ("SEPOLIA_RPC_URL", "https://sepolia.example.org"),
            ("ETHERSCAN_API_KEY", "key"),
        ]);
        assert!(explorer_service(&pinned, &chain).await.unwrap().is_some());
        assert_eq!(chain.counts().chain_id, 0);

        let unpinned = config(&[
            ("NETWORK", "holesky"),
            ("RPC_URL", "https://holesky.example.org"),
            ("ETHERSCAN_API_KEY", "key"),
        ]);
        assert!(explorer_service(&unpinned, &chain).await.unwrap().is_some());
        assert_eq!(chain.counts().chain_id, 1);
    }

    #[tokio::test]
    async fn test_missing_service_is_skipped() {
        let submitter = VerificationSubmitter::new(NetworkProfile::mainnet(), None);
        let outcome = submitter.verify(TARGET, None, Bytes::new()).await;
        assert!(matches!(outcome, VerificationOutcome::Skipped(_)));
    }
}
