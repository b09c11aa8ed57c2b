//! Post-hoc verification of the contracts a deployed token spawned.
//!
//! Read-only: resolves the five allocation contracts, recovers each one's
//! constructor arguments from its public getters, and submits them in role order.

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolValue;

use crate::chain::{read_view, ChainClient};
use crate::contracts::{LoyaltyVault, TrancheVestingWallet, LOYALTY_VAULT_PATH, TRANCHE_VESTING_PATH};
use crate::core::{AllocationAddressSet, AllocationRole, ChainAddress};
use crate::error::{DeployError, Result};
use crate::resolver::AddressResolver;
use crate::verify::{VerificationOutcome, VerificationSubmitter};

/// `(token, beneficiary, start, period, totalTranches, owner)`
pub async fn tranche_constructor_args<C>(chain: &C, wallet: Address) -> Result<Bytes>
where
    C: ChainClient + ?Sized,
{
    let token = read_view(chain, wallet, TrancheVestingWallet::tokenCall {}).await?._0;
    let beneficiary = read_view(chain, wallet, TrancheVestingWallet::beneficiaryCall {})
        .await?
        ._0;
    let start = read_view(chain, wallet, TrancheVestingWallet::startCall {}).await?._0;
    let period = read_view(chain, wallet, TrancheVestingWallet::periodCall {}).await?._0;
    let total_tranches = read_view(chain, wallet, TrancheVestingWallet::totalTranchesCall {})
        .await?
        ._0;
    let owner = read_view(chain, wallet, TrancheVestingWallet::ownerCall {}).await?._0;
    Ok((token, beneficiary, start, period, total_tranches, owner)
        .abi_encode_params()
        .into())
}

/// `(token, releaseTime, admin, owner)`
pub async fn loyalty_constructor_args<C>(chain: &C, vault: Address) -> Result<Bytes>
where
    C: ChainClient + ?Sized,
{
    let token = read_view(chain, vault, LoyaltyVault::tokenCall {}).await?._0;
    let release_time = read_view(chain, vault, LoyaltyVault::releaseTimeCall {}).await?._0;
    let admin = read_view(chain, vault, LoyaltyVault::adminCall {}).await?._0;
    let owner = read_view(chain, vault, LoyaltyVault::ownerCall {}).await?._0;
    Ok((token, release_time, admin, owner).abi_encode_params().into())
}

#[derive(Clone, Debug)]
pub struct AuditReport {
    pub token: Address,
    pub allocations: AllocationAddressSet,
    pub outcomes: Vec<(AllocationRole, VerificationOutcome)>,
}

pub struct AuditDriver<'a, C: ?Sized> {
    chain: &'a C,
    submitter: &'a VerificationSubmitter,
}

impl<'a, C> AuditDriver<'a, C>
where
    C: ChainClient + ?Sized,
{
    pub fn new(chain: &'a C, submitter: &'a VerificationSubmitter) -> Self {
        Self { chain, submitter }
    }

    /// Stops at the first failed verification; later roles are not attempted.
    pub async fn run(&self, token_raw: &str) -> Result<AuditReport> {
        let token = ChainAddress::parse(token_raw)
            .ok_or_else(|| {
                DeployError::Configuration(format!(
                    "invalid token address `{token_raw}` (expected 0x-prefixed 40 hex chars)"
                ))
            })?
            .address();

        let allocations = AddressResolver::new(self.chain).resolve(token).await?;
        tracing::info!("[AUDIT] Allocations for {:#x}:", token);
        for (role, address) in allocations.entries() {
            tracing::info!("[AUDIT]   {:<18} {:#x}", role.label(), address);
        }

        let mut outcomes = Vec::with_capacity(AllocationRole::ALL.len());
        for (role, address) in allocations.entries() {
            let (path, args) = match role {
                AllocationRole::Loyalty => (
                    LOYALTY_VAULT_PATH,
                    loyalty_constructor_args(self.chain, address).await?,
                ),
                _ => (
                    TRANCHE_VESTING_PATH,
                    tranche_constructor_args(self.chain, address).await?,
                ),
            };
            tracing::info!("[AUDIT] Verifying {} at {:#x}", role.label(), address);
            let outcome = self.submitter.verify(address, Some(path), args).await;
            if let VerificationOutcome::Failed(reason) = outcome {
                return Err(DeployError::VerificationFailed { address, reason });
            }
            outcomes.push((role, outcome));
        }

        tracing::info!("[AUDIT] Verification pass complete for {:#x}", token);
        Ok(AuditReport {
            token,
            allocations,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{loyalty_constructor_args, tranche_constructor_args};
    use crate::contracts::{LoyaltyVault, TrancheVestingWallet};
    use crate::error::{ChainError, DeployError};
    use crate::testing::MockChain;
    use alloy::primitives::{address, Address, U256};
    use alloy::sol_types::{SolCall, SolValue};

    const WALLET: Address = address!("a16E02E87b7454126E5E10d957A927A7F5B5d2be");
    const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
    const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    #[tokio::test]
    async fn test_tranche_args_match_constructor_layout() {
        let chain = MockChain::new(1);
        let beneficiary = Address::repeat_byte(0xb1);
        chain.set_view_value(WALLET, TrancheVestingWallet::tokenCall::SELECTOR, TOKEN.abi_encode());
        chain.set_view_value(
            WALLET,
            TrancheVestingWallet::beneficiaryCall::SELECTOR,
            beneficiary.abi_encode(),
        );
        chain.set_view_value(
            WALLET,
            TrancheVestingWallet::startCall::SELECTOR,
            U256::from(1_700_000_000u64).abi_encode(),
        );
        chain.set_view_value(
            WALLET,
            TrancheVestingWallet::periodCall::SELECTOR,
            U256::from(2_592_000u64).abi_encode(),
        );
        chain.set_view_value(
            WALLET,
            TrancheVestingWallet::totalTranchesCall::SELECTOR,
            U256::from(12u64).abi_encode(),
        );
        chain.set_view_value(WALLET, TrancheVestingWallet::ownerCall::SELECTOR, OWNER.abi_encode());

        let args = tranche_constructor_args(&chain, WALLET).await.unwrap();
        assert_eq!(args.len(), 6 * 32);
        let decoded =
            <(Address, Address, U256, U256, U256, Address)>::abi_decode_params(&args, true).unwrap();
        assert_eq!(decoded.0, TOKEN);
        assert_eq!(decoded.1, beneficiary);
        assert_eq!(decoded.3, U256::from(2_592_000u64));
        assert_eq!(decoded.4, U256::from(12u64));
        assert_eq!(decoded.5, OWNER);
    }

    #[tokio::test]
    async fn test_loyalty_args_match_constructor_layout() {
        let chain = MockChain::new(1);
        let admin = Address::repeat_byte(0xad);
        chain.set_view_value(WALLET, LoyaltyVault::tokenCall::SELECTOR, TOKEN.abi_encode());
        chain.set_view_value(
            WALLET,
            LoyaltyVault::releaseTimeCall::SELECTOR,
            U256::from(1_800_000_000u64).abi_encode(),
        );
        chain.set_view_value(WALLET, LoyaltyVault::adminCall::SELECTOR, admin.abi_encode());
        chain.set_view_value(WALLET, LoyaltyVault::ownerCall::SELECTOR, OWNER.abi_encode());

        let args = loyalty_constructor_args(&chain, WALLET).await.unwrap();
        let decoded = <(Address, U256, Address, Address)>::abi_decode_params(&args, true).unwrap();
        assert_eq!(decoded, (TOKEN, U256::from(1_800_000_000u64), admin, OWNER));
    }

    #[tokio::test]
    async fn test_unreadable_getter_is_reported() {
        let chain = MockChain::new(1);
        let err = loyalty_constructor_args(&chain, WALLET).await.unwrap_err();
        assert!(matches!(
            err,
            DeployError::Chain(ChainError::NoDecodableData(_))
        ));
    }
}
