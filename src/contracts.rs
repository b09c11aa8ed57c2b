//! ABI bindings for the token and the contracts it spawns during allocation setup.

use alloy::primitives::B256;
use alloy::sol_types::SolEvent;

pub const TRANCHE_VESTING_PATH: &str = "contracts/IVMToken.sol:TrancheVestingWallet";
pub const LOYALTY_VAULT_PATH: &str = "contracts/IVMToken.sol:LoyaltyVault";

alloy::sol! {
    #[derive(Debug)]
    interface IVMToken {
        event AllocationsInitialized(
            address indexed community,
            address indexed marketingBeneficiary,
            address indexed devTechBeneficiary,
            address marketingVesting,
            address devTechVesting,
            address teamVesting,
            address reserveVesting,
            address loyaltyVault
        );

        function setupAllocations(
            address marketing,
            address development,
            address team,
            address reserve,
            address loyalty
        ) external;

        function allocationsInitialized() external view returns (bool);
        function marketingVesting() external view returns (address);
        function devTechVesting() external view returns (address);
        function teamVesting() external view returns (address);
        function reserveVesting() external view returns (address);
        function loyaltyVault() external view returns (address);
    }

    #[derive(Debug)]
    interface TrancheVestingWallet {
        function token() external view returns (address);
        function beneficiary() external view returns (address);
        function start() external view returns (uint256);
        function period() external view returns (uint256);
        function totalTranches() external view returns (uint256);
        function owner() external view returns (address);
    }

    #[derive(Debug)]
    interface LoyaltyVault {
        function token() external view returns (address);
        function releaseTime() external view returns (uint256);
        function admin() external view returns (address);
        function owner() external view returns (address);
    }
}

/// topic0 of `AllocationsInitialized`.
pub fn allocations_initialized_topic() -> B256 {
    IVMToken::AllocationsInitialized::SIGNATURE_HASH
}
