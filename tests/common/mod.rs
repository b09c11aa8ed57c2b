#![allow(dead_code)]

use alloy::primitives::{address, Address, U256};
use alloy::sol_types::{SolCall, SolEvent, SolValue};
use ivm_deployer::chain::RawLog;
use ivm_deployer::contracts::{IVMToken, LoyaltyVault, TrancheVestingWallet};
use ivm_deployer::testing::MockChain;

pub const TOKEN: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const MARKETING: Address = address!("a513E6E4b8f2a923D98304ec87F64353C4D5C853");
pub const DEVELOPMENT: Address = address!("2279B7A0a67DB372996a5FaB50D91eAA73d2eBe6");
pub const TEAM: Address = address!("8A791620dd6260079BF849Dc5567aDC3F2FdC318");
pub const RESERVE: Address = address!("610178dA211FEF7D417bC0e6FeD39F05609AD788");
pub const LOYALTY: Address = address!("B7f8BC63BbcaD18155201308C8f3540b07f84F5e");

pub fn vesting_addresses() -> [Address; 5] {
    [MARKETING, DEVELOPMENT, TEAM, RESERVE, LOYALTY]
}

pub fn initialized_event_log(block_number: u64) -> RawLog {
    let event = IVMToken::AllocationsInitialized {
        community: Address::repeat_byte(0xc0),
        marketingBeneficiary: Address::repeat_byte(0xb1),
        devTechBeneficiary: Address::repeat_byte(0xb2),
        marketingVesting: MARKETING,
        devTechVesting: DEVELOPMENT,
        teamVesting: TEAM,
        reserveVesting: RESERVE,
        loyaltyVault: LOYALTY,
    };
    let encoded = event.encode_log_data();
    RawLog {
        block_number,
        topics: encoded.topics().to_vec(),
        data: encoded.data.clone(),
    }
}

pub fn flag_unreadable(chain: &MockChain) {
    chain.set_view_value(
        TOKEN,
        IVMToken::allocationsInitializedCall::SELECTOR,
        Vec::new(),
    );
}

/// Getters on each spawned contract, so constructor arguments can be recovered.
pub fn install_vesting_getters(chain: &MockChain) {
    for (idx, wallet) in vesting_addresses()[..4].iter().copied().enumerate() {
        let beneficiary = Address::repeat_byte(0xb0 + idx as u8);
        chain.set_view_value(wallet, TrancheVestingWallet::tokenCall::SELECTOR, TOKEN.abi_encode());
        chain.set_view_value(
            wallet,
            TrancheVestingWallet::beneficiaryCall::SELECTOR,
            beneficiary.abi_encode(),
        );
        chain.set_view_value(
            wallet,
            TrancheVestingWallet::startCall::SELECTOR,
            U256::from(1_735_689_600u64).abi_encode(),
        );
        chain.set_view_value(
            wallet,
            TrancheVestingWallet::periodCall::SELECTOR,
            U256::from(2_592_000u64).abi_encode(),
        );
        chain.set_view_value(
            wallet,
            TrancheVestingWallet::totalTranchesCall::SELECTOR,
            U256::from(10u64).abi_encode(),
        );
        chain.set_view_value(wallet, TrancheVestingWallet::ownerCall::SELECTOR, OWNER.abi_encode());
    }

    chain.set_view_value(LOYALTY, LoyaltyVault::tokenCall::SELECTOR, TOKEN.abi_encode());
    chain.set_view_value(
        LOYALTY,
        LoyaltyVault::releaseTimeCall::SELECTOR,
        U256::from(1_767_225_600u64).abi_encode(),
    );
    chain.set_view_value(LOYALTY, LoyaltyVault::adminCall::SELECTOR, OWNER.abi_encode());
    chain.set_view_value(LOYALTY, LoyaltyVault::ownerCall::SELECTOR, OWNER.abi_encode());
}
