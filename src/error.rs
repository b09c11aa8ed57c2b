use alloy::primitives::{Address, TxHash};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeployError>;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("deployment transaction {tx:#x} not final: {reason}")]
    DeploymentNotFinal { tx: TxHash, reason: String },
    #[error("allocation setup failed: {0}")]
    AllocationInitFailed(String),
    #[error("allocations are not initialized on token {0:#x}")]
    AllocationsNotInitialized(Address),
    #[error("AllocationsInitialized event for {token:#x} not found within {lookback} blocks of head")]
    AllocationsNotFound { token: Address, lookback: u64 },
    #[error("allocation `{role}` resolved to the zero address")]
    IncompleteAllocations { role: &'static str },
    #[error("verification of {address:#x} failed: {reason}")]
    VerificationFailed { address: Address, reason: String },
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),
}

/// Failure classes surfaced by the chain collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("call reverted: {0}")]
    Reverted(String),
    #[error("no decodable data: {0}")]
    NoDecodableData(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ChainError {
    pub fn is_no_decodable_data(&self) -> bool {
        matches!(self, Self::NoDecodableData(_))
    }
}
