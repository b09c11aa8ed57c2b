use crate::error::{DeployError, Result};

const PRODUCTION_NETWORK: &str = "mainnet";
const PRODUCTION_CONFIRMATIONS: u64 = 5;
const DEFAULT_CONFIRMATIONS: u64 = 2;

/// Number of blocks (inclusion block counted) a deployment must reach before
/// the run proceeds. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmationRequirement(u64);

impl ConfirmationRequirement {
    pub fn new(blocks: u64) -> Result<Self> {
        if blocks == 0 {
            return Err(DeployError::Configuration(
                "confirmation requirement must be at least 1".to_string(),
            ));
        }
        Ok(Self(blocks))
    }

    pub fn for_network(network: &str) -> Self {
        if network == PRODUCTION_NETWORK {
            Self(PRODUCTION_CONFIRMATIONS)
        } else {
            Self(DEFAULT_CONFIRMATIONS)
        }
    }

    /// Inclusion only.
    pub const fn inclusion() -> Self {
        Self(1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}
