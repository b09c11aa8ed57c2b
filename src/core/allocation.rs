use alloy::primitives::Address;

use crate::core::address::ChainAddress;
use crate::error::{DeployError, Result};

/// Fixed beneficiary roles, in the order the token contract expects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllocationRole {
    Marketing,
    Development,
    Team,
    Reserve,
    Loyalty,
}

impl AllocationRole {
    pub const ALL: [AllocationRole; 5] = [
        Self::Marketing,
        Self::Development,
        Self::Team,
        Self::Reserve,
        Self::Loyalty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Development => "development",
            Self::Team => "team",
            Self::Reserve => "reserve",
            Self::Loyalty => "loyalty",
        }
    }

    /// Environment key holding the beneficiary wallet for this role.
    pub fn env_key(self) -> &'static str {
        match self {
            Self::Marketing => "MARKETING_WALLET",
            Self::Development => "DEVELOPMENT_WALLET",
            Self::Team => "TEAM_WALLET",
            Self::Reserve => "RESERVE_WALLET",
            Self::Loyalty => "LOYALTY_WALLET",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Marketing => "Marketing",
            Self::Development => "Development & Tech",
            Self::Team => "Team",
            Self::Reserve => "Reserve",
            Self::Loyalty => "Loyalty",
        }
    }
}

/// The five auxiliary contracts spawned by the token, keyed by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationAddressSet {
    pub marketing: Address,
    pub development: Address,
    pub team: Address,
    pub reserve: Address,
    pub loyalty: Address,
}

impl AllocationAddressSet {
    /// Build a set, rejecting any role that resolved to the zero address.
    pub fn new(
        marketing: Address,
        development: Address,
        team: Address,
        reserve: Address,
        loyalty: Address,
    ) -> Result<Self> {
        let set = Self {
            marketing,
            development,
            team,
            reserve,
            loyalty,
        };
        for (role, address) in set.entries() {
            if address.is_zero() {
                return Err(DeployError::IncompleteAllocations {
                    role: role.as_str(),
                });
            }
        }
        Ok(set)
    }

    pub fn get(&self, role: AllocationRole) -> Address {
        match role {
            AllocationRole::Marketing => self.marketing,
            AllocationRole::Development => self.development,
            AllocationRole::Team => self.team,
            AllocationRole::Reserve => self.reserve,
            AllocationRole::Loyalty => self.loyalty,
        }
    }

    pub fn entries(&self) -> [(AllocationRole, Address); 5] {
        AllocationRole::ALL.map(|role| (role, self.get(role)))
    }
}

/// Beneficiary wallets as supplied at the process boundary, not yet validated.
#[derive(Clone, Debug, Default)]
pub struct BeneficiaryInputs {
    raw: [Option<String>; 5],
}

impl BeneficiaryInputs {
    pub fn new(raw: [Option<String>; 5]) -> Self {
        Self { raw }
    }

    /// Read each role's wallet variable through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            raw: AllocationRole::ALL.map(|role| lookup(role.env_key())),
        }
    }

    pub fn set(&mut self, role: AllocationRole, value: impl Into<String>) {
        self.raw[role_index(role)] = Some(value.into());
    }

    /// Validate every role and report all failures at once.
    pub fn validate(&self) -> Result<[ChainAddress; 5]> {
        let mut invalid = Vec::new();
        let mut parsed = [ChainAddress::from(Address::ZERO); 5];
        for (idx, role) in AllocationRole::ALL.into_iter().enumerate() {
            match self.raw[idx].as_deref().and_then(ChainAddress::parse) {
                Some(address) => parsed[idx] = address,
                None => invalid.push(format!("{} ({})", role.as_str(), role.env_key())),
            }
        }
        if !invalid.is_empty() {
            return Err(DeployError::Configuration(format!(
                "missing or invalid beneficiary address for: {} (expected 0x-prefixed 40 hex chars)",
                invalid.join(", ")
            )));
        }
        Ok(parsed)
    }
}

fn role_index(role: AllocationRole) -> usize {
    match role {
        AllocationRole::Marketing => 0,
        AllocationRole::Development => 1,
        AllocationRole::Team => 2,
        AllocationRole::Reserve => 3,
        AllocationRole::Loyalty => 4,
    }
}
