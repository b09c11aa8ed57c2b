//! Domain values threaded through the deployment and audit pipelines.

pub mod address;
pub mod allocation;
pub mod confirmations;

pub use address::{is_valid_chain_address, ChainAddress};
pub use allocation::{AllocationAddressSet, AllocationRole, BeneficiaryInputs};
pub use confirmations::ConfirmationRequirement;
