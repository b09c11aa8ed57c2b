//! Fresh-deployment pipeline: creation, confirmation depth, one-time allocation setup.

pub mod allocations;
pub mod driver;
pub mod gate;

pub use allocations::initialize_allocations;
pub use driver::{DeploymentDriver, DeploymentReport, DeploymentSettings};
pub use gate::{await_confirmations, wait_for_inclusion};
