//! IVM deployment tooling.
//!
//! Two flows share one chain seam ([`chain::ChainClient`]) and one explorer seam
//! ([`verify::VerificationService`]):
//! - deployment (`src/main.rs`): deploy the token, wait for confirmation depth,
//!   initialise allocations once, verify the token;
//! - audit (`src/bin/verify_allocations.rs`): resolve the five allocation
//!   contracts of an existing token and verify each of them.

pub mod artifacts;
pub mod audit;
pub mod chain;
pub mod contracts;
pub mod core;
pub mod deploy;
pub mod error;
pub mod resolver;
pub mod runtime;
pub mod utils;
pub mod verify;

pub mod config {
    pub mod chains;
}

#[doc(hidden)]
pub mod testing;
