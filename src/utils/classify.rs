//! Message-marker classification for external failures.
//!
//! Providers and the explorer only report some conditions through free-form text.
//! Every recognised wording lives in the tables below; when an upstream service
//! changes its phrasing, this is the only place to update.

use crate::error::ChainError;

/// Substrings marking a call that executed and reverted.
pub const REVERT_MARKERS: &[&str] = &["execution reverted", "revert"];

/// Substrings marking a call whose return data could not be decoded
/// (no code at the address, selector missing, or a layout mismatch).
pub const NO_DATA_MARKERS: &[&str] = &[
    "could not decode result data",
    "bad_data",
    "buffer overrun",
    "returned no data",
    "0x is not valid",
];

/// Explorer wordings for a contract whose source is already published.
/// Matched case-sensitively.
pub const ALREADY_VERIFIED_MARKERS: &[&str] =
    &["Already Verified", "Contract source code already verified"];

/// Map a raw provider error message onto the chain failure taxonomy.
///
/// Revert markers take precedence over no-data markers: a revert with an empty
/// reason is still a revert.
pub fn classify_rpc_failure(message: &str) -> ChainError {
    let lowered = message.to_ascii_lowercase();
    if REVERT_MARKERS.iter().any(|needle| lowered.contains(needle)) {
        return ChainError::Reverted(message.to_string());
    }
    if NO_DATA_MARKERS.iter().any(|needle| lowered.contains(needle)) {
        return ChainError::NoDecodableData(message.to_string());
    }
    ChainError::Transport(message.to_string())
}

pub fn is_already_verified(message: &str) -> bool {
    ALREADY_VERIFIED_MARKERS
        .iter()
        .any(|needle| message.contains(needle))
}
