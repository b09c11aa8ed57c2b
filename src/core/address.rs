use alloy::primitives::Address;
use std::fmt;
use std::str::FromStr;

use crate::utils::hex::is_hex_digits;

/// True iff `raw` is `0x` followed by exactly 40 hex characters (any case).
///
/// No trimming and no checksum enforcement: mixed-case input is accepted as-is.
pub fn is_valid_chain_address(raw: &str) -> bool {
    match raw.strip_prefix("0x") {
        Some(body) => body.len() == 40 && is_hex_digits(body),
        None => false,
    }
}

/// A 20-byte account or contract address that passed the shape check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChainAddress(Address);

impl ChainAddress {
    pub fn parse(raw: &str) -> Option<Self> {
        if !is_valid_chain_address(raw) {
            return None;
        }
        Address::from_str(raw).ok().map(Self)
    }

    pub fn address(self) -> Address {
        self.0
    }
}

impl From<Address> for ChainAddress {
    fn from(value: Address) -> Self {
        Self(value)
    }
}

impl From<ChainAddress> for Address {
    fn from(value: ChainAddress) -> Self {
        value.0
    }
}

impl fmt::Display for ChainAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_checksum(None))
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_chain_address, ChainAddress};

    #[test]
    fn test_shape_accepts_any_case() {
        assert!(is_valid_chain_address(
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        ));
        assert!(is_valid_chain_address(
            "0x5fbdb2315678afecb367f032d93f642f64180aa3"
        ));
        assert!(is_valid_chain_address(
            "0x5FBDB2315678AFECB367F032D93F642F64180AA3"
        ));
    }

    #[test]
    fn test_shape_rejects_malformed_input() {
        let rejected = [
            "",
            "0x",
            "5FbDB2315678afecb367f032d93F642f64180aa3",
            "0X5FbDB2315678afecb367f032d93F642f64180aa3",
            "0x5FbDB2315678afecb367f032d93F642f64180aa",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3a",
            "0xZZZZ2315678afecb367f032d93F642f64180aa3",
            " 0x5FbDB2315678afecb367f032d93F642f64180aa3",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3 ",
        ];
        for raw in rejected {
            assert!(!is_valid_chain_address(raw), "{raw:?} should be rejected");
            assert!(ChainAddress::parse(raw).is_none());
        }
    }

    #[test]
    fn test_equality_ignores_case() {
        let upper = ChainAddress::parse("0xABCDEF0000000000000000000000000000000001").unwrap();
        let lower = ChainAddress::parse("0xabcdef0000000000000000000000000000000001").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_display_is_checksummed() {
        let parsed = ChainAddress::parse("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap();
        assert_eq!(
            parsed.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }
}
