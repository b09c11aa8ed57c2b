use crate::config::chains::NetworkProfile;
use crate::core::BeneficiaryInputs;
use crate::error::{DeployError, Result};
use crate::utils::hex::normalize_private_key;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_NETWORK: &str = "hardhat";
const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
const DEFAULT_TOKEN_CONTRACT: &str = "contracts/IVMToken.sol:IVMToken";
const DEFAULT_RECEIPT_POLL_MS: u64 = 4_000;
const DEFAULT_RPC_CALL_TIMEOUT_MS: u64 = 15_000;
const RPC_CALL_TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 250..=120_000;

/// Run configuration, read once at the process boundary and passed into the drivers.
#[derive(Debug, Clone)]
pub struct Config {
    pub network: NetworkProfile,
    pub rpc_url: String,
    pub private_key: Option<String>,
    pub etherscan_api_key: Option<String>,
    pub artifacts_dir: PathBuf,
    /// Fully qualified `path:Name` of the token contract.
    pub token_contract: String,
    pub receipt_poll_interval: Duration,
    /// Upper bound on any single RPC request.
    pub rpc_call_timeout: Duration,
    /// Wallets from `MARKETING_WALLET` .. `LOYALTY_WALLET`, validated by the deploy flow.
    pub beneficiaries: BeneficiaryInputs,
    /// `IVM_TOKEN_ADDRESS`, the audit target when no `--token` is given.
    pub token_address: Option<String>,
}

fn validate_http_url(name: &str, raw: &str) -> Result<()> {
    let parsed = raw.parse::<reqwest::Url>().map_err(|e| {
        DeployError::Configuration(format!("{name} must be a valid URL, got `{raw}`: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DeployError::Configuration(format!(
            "{name} must use http(s) scheme, got `{other}`"
        ))),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
    pub fn load(network_override: Option<&str>) -> Result<Self> {
        Self::load_from(network_override, |key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn load_from<F>(network_override: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network_name = network_override
            .map(str::to_string)
            .or_else(|| non_empty(lookup("NETWORK")))
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string());
        let network = NetworkProfile::get(&network_name);

        let (rpc_key, rpc_url) = match non_empty(lookup("RPC_URL")) {
            Some(url) => ("RPC_URL", url),
            None => {
                let from_profile = network
                    .rpc_env_key
                    .and_then(|key| non_empty(lookup(key)).map(|url| (key, url)));
                match (from_profile, network.default_rpc_url) {
                    (Some(found), _) => found,
                    (None, Some(default)) => ("default", default.to_string()),
                    (None, None) => {
                        let wanted = network.rpc_env_key.unwrap_or("RPC_URL");
                        return Err(DeployError::Configuration(format!(
                            "missing {wanted} for network `{}`",
                            network.name
                        )));
                    }
                }
            }
        };
        validate_http_url(rpc_key, &rpc_url)?;

        let private_key = match non_empty(lookup("PRIVATE_KEY")) {
            Some(raw) => Some(normalize_private_key(&raw).ok_or_else(|| {
                DeployError::Configuration(
                    "PRIVATE_KEY must be 64 hex chars (optionally 0x-prefixed)".to_string(),
                )
            })?),
            None => None,
        };

        let receipt_poll_ms = match non_empty(lookup("RECEIPT_POLL_MS")) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                DeployError::Configuration(format!(
                    "RECEIPT_POLL_MS must be a valid u64, got `{raw}`"
                ))
            })?,
            None => DEFAULT_RECEIPT_POLL_MS,
        };

        let rpc_call_timeout_ms = match non_empty(lookup("RPC_CALL_TIMEOUT_MS")) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|ms| RPC_CALL_TIMEOUT_RANGE_MS.contains(ms))
                .ok_or_else(|| {
                    DeployError::Configuration(format!(
                        "RPC_CALL_TIMEOUT_MS must be between {} and {}, got `{raw}`",
                        RPC_CALL_TIMEOUT_RANGE_MS.start(),
                        RPC_CALL_TIMEOUT_RANGE_MS.end()
                    ))
                })?,
            None => DEFAULT_RPC_CALL_TIMEOUT_MS,
        };

        Ok(Self {
            beneficiaries: BeneficiaryInputs::from_lookup(&lookup),
            token_address: non_empty(lookup("IVM_TOKEN_ADDRESS")),
            rpc_call_timeout: Duration::from_millis(rpc_call_timeout_ms),
            network,
            rpc_url,
            private_key,
            etherscan_api_key: non_empty(lookup("ETHERSCAN_API_KEY")),
            artifacts_dir: non_empty(lookup("ARTIFACTS_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
            token_contract: non_empty(lookup("TOKEN_CONTRACT"))
                .unwrap_or_else(|| DEFAULT_TOKEN_CONTRACT.to_string()),
            receipt_poll_interval: Duration::from_millis(receipt_poll_ms),
        })
    }

    pub fn require_private_key(&self) -> Result<&str> {
        self.private_key.as_deref().ok_or_else(|| {
            DeployError::Configuration("PRIVATE_KEY must be set for deployment".to_string())
        })
    }
}
