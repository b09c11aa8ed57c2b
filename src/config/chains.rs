/// Network names treated as ephemeral in-memory or loopback chains.
const LOCAL_NETWORKS: &[&str] = &["hardhat", "localhost", "local"];

const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
const LOCAL_CHAIN_ID: u64 = 31337;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    /// Expected chain id, when the name pins one.
    pub chain_id: Option<u64>,
    /// Environment key that supplies the RPC endpoint for this network.
    pub rpc_env_key: Option<&'static str>,
    pub default_rpc_url: Option<&'static str>,
    pub local: bool,
}

impl NetworkProfile {
    pub fn get(name: &str) -> Self {
        let name = name.trim();
        if is_local_network(name) {
            return Self::local(name);
        }
        match name {
            "mainnet" => Self::mainnet(),
            "sepolia" => Self::sepolia(),
            other => Self {
                name: other.to_string(),
                chain_id: None,
                rpc_env_key: None,
                default_rpc_url: None,
                local: false,
            },
        }
    }

    pub fn mainnet() -> Self {
        Self {
            name: "mainnet".to_string(),
            chain_id: Some(1),
            rpc_env_key: Some("MAINNET_RPC_URL"),
            default_rpc_url: None,
            local: false,
        }
    }

    pub fn sepolia() -> Self {
        Self {
            name: "sepolia".to_string(),
            chain_id: Some(11_155_111),
            rpc_env_key: Some("SEPOLIA_RPC_URL"),
            default_rpc_url: None,
            local: false,
        }
    }

    pub fn local(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chain_id: Some(LOCAL_CHAIN_ID),
            rpc_env_key: Some("LOCAL_RPC_URL"),
            default_rpc_url: Some(LOCAL_RPC_URL),
            local: true,
        }
    }
}

pub fn is_local_network(name: &str) -> bool {
    LOCAL_NETWORKS.contains(&name)
}
