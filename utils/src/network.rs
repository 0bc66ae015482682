use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Network {
    pub name: String,
    #[serde(default)]
    pub name_aliases: Vec<String>,
    pub chain_id: u32,
    /// Chain name in the Covalent API paths, e.g. `eth-mainnet`.
    pub covalent_chain_name: String,
    /// Ticker the data API labels the native asset with.
    pub native_ticker: String,
    pub native_decimals: u8,
    /// Lowest height the block search starts from.
    pub floor_block: u64,
    pub rpc_url: Option<String>,
    /// Infura style template, `{}` is replaced by the RPC API key.
    pub rpc_infura: Option<String>,
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (chain_id: {})", self.name, self.chain_id)
    }
}

impl Network {
    pub fn from_name(network_name: &str) -> crate::Result<Network> {
        let wanted = network_name.to_ascii_lowercase();
        default_networks()
            .into_iter()
            .find(|n| {
                n.name.to_ascii_lowercase() == wanted
                    || n.covalent_chain_name == wanted
                    || n.name_aliases.contains(&wanted)
            })
            .ok_or(crate::Error::NetworkNotFound(network_name.to_string()))
    }

    pub fn mainnet() -> Network {
        Network {
            name: "Mainnet".to_string(),
            name_aliases: vec!["ethereum".to_string(), "eth".to_string()],
            chain_id: 1,
            covalent_chain_name: "eth-mainnet".to_string(),
            native_ticker: "ETH".to_string(),
            native_decimals: 18,
            floor_block: 16_000_000,
            rpc_url: None,
            rpc_infura: Some("https://mainnet.infura.io/v3/{}".to_string()),
        }
    }

    /// Explicit URL first, then the Infura template filled with `rpc_api_key`.
    pub fn get_rpc(&self, rpc_api_key: Option<&str>) -> crate::Result<String> {
        if let Some(rpc_url) = &self.rpc_url {
            Ok(rpc_url.clone())
        } else if let (Some(rpc_infura), Some(key)) = (&self.rpc_infura, rpc_api_key) {
            Ok(rpc_infura.replace("{}", key))
        } else {
            Err(crate::Error::RpcUrlNotSet(self.name.clone()))
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::mainnet()
    }
}

fn default_networks() -> Vec<Network> {
    vec![
        Network::mainnet(),
        Network {
            name: "Sepolia".to_string(),
            name_aliases: vec![],
            chain_id: 11155111,
            covalent_chain_name: "eth-sepolia".to_string(),
            native_ticker: "ETH".to_string(),
            native_decimals: 18,
            floor_block: 0,
            rpc_url: None,
            rpc_infura: Some("https://sepolia.infura.io/v3/{}".to_string()),
        },
    ]
}
