use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::disk_storage::DiskStorageInterface;

/// Settings read from `~/.nft-snapshot/config.toml`. Command line flags and
/// environment variables take precedence over every field here.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub covalent_api_key: Option<String>,
    pub rpc_url: Option<String>,
    pub rpc_api_key: Option<String>,
    pub contract: Option<Address>,
    pub network: Option<String>,
    pub delay_ms: Option<u64>,
    pub exclude: Vec<String>,
}

impl DiskStorageInterface for Config {
    const FILE_NAME: &'static str = "config";
}

impl Config {
    pub fn get_covalent_api_key(&self) -> crate::Result<String> {
        self.covalent_api_key
            .clone()
            .ok_or(crate::Error::CovalentApiKeyNotSet)
    }

    pub fn get_contract(&self) -> crate::Result<Address> {
        self.contract.ok_or(crate::Error::ContractNotSet)
    }

    /// Fields set in `other` replace the ones in `self`, exclusions are merged.
    pub fn overridden_by(self, other: Config) -> Config {
        let mut exclude = self.exclude;
        for address in other.exclude {
            if !exclude.contains(&address) {
                exclude.push(address);
            }
        }

        Config {
            covalent_api_key: other.covalent_api_key.or(self.covalent_api_key),
            rpc_url: other.rpc_url.or(self.rpc_url),
            rpc_api_key: other.rpc_api_key.or(self.rpc_api_key),
            contract: other.contract.or(self.contract),
            network: other.network.or(self.network),
            delay_ms: other.delay_ms.or(self.delay_ms),
            exclude,
        }
    }
}
