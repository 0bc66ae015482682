use std::{collections::HashSet, time::Duration};

use alloy::primitives::Address;
use snapshot_common::HolderAddress;
use snapshot_pipeline::{Boundary, FixedDelay, PipelineConfig};
use snapshot_utils::{config::Config, network::Network};

/// Everything a run needs, after merging flags, environment and config file.
#[derive(Debug)]
pub struct Settings {
    pub network: Network,
    pub rpc_url: String,
    pub covalent_api_key: String,
    pub contract: Address,
    pub delay: Duration,
    pub exclude: HashSet<HolderAddress>,
    pub boundary: Boundary,
}

impl Settings {
    pub fn resolve(config: Config, boundary: Boundary) -> snapshot_utils::Result<Self> {
        let network = match &config.network {
            Some(name) => Network::from_name(name)?,
            None => Network::mainnet(),
        };

        let rpc_url = match &config.rpc_url {
            Some(rpc_url) => rpc_url.clone(),
            None => network.get_rpc(config.rpc_api_key.as_deref())?,
        };

        let mut exclude = HashSet::from([HolderAddress::dead()]);
        for address in &config.exclude {
            let parsed = address
                .parse::<Address>()
                .map_err(|_| snapshot_utils::Error::InvalidAddress(address.clone()))?;
            exclude.insert(HolderAddress::from(parsed));
        }

        Ok(Self {
            covalent_api_key: config.get_covalent_api_key()?,
            contract: config.get_contract()?,
            delay: config
                .delay_ms
                .map(Duration::from_millis)
                .unwrap_or(FixedDelay::DEFAULT),
            rpc_url,
            network,
            exclude,
            boundary,
        })
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            native_ticker: self.network.native_ticker.clone(),
            boundary: self.boundary,
            exclude: self.exclude.clone(),
            ..PipelineConfig::new(self.contract, self.network.floor_block)
        }
    }
}
