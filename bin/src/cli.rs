use alloy::primitives::Address;
use clap::{ArgAction, Parser};
use snapshot_utils::config::Config;

#[derive(Parser, Debug)]
#[command(name = "nft-snapshot", bin_name = "nft-snapshot", version)]
#[command(about = "Native balances of an NFT collection's holders at a point in time")]
pub struct Cli {
    /// The date you want to search for in YYYY-MM-DD or with full timestamp
    /// YYYY-MM-DDTHH:mm:ssZ, or a UNIX epoch in seconds or milliseconds
    pub date: String,

    /// JSON-RPC endpoint used to look up blocks
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Infura project key, used when no RPC URL is given
    #[arg(long, env = "RPC_API_KEY", hide_env_values = true)]
    pub rpc_api_key: Option<String>,

    #[arg(long, env = "COVALENT_API_KEY", hide_env_values = true)]
    pub covalent_api_key: Option<String>,

    /// Collection whose holders are snapshotted
    #[arg(long, env = "BAYC_CONTRACT")]
    pub contract: Option<Address>,

    #[arg(long, env = "SNAPSHOT_NETWORK")]
    pub network: Option<String>,

    /// Pause between two balance lookups
    #[arg(long, value_name = "MILLISECONDS")]
    pub delay_ms: Option<u64>,

    /// Holder to leave out, on top of the dead address (repeatable)
    #[arg(long = "exclude", value_name = "ADDRESS")]
    pub exclude: Vec<String>,

    /// Resolve to the first block at or after the date instead of the last one at or before it
    #[arg(long)]
    pub at_or_after: bool,

    /// -v for info logs, -vv for debug logs
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The settings given on the command line or through the environment.
    pub fn to_config(&self) -> Config {
        Config {
            covalent_api_key: self.covalent_api_key.clone(),
            rpc_url: self.rpc_url.clone(),
            rpc_api_key: self.rpc_api_key.clone(),
            contract: self.contract,
            network: self.network.clone(),
            delay_ms: self.delay_ms,
            exclude: self.exclude.clone(),
        }
    }
}
