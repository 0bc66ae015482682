use alloy::{
    eips::BlockNumberOrTag,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use snapshot_common::{Block, BlockRef, BlockSource, SourceError, TimePoint};

/// Block data over Ethereum JSON-RPC (`eth_blockNumber`, `eth_getBlockByNumber`).
pub struct RpcBlockSource<P> {
    provider: P,
}

impl RpcBlockSource<DynProvider> {
    pub fn from_url(rpc_url: &str) -> crate::Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|e| crate::Error::UrlParsingFailed(rpc_url.to_string(), e))?;
        Ok(Self::new(ProviderBuilder::new().connect_http(url).erased()))
    }
}

impl<P: Provider> RpcBlockSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn block_number(&self) -> crate::Result<BlockRef> {
        self.provider
            .get_block_number()
            .await
            .map_err(|error| crate::Error::RpcFailed {
                method: "eth_blockNumber",
                error,
            })
    }

    pub async fn block(&self, height: BlockRef) -> crate::Result<Option<Block>> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(height))
            .await
            .map_err(|error| crate::Error::RpcFailed {
                method: "eth_getBlockByNumber",
                error,
            })?;

        Ok(block.map(|block| {
            Block::new(
                block.header.number,
                TimePoint::from_secs(block.header.timestamp),
            )
        }))
    }
}

impl<P: Provider> BlockSource for RpcBlockSource<P> {
    async fn head_height(&self) -> Result<BlockRef, SourceError> {
        Ok(self.block_number().await?)
    }

    async fn block_by_height(&self, height: BlockRef) -> Result<Option<Block>, SourceError> {
        Ok(self.block(height).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_rejects_garbage() {
        assert!(matches!(
            RpcBlockSource::from_url("not a url"),
            Err(crate::Error::UrlParsingFailed(..))
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn test_block_live() {
        let rpc_url = std::env::var("RPC_URL").expect("RPC_URL not set");
        let source = RpcBlockSource::from_url(&rpc_url).unwrap();

        let block = source
            .block(17_000_000)
            .await
            .expect("Failed to fetch block")
            .expect("block missing");

        assert_eq!(block.height, 17_000_000);
        assert_eq!(block.timestamp, TimePoint::from_secs(1_680_911_891));
    }
}
