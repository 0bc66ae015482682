use std::collections::HashSet;

use alloy::primitives::Address;
use serde::Serialize;
use snapshot_common::{
    AggregationResult, AssetSource, Balance, Block, BlockRef, BlockSource, HolderAddress,
    HolderSet, TimePoint,
};
use strum_macros::{Display, EnumIter};
use tracing::info;

use crate::{
    holders::PAGE_SIZE, BalanceAggregator, BlockTimeResolver, Boundary, HolderEnumerator, Pacer,
    PipelineError, ResolutionError,
};

/// Stages of a snapshot run, in the only order they are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    ParseInput,
    ResolveBlock,
    EnumerateHolders,
    AggregateBalances,
    Done,
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub contract: Address,
    pub floor_block: BlockRef,
    pub native_ticker: String,
    pub boundary: Boundary,
    pub exclude: HashSet<HolderAddress>,
    pub page_size: usize,
}

impl PipelineConfig {
    /// Ethereum defaults: `ETH` ticker, the dead address excluded.
    pub fn new(contract: Address, floor_block: BlockRef) -> Self {
        Self {
            contract,
            floor_block,
            native_ticker: "ETH".to_string(),
            boundary: Boundary::default(),
            exclude: HashSet::from([HolderAddress::dead()]),
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress<'a> {
    Parsed(TimePoint),
    Resolved(Block),
    /// `holders` as listed by the source, `unique` after collapsing duplicates.
    Enumerated { holders: usize, unique: usize },
    Balance {
        index: usize,
        address: &'a HolderAddress,
        balance: Balance,
    },
}

/// Date in, holder balances out. The block and asset sources and the pacer
/// are injected so that any of them can be swapped out.
pub struct Pipeline<B, A, P> {
    blocks: B,
    assets: A,
    pacer: P,
    config: PipelineConfig,
}

impl<B, A, P> Pipeline<B, A, P>
where
    B: BlockSource + Sync,
    A: AssetSource + Sync,
    P: Pacer + Sync,
{
    pub fn new(blocks: B, assets: A, pacer: P, config: PipelineConfig) -> Self {
        Self {
            blocks,
            assets,
            pacer,
            config,
        }
    }

    pub async fn run(&self, raw_input: &str) -> Result<AggregationResult, PipelineError> {
        self.run_with_progress(raw_input, |_| {}).await
    }

    pub async fn run_with_progress<F>(
        &self,
        raw_input: &str,
        mut on_progress: F,
    ) -> Result<AggregationResult, PipelineError>
    where
        F: FnMut(Progress<'_>),
    {
        enter(Stage::ParseInput);
        let target = TimePoint::parse(raw_input)?;
        on_progress(Progress::Parsed(target));

        enter(Stage::ResolveBlock);
        let block = BlockTimeResolver::new(&self.blocks, self.config.floor_block)
            .with_boundary(self.config.boundary)
            .resolve(target)
            .await?
            .ok_or(ResolutionError::NoBlock {
                target,
                boundary: self.config.boundary,
            })?;
        on_progress(Progress::Resolved(block));

        enter(Stage::EnumerateHolders);
        let listed = HolderEnumerator::new(&self.assets)
            .with_page_size(self.config.page_size)
            .enumerate(self.config.contract, block.height)
            .await?;
        let holders = listed.len();
        let unique: HolderSet = listed.into_iter().collect();
        on_progress(Progress::Enumerated {
            holders,
            unique: unique.len(),
        });

        enter(Stage::AggregateBalances);
        let result = BalanceAggregator::new(&self.assets, &self.pacer, &self.config.native_ticker)
            .aggregate_with(
                &unique,
                block.height,
                &self.config.exclude,
                |index, address, balance| {
                    on_progress(Progress::Balance {
                        index,
                        address,
                        balance,
                    })
                },
            )
            .await?;

        enter(Stage::Done);
        Ok(result)
    }
}

fn enter(stage: Stage) {
    info!(%stage, "pipeline stage");
}
