use snapshot_common::{
    AggregationResult, BlockRef, HolderAddress, InputError, SourceError, TimePoint,
};
use thiserror::Error;

use crate::{orchestrator::Stage, resolver::Boundary};

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Failed to fetch the chain head. (Error: {0})")]
    Head(#[source] SourceError),

    #[error("Failed to fetch block {height}. (Error: {source})")]
    Block {
        height: BlockRef,
        #[source]
        source: SourceError,
    },

    #[error("Block source has no block at height {0} although it is below the head.")]
    BlockMissing(BlockRef),

    #[error("No block {boundary} timestamp {target} between the floor block and the chain head.")]
    NoBlock { target: TimePoint, boundary: Boundary },
}

#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("Failed to fetch page {page_number} of the holders. (Error: {source})")]
    Page {
        page_number: usize,
        #[source]
        source: SourceError,
    },
}

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Failed to fetch the balance of {address} after {} balances were fetched. (Error: {source})", .partial.len())]
    BalanceLookup {
        address: HolderAddress,
        partial: Box<AggregationResult>,
        #[source]
        source: SourceError,
    },
}

impl AggregationError {
    /// Balances accumulated before the failing lookup.
    pub fn partial(&self) -> &AggregationResult {
        match self {
            Self::BalanceLookup { partial, .. } => partial,
        }
    }

    pub fn into_partial(self) -> AggregationResult {
        match self {
            Self::BalanceLookup { partial, .. } => *partial,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

impl PipelineError {
    /// The stage the pipeline was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Input(_) => Stage::ParseInput,
            Self::Resolution(_) => Stage::ResolveBlock,
            Self::Enumeration(_) => Stage::EnumerateHolders,
            Self::Aggregation(_) => Stage::AggregateBalances,
        }
    }
}
