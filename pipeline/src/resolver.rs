use std::fmt::Display;

use serde::Serialize;
use snapshot_common::{Block, BlockRef, BlockSource, TimePoint};
use tracing::{debug, info};

use crate::ResolutionError;

/// Which side of the target timestamp the resolved block lies on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Last block whose timestamp is not after the target.
    #[default]
    AtOrBefore,
    /// First block whose timestamp is not before the target.
    AtOrAfter,
}

impl Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AtOrBefore => "at or before",
            Self::AtOrAfter => "at or after",
        })
    }
}

/// Binary search over block heights in `[floor, head]`, relying on block
/// timestamps being non-decreasing in height.
pub struct BlockTimeResolver<S> {
    source: S,
    floor: BlockRef,
    boundary: Boundary,
}

impl<S: BlockSource> BlockTimeResolver<S> {
    pub fn new(source: S, floor: BlockRef) -> Self {
        Self {
            source,
            floor,
            boundary: Boundary::default(),
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Returns `None` when no block in `[floor, head]` satisfies the boundary,
    /// which happens for targets before the floor block (`AtOrBefore`), after the
    /// head block (`AtOrAfter`), or when the floor is above the head.
    pub async fn resolve(&self, target: TimePoint) -> Result<Option<Block>, ResolutionError> {
        let head = self
            .source
            .head_height()
            .await
            .map_err(ResolutionError::Head)?;

        let mut low = self.floor;
        let mut high = head;
        let mut candidate = None;
        let mut probes = 0u32;

        while low <= high {
            let mid = low + (high - low) / 2;
            let block = self.fetch(mid).await?;
            probes += 1;

            let go_later = match self.boundary {
                Boundary::AtOrBefore => block.timestamp <= target,
                Boundary::AtOrAfter => block.timestamp < target,
            };
            debug!(low, high, mid, timestamp = %block.timestamp, go_later, "block search step");

            if go_later {
                if self.boundary == Boundary::AtOrBefore {
                    candidate = Some(block);
                }
                low = mid + 1;
            } else {
                if self.boundary == Boundary::AtOrAfter {
                    candidate = Some(block);
                }
                match mid.checked_sub(1) {
                    Some(next) => high = next,
                    None => break,
                }
            }
        }

        info!(
            %target,
            floor = self.floor,
            head,
            probes,
            height = candidate.map(|b: Block| b.height),
            "resolved block {} target",
            self.boundary
        );

        Ok(candidate)
    }

    async fn fetch(&self, height: BlockRef) -> Result<Block, ResolutionError> {
        self.source
            .block_by_height(height)
            .await
            .map_err(|source| ResolutionError::Block { height, source })?
            .ok_or(ResolutionError::BlockMissing(height))
    }
}
