use serde::Serialize;

use crate::TimePoint;

pub type BlockRef = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    pub height: BlockRef,
    pub timestamp: TimePoint,
}

impl Block {
    pub const fn new(height: BlockRef, timestamp: TimePoint) -> Self {
        Self { height, timestamp }
    }
}
