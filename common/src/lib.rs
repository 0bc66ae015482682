pub mod balance;
pub mod block;
pub mod error;
pub mod holder;
pub mod source;
pub mod time_point;

pub use balance::{AggregationResult, Balance};
pub use block::{Block, BlockRef};
pub use error::InputError;
pub use holder::{HolderAddress, HolderSet, DEAD_ADDRESS};
pub use source::{AssetSource, BlockSource, HolderPage, SourceError, TokenBalance};
pub use time_point::{TimeFormat, TimePoint};
