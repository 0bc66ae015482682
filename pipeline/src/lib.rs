pub mod aggregator;
pub mod error;
pub mod holders;
pub mod orchestrator;
pub mod pacer;
pub mod resolver;

#[cfg(test)]
pub mod testutils;

pub use aggregator::BalanceAggregator;
pub use error::{AggregationError, EnumerationError, PipelineError, ResolutionError};
pub use holders::HolderEnumerator;
pub use orchestrator::{Pipeline, PipelineConfig, Progress, Stage};
pub use pacer::{FixedDelay, NoDelay, Pacer};
pub use resolver::{BlockTimeResolver, Boundary};
