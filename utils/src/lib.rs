pub mod config;
pub mod covalent;
pub mod disk_storage;
pub mod error;
pub mod log;
pub mod network;
pub mod reqwest;
pub mod rpc;
pub mod serde;

#[cfg(test)]
mod test_server;

pub use error::{Result, UtilsError as Error};

pub use reqwest::{Reqwest, RetryPolicy};
