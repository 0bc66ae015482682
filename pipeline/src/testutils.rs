//! In-memory block and asset sources for exercising the pipeline offline.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use alloy::primitives::{Address, U256};
use snapshot_common::{
    AssetSource, Balance, Block, BlockRef, BlockSource, HolderAddress, HolderPage, SourceError,
    TimePoint, TokenBalance,
};

use crate::Pacer;

pub const BAYC: Address = Address::new([0xbc; 20]);

/// `milli` thousandths of an ether, in wei.
pub fn eth(milli: u64) -> Balance {
    Balance::from_raw(U256::from(milli) * U256::from(10u64).pow(U256::from(15u8)))
}

/// A chain whose blocks `[first, first + timestamps.len())` carry the given timestamps.
pub struct FakeChain {
    first: BlockRef,
    timestamps: Vec<u64>,
    pub fail_at: Option<BlockRef>,
    pub missing: Option<BlockRef>,
    calls: AtomicUsize,
}

impl FakeChain {
    pub fn new(first: BlockRef, timestamps: Vec<u64>) -> Self {
        Self {
            first,
            timestamps,
            fail_at: None,
            missing: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// `count` blocks from `first`, 12 seconds apart starting at `genesis`.
    pub fn regular(first: BlockRef, count: usize, genesis: u64) -> Self {
        Self::new(first, (0..count as u64).map(|i| genesis + 12 * i).collect())
    }

    pub fn head(&self) -> BlockRef {
        self.first + self.timestamps.len() as u64 - 1
    }

    pub fn block(&self, height: BlockRef) -> Block {
        let index = (height - self.first) as usize;
        Block::new(height, TimePoint::from_secs(self.timestamps[index]))
    }

    /// Total number of requests served, head lookups included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BlockSource for FakeChain {
    async fn head_height(&self) -> Result<BlockRef, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.head())
    }

    async fn block_by_height(&self, height: BlockRef) -> Result<Option<Block>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(height) {
            return Err(format!("connection reset fetching {height}").into());
        }
        if self.missing == Some(height) || height < self.first || height > self.head() {
            return Ok(None);
        }
        Ok(Some(self.block(height)))
    }
}

/// Holder pages served in order plus per address native balances.
#[derive(Default)]
pub struct FakeAssets {
    pages: Vec<Vec<HolderAddress>>,
    balances: HashMap<HolderAddress, Vec<TokenBalance>>,
    pub failing_page: Option<usize>,
    pub failing_addresses: HashSet<HolderAddress>,
    page_requests: Mutex<Vec<(Address, BlockRef, usize, usize)>>,
    balance_requests: Mutex<Vec<(HolderAddress, BlockRef)>>,
}

impl FakeAssets {
    pub fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|page| page.into_iter().map(HolderAddress::from).collect())
                .collect(),
            ..Default::default()
        }
    }

    pub fn with_native(mut self, address: &str, balance: Balance) -> Self {
        self.balances
            .entry(address.into())
            .or_default()
            .push(TokenBalance {
                ticker: Some("ETH".to_string()),
                balance,
            });
        self
    }

    pub fn with_token(mut self, address: &str, ticker: &str, balance: Balance) -> Self {
        self.balances
            .entry(address.into())
            .or_default()
            .push(TokenBalance {
                ticker: Some(ticker.to_string()),
                balance,
            });
        self
    }

    pub fn page_requests(&self) -> Vec<(Address, BlockRef, usize, usize)> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn balance_requests(&self) -> Vec<(HolderAddress, BlockRef)> {
        self.balance_requests.lock().unwrap().clone()
    }
}

impl AssetSource for FakeAssets {
    async fn holders_page(
        &self,
        contract: Address,
        block: BlockRef,
        page_size: usize,
        page_number: usize,
    ) -> Result<HolderPage, SourceError> {
        self.page_requests
            .lock()
            .unwrap()
            .push((contract, block, page_size, page_number));

        if self.failing_page == Some(page_number) {
            return Err("502 Bad Gateway".into());
        }

        Ok(HolderPage {
            holders: self.pages.get(page_number).cloned().unwrap_or_default(),
            has_more: page_number + 1 < self.pages.len(),
        })
    }

    async fn historical_balances(
        &self,
        address: &HolderAddress,
        block: BlockRef,
    ) -> Result<Vec<TokenBalance>, SourceError> {
        self.balance_requests
            .lock()
            .unwrap()
            .push((address.clone(), block));

        if self.failing_addresses.contains(address) {
            return Err(format!("timeout fetching {address}").into());
        }

        Ok(self.balances.get(address).cloned().unwrap_or_default())
    }
}

/// Pacer that only counts how often it was waited on.
#[derive(Default)]
pub struct CountingPacer {
    waits: AtomicUsize,
}

impl CountingPacer {
    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }
}

impl Pacer for CountingPacer {
    async fn wait(&self) {
        self.waits.fetch_add(1, Ordering::SeqCst);
    }
}
