//! Services the snapshot pipeline reads chain state from.
//!
//! Transport, authentication and retries are the implementor's concern. Errors are
//! boxed so that the pipeline does not depend on any particular client.

use std::future::Future;

use alloy::primitives::Address;

use crate::{Balance, Block, BlockRef, HolderAddress};

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

pub trait BlockSource {
    /// Height of the latest block known to the source.
    fn head_height(&self) -> impl Future<Output = Result<BlockRef, SourceError>> + Send;

    /// `Ok(None)` if the source has no block at `height`.
    fn block_by_height(
        &self,
        height: BlockRef,
    ) -> impl Future<Output = Result<Option<Block>, SourceError>> + Send;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolderPage {
    pub holders: Vec<HolderAddress>,
    pub has_more: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenBalance {
    pub ticker: Option<String>,
    pub balance: Balance,
}

pub trait AssetSource {
    /// One page of the holders of `contract` at `block`, pages are numbered from zero.
    fn holders_page(
        &self,
        contract: Address,
        block: BlockRef,
        page_size: usize,
        page_number: usize,
    ) -> impl Future<Output = Result<HolderPage, SourceError>> + Send;

    /// Every token balance `address` held at `block`, the native asset included.
    fn historical_balances(
        &self,
        address: &HolderAddress,
        block: BlockRef,
    ) -> impl Future<Output = Result<Vec<TokenBalance>, SourceError>> + Send;
}

impl<T: BlockSource + Sync> BlockSource for &T {
    fn head_height(&self) -> impl Future<Output = Result<BlockRef, SourceError>> + Send {
        (**self).head_height()
    }

    fn block_by_height(
        &self,
        height: BlockRef,
    ) -> impl Future<Output = Result<Option<Block>, SourceError>> + Send {
        (**self).block_by_height(height)
    }
}

impl<T: AssetSource + Sync> AssetSource for &T {
    fn holders_page(
        &self,
        contract: Address,
        block: BlockRef,
        page_size: usize,
        page_number: usize,
    ) -> impl Future<Output = Result<HolderPage, SourceError>> + Send {
        (**self).holders_page(contract, block, page_size, page_number)
    }

    fn historical_balances(
        &self,
        address: &HolderAddress,
        block: BlockRef,
    ) -> impl Future<Output = Result<Vec<TokenBalance>, SourceError>> + Send {
        (**self).historical_balances(address, block)
    }
}
