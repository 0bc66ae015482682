use alloy::primitives::Address;
use futures::{stream, Stream, TryStreamExt};
use snapshot_common::{AssetSource, BlockRef, HolderAddress};
use tracing::{debug, info};

use crate::EnumerationError;

pub const PAGE_SIZE: usize = 1000;

pub struct HolderEnumerator<S> {
    source: S,
    page_size: usize,
}

impl<S: AssetSource> HolderEnumerator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Lazily walks the holder pages of `contract` at `block` in order.
    ///
    /// The stream is single pass and ends after the first page that reports no
    /// further pages (or comes back empty). A failed page ends it with an error.
    pub fn holders(
        &self,
        contract: Address,
        block: BlockRef,
    ) -> impl Stream<Item = Result<HolderAddress, EnumerationError>> + '_ {
        stream::try_unfold(Some(0usize), move |next| self.next_page(contract, block, next))
            .map_ok(|holders| stream::iter(holders.into_iter().map(Ok::<_, EnumerationError>)))
            .try_flatten()
    }

    async fn next_page(
        &self,
        contract: Address,
        block: BlockRef,
        next: Option<usize>,
    ) -> Result<Option<(Vec<HolderAddress>, Option<usize>)>, EnumerationError> {
        let Some(page_number) = next else {
            return Ok(None);
        };

        let page = self
            .source
            .holders_page(contract, block, self.page_size, page_number)
            .await
            .map_err(|source| EnumerationError::Page {
                page_number,
                source,
            })?;
        debug!(
            page_number,
            holders = page.holders.len(),
            has_more = page.has_more,
            "holders page"
        );

        // an empty page ends the walk even if the source claims there is more
        let next = (page.has_more && !page.holders.is_empty()).then_some(page_number + 1);
        Ok(Some((page.holders, next)))
    }

    /// All holders, in page order. Any failed page fails the whole enumeration.
    pub async fn enumerate(
        &self,
        contract: Address,
        block: BlockRef,
    ) -> Result<Vec<HolderAddress>, EnumerationError> {
        let holders: Vec<HolderAddress> = self.holders(contract, block).try_collect().await?;
        info!(%contract, block, holders = holders.len(), "enumerated holders");
        Ok(holders)
    }
}
