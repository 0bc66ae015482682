use std::collections::HashSet;

use snapshot_common::{
    AggregationResult, AssetSource, Balance, BlockRef, HolderAddress, SourceError,
};
use tracing::{debug, info};

use crate::{AggregationError, Pacer};

/// Sums native balances of holders at a block, one lookup at a time.
pub struct BalanceAggregator<S, P> {
    source: S,
    pacer: P,
    native_ticker: String,
}

impl<S: AssetSource, P: Pacer> BalanceAggregator<S, P> {
    pub fn new(source: S, pacer: P, native_ticker: impl Into<String>) -> Self {
        Self {
            source,
            pacer,
            native_ticker: native_ticker.into(),
        }
    }

    pub async fn aggregate<'a, I>(
        &self,
        addresses: I,
        block: BlockRef,
        exclude: &HashSet<HolderAddress>,
    ) -> Result<AggregationResult, AggregationError>
    where
        I: IntoIterator<Item = &'a HolderAddress>,
    {
        self.aggregate_with(addresses, block, exclude, |_, _, _| {})
            .await
    }

    /// Like [`Self::aggregate`], calling `on_entry` with the 1-based position,
    /// address and balance of every entry right after it is recorded.
    pub async fn aggregate_with<'a, I, F>(
        &self,
        addresses: I,
        block: BlockRef,
        exclude: &HashSet<HolderAddress>,
        mut on_entry: F,
    ) -> Result<AggregationResult, AggregationError>
    where
        I: IntoIterator<Item = &'a HolderAddress>,
        F: FnMut(usize, &HolderAddress, Balance),
    {
        let mut result = AggregationResult::new();
        let mut skipped = 0usize;

        for address in addresses {
            if exclude.contains(address) {
                debug!(%address, "skipping excluded address");
                skipped += 1;
                continue;
            }

            let balance = match self.balance_at(address, block).await {
                Ok(balance) => balance,
                Err(source) => {
                    return Err(AggregationError::BalanceLookup {
                        address: address.clone(),
                        partial: Box::new(result),
                        source,
                    })
                }
            };

            result.push(address.clone(), balance);
            on_entry(result.len(), address, balance);

            self.pacer.wait().await;
        }

        info!(
            block,
            holders = result.len(),
            skipped,
            total = %result.total().raw(),
            "aggregated balances"
        );
        Ok(result)
    }

    /// Native balance of `address` at `block`, zero when the source lists none.
    pub async fn balance_at(
        &self,
        address: &HolderAddress,
        block: BlockRef,
    ) -> Result<Balance, SourceError> {
        let balances = self.source.historical_balances(address, block).await?;

        Ok(balances
            .into_iter()
            .find(|entry| entry.ticker.as_deref() == Some(self.native_ticker.as_str()))
            .map(|entry| entry.balance)
            .unwrap_or_default())
    }
}
