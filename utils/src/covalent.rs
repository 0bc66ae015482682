//! Client for the Covalent (GoldRush) data API.
//!
//! docs: https://goldrush.dev/docs/api

use std::fmt::Debug;

use alloy::primitives::{Address, U256};
use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Deserialize,
};
use snapshot_common::{
    AssetSource, Balance, BlockRef, HolderAddress, HolderPage, SourceError, TokenBalance,
};
use tracing::debug;

use crate::{reqwest::ReqwestStage, serde::SerdeResponseParse, Reqwest, RetryPolicy};

pub const COVALENT_API_URL: &str = "https://api.covalenthq.com/v1";

#[derive(Debug, Deserialize)]
pub struct CovalentResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub error: bool,
    pub error_message: Option<String>,
    pub error_code: Option<u16>,
}

impl<T> CovalentResponse<T> {
    pub fn into_data(self) -> crate::Result<T> {
        if self.error {
            return Err(crate::Error::CovalentApi {
                code: self.error_code,
                message: self.error_message.unwrap_or_default(),
            });
        }
        self.data
            .ok_or(crate::Error::CovalentResponse("data field missing"))
    }
}

#[derive(Debug, Deserialize)]
pub struct Items<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub has_more: Option<bool>,
    pub page_number: Option<u64>,
    pub page_size: Option<u64>,
    pub total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct TokenHolder {
    pub address: String,
    pub balance: Option<String>,
    pub block_height: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalBalance {
    pub contract_ticker_symbol: Option<String>,
    pub contract_decimals: Option<u8>,
    pub contract_address: Option<String>,
    pub balance: Option<String>,
    #[serde(default)]
    pub native_token: bool,
}

impl Items<TokenHolder> {
    pub fn into_holder_page(self) -> HolderPage {
        HolderPage {
            has_more: self
                .pagination
                .and_then(|p| p.has_more)
                .unwrap_or(false),
            holders: self
                .items
                .into_iter()
                .map(|item| HolderAddress::new(item.address))
                .collect(),
        }
    }
}

impl Items<HistoricalBalance> {
    pub fn into_token_balances(self) -> crate::Result<Vec<TokenBalance>> {
        self.items
            .into_iter()
            .map(|item| {
                Ok(TokenBalance {
                    ticker: item.contract_ticker_symbol,
                    balance: parse_balance(item.balance.as_deref())?,
                })
            })
            .collect()
    }
}

/// Balances come as decimal strings in the smallest unit, `null` meaning zero.
fn parse_balance(raw: Option<&str>) -> crate::Result<Balance> {
    match raw {
        None => Ok(Balance::ZERO),
        Some(raw) => U256::from_str_radix(raw, 10)
            .map(Balance::from_raw)
            .map_err(|_| crate::Error::InvalidBalance(raw.to_string())),
    }
}

pub struct CovalentClient {
    api_key: String,
    chain_name: String,
    base_url: String,
    retry: RetryPolicy,
}

impl CovalentClient {
    pub fn new(api_key: impl Into<String>, chain_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            chain_name: chain_name.into(),
            base_url: COVALENT_API_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    // docs: https://goldrush.dev/docs/api/balances/get-token-holders-as-of-any-block-height-v2
    pub async fn token_holders(
        &self,
        contract: Address,
        block: BlockRef,
        page_size: usize,
        page_number: usize,
    ) -> crate::Result<HolderPage> {
        let url = format!(
            "{}/{}/tokens/{contract}/token_holders_v2/",
            self.base_url, self.chain_name
        );

        let request = Reqwest::get(url)?.query(&[
            ("block-height", block.to_string()),
            ("page-size", page_size.to_string()),
            ("page-number", page_number.to_string()),
        ]);

        let page = self
            .fetch::<Items<TokenHolder>>(request)
            .await?
            .into_holder_page();
        debug!(
            page_number,
            holders = page.holders.len(),
            has_more = page.has_more,
            "fetched token holders page"
        );
        Ok(page)
    }

    // docs: https://goldrush.dev/docs/api/balances/get-historical-token-balances-for-address
    pub async fn historical_token_balances(
        &self,
        address: &HolderAddress,
        block: BlockRef,
    ) -> crate::Result<Vec<TokenBalance>> {
        let url = format!(
            "{}/{}/address/{address}/historical_balances/",
            self.base_url, self.chain_name
        );

        let request = Reqwest::get(url)?.query(&[("block-height", block.to_string())]);

        self.fetch::<Items<HistoricalBalance>>(request)
            .await?
            .into_token_balances()
    }

    async fn fetch<T: Debug + DeserializeOwned>(&self, request: Reqwest) -> crate::Result<T> {
        request
            .bearer_auth(&self.api_key)
            .retry(self.retry)
            .receive_json::<CovalentResponse<T>>()
            .await
            .map_err(api_error)?
            .into_data()
    }
}

/// Rejected requests (bad key, unknown chain) carry the Covalent error
/// envelope in the body of a 4xx response.
fn api_error(err: crate::Error) -> crate::Error {
    let api_error = match &err {
        crate::Error::ReqwestFailed {
            stage: ReqwestStage::Status,
            context,
            ..
        } => context
            .response_body
            .as_str()
            .serde_parse_custom::<CovalentResponse<IgnoredAny>>()
            .ok()
            .filter(|response| response.error)
            .and_then(|response| response.into_data().err()),
        _ => None,
    };
    api_error.unwrap_or(err)
}

impl AssetSource for CovalentClient {
    async fn holders_page(
        &self,
        contract: Address,
        block: BlockRef,
        page_size: usize,
        page_number: usize,
    ) -> Result<HolderPage, SourceError> {
        Ok(self
            .token_holders(contract, block, page_size, page_number)
            .await?)
    }

    async fn historical_balances(
        &self,
        address: &HolderAddress,
        block: BlockRef,
    ) -> Result<Vec<TokenBalance>, SourceError> {
        Ok(self.historical_token_balances(address, block).await?)
    }
}
