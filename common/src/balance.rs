use std::ops::{Add, AddAssign};

use alloy::primitives::{utils::format_units, U256};
use serde::Serialize;

use crate::HolderAddress;

// 10^77 is the largest power of ten that fits in a U256
const MAX_DECIMALS: u8 = 77;

/// Amount in the smallest unit of the chain's native currency (wei on Ethereum).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Balance(U256);

impl Balance {
    pub const ZERO: Balance = Balance(U256::ZERO);

    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Full precision human scaled amount, e.g. `1.500000000000000000`.
    pub fn to_units(&self, decimals: u8) -> String {
        format_units(self.0, decimals).unwrap_or_else(|_| self.0.to_string())
    }

    /// Human scaled amount rounded half up to `precision` fractional digits.
    pub fn format_fixed(&self, decimals: u8, precision: u8) -> String {
        let decimals = decimals.min(MAX_DECIMALS);
        let precision = precision.min(decimals);

        let ten = U256::from(10u8);
        let dropped = ten.pow(U256::from(decimals - precision));
        let mut rounded = self.0 / dropped;
        if (self.0 % dropped) * U256::from(2u8) >= dropped {
            rounded = rounded.saturating_add(U256::from(1u8));
        }

        if precision == 0 {
            return rounded.to_string();
        }

        let unit = ten.pow(U256::from(precision));
        format!(
            "{}.{:0>width$}",
            rounded / unit,
            (rounded % unit).to_string(),
            width = precision as usize
        )
    }
}

impl From<U256> for Balance {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl Add for Balance {
    type Output = Balance;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Balance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Balance::ZERO, Add::add)
    }
}

/// Per holder balances in processing order plus their running total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    per_address: Vec<(HolderAddress, Balance)>,
    total: Balance,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, address: HolderAddress, balance: Balance) {
        self.total += balance;
        self.per_address.push((address, balance));
    }

    pub fn per_address(&self) -> &[(HolderAddress, Balance)] {
        &self.per_address
    }

    pub fn total(&self) -> Balance {
        self.total
    }

    pub fn len(&self) -> usize {
        self.per_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_address.is_empty()
    }
}
