//! Exchange-rate table and currency conversion.
//!
//! Every rate is relative to one base currency. Missing codes make a
//! conversion fall through to the original amount instead of failing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entities::{CurrencyCode, BASE_CURRENCY};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base: CurrencyCode,
    rates: BTreeMap<CurrencyCode, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::empty(BASE_CURRENCY)
    }
}

impl RateTable {
    /// Table with no rates; every conversion against it is a no-op.
    pub fn empty(base: impl Into<CurrencyCode>) -> Self {
        Self {
            base: base.into(),
            rates: BTreeMap::new(),
        }
    }

    pub fn new<I, K>(base: impl Into<CurrencyCode>, rates: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<CurrencyCode>,
    {
        Self {
            base: base.into(),
            rates: rates.into_iter().map(|(code, rate)| (code.into(), rate)).collect(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn insert(&mut self, code: impl Into<CurrencyCode>, rate: f64) {
        self.rates.insert(code.into(), rate);
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Currency codes in alphabetical order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    /// Convert `amount` between two currencies through the base.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        convert(amount, from, to, self)
    }
}

/// Convert `amount` from `from` to `to` as `amount / rate[from] * rate[to]`.
///
/// Returns `amount` unchanged when the codes match, when either code is
/// absent from `table`, or when either rate is not a positive finite number.
/// No rounding is applied.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    if from == to {
        return amount;
    }
    let (Some(from_rate), Some(to_rate)) = (usable_rate(table, from), usable_rate(table, to)) else {
        return amount;
    };
    amount / from_rate * to_rate
}

fn usable_rate(table: &RateTable, code: &str) -> Option<f64> {
    table
        .rate(code)
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}
