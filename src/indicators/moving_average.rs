//! Simple and exponential moving averages.

use crate::Period;

impl_with_defaults!(Sma, Ema);

// ============================================================
// SIMPLE MOVING AVERAGE
// ============================================================

/// Arithmetic mean over a trailing window of closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sma {
    pub period: Period,
}

impl Default for Sma {
    fn default() -> Self {
        Self {
            period: Period::new_const(20),
        }
    }
}

impl Sma {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    /// Series aligned index-for-index with the input: `None` until a full
    /// trailing window of `period` values exists, the window mean after.
    ///
    /// A period longer than the whole series yields an all-`None` series of
    /// the input length rather than an error, so composition stays total.
    pub fn compute(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let period = self.period.get();
        let mut out = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                out.push(None);
                continue;
            }
            let window = &prices[i + 1 - period..=i];
            let sum: f64 = window.iter().sum();
            out.push(Some(sum / period as f64));
        }

        out
    }
}

// ============================================================
// EXPONENTIAL MOVING AVERAGE
// ============================================================

/// Exponential moving average with smoothing constant `k = 2/(period+1)`.
///
/// Seeded from the first raw price, NOT from an SMA of the first `period`
/// prices. The raw seed shifts early values versus the SMA-seeded variant
/// and [`Macd`](crate::indicators::Macd) depends on it; do not change the
/// seeding without recomputing every downstream MACD expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ema {
    pub period: Period,
}

impl Default for Ema {
    fn default() -> Self {
        Self {
            period: Period::new_const(20),
        }
    }
}

impl Ema {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    /// Full series, defined from index 0: `ema[0] = price[0]`, then
    /// `ema[i] = price[i]*k + ema[i-1]*(1-k)`. Empty input yields an empty
    /// series.
    pub fn compute(&self, prices: &[f64]) -> Vec<f64> {
        let Some((&first, rest)) = prices.split_first() else {
            return Vec::new();
        };

        let k = 2.0 / (self.period.get() as f64 + 1.0);
        let mut out = Vec::with_capacity(prices.len());
        let mut ema = first;
        out.push(ema);

        for &price in rest {
            ema = price * k + ema * (1.0 - k);
            out.push(ema);
        }

        out
    }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

use std::collections::HashMap;

use crate::params::{get_period, ParamMeta, ParameterizedIndicator};
use crate::Result;

static SMA_PARAMS: &[ParamMeta] = &[ParamMeta::period(
    "period",
    20.0,
    (5.0, 60.0, 5.0),
    "Trailing window length",
)];

static EMA_PARAMS: &[ParamMeta] = &[ParamMeta::period(
    "period",
    20.0,
    (5.0, 60.0, 5.0),
    "Smoothing period (k = 2/(period+1))",
)];

impl ParameterizedIndicator for Sma {
    fn param_meta() -> &'static [ParamMeta] {
        SMA_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            period: get_period(params, "period", 20)?,
        })
    }

    fn indicator_id_str() -> &'static str {
        "SMA"
    }
}

impl ParameterizedIndicator for Ema {
    fn param_meta() -> &'static [ParamMeta] {
        EMA_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            period: get_period(params, "period", 20)?,
        })
    }

    fn indicator_id_str() -> &'static str {
        "EMA"
    }
}
