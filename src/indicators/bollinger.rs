//! Bollinger Bands: a moving average with bands offset by a multiple of the
//! rolling standard deviation.

use crate::{Multiplier, Period};

impl_with_defaults!(Bollinger);

/// One band triple. `lower <= middle <= upper` always holds; the three
/// coincide over a constant window.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Band {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bollinger {
    pub period: Period,
    pub multiplier: Multiplier,
}

impl Default for Bollinger {
    fn default() -> Self {
        Self {
            period: Period::new_const(20),
            multiplier: Multiplier::new_const(2.0),
        }
    }
}

impl Bollinger {
    pub fn new(period: Period, multiplier: Multiplier) -> Self {
        Self { period, multiplier }
    }

    /// Series aligned index-for-index with the input: `None` until a full
    /// trailing window exists. Short input degrades to all-`None`, same
    /// policy as [`Sma`](crate::indicators::Sma).
    pub fn compute(&self, prices: &[f64]) -> Vec<Option<Band>> {
        let period = self.period.get();
        let mut out = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                out.push(None);
                continue;
            }
            out.push(Some(self.band_over(&prices[i + 1 - period..=i])));
        }

        out
    }

    /// Band at the most recent index, if a full window exists.
    pub fn latest(&self, prices: &[f64]) -> Option<Band> {
        let period = self.period.get();
        if prices.len() < period {
            return None;
        }
        Some(self.band_over(&prices[prices.len() - period..]))
    }

    fn band_over(&self, window: &[f64]) -> Band {
        let n = window.len() as f64;
        let middle = window.iter().sum::<f64>() / n;

        // Population variance: the window is the whole population, so the
        // divisor is `period`, not `period - 1`.
        let variance = window.iter().map(|p| (p - middle).powi(2)).sum::<f64>() / n;
        let offset = self.multiplier.get() * variance.sqrt();

        Band {
            middle,
            upper: middle + offset,
            lower: middle - offset,
        }
    }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

use std::collections::HashMap;

use crate::params::{get_multiplier, get_period, ParamMeta, ParameterizedIndicator};
use crate::Result;

static BOLLINGER_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("period", 20.0, (10.0, 40.0, 5.0), "Rolling window length"),
    ParamMeta::multiplier("multiplier", 2.0, (1.0, 3.0, 0.5), "Standard-deviation band width"),
];

impl ParameterizedIndicator for Bollinger {
    fn param_meta() -> &'static [ParamMeta] {
        BOLLINGER_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            period: get_period(params, "period", 20)?,
            multiplier: get_multiplier(params, "multiplier", 2.0)?,
        })
    }

    fn indicator_id_str() -> &'static str {
        "BOLLINGER"
    }
}
