//! Average True Range.

use crate::{IndicatorError, OHLCVExt, Period, Result, OHLCV};

impl_with_defaults!(Atr);

/// Simple (non-Wilder-smoothed) average of the first `period` true ranges.
///
/// The sample is drawn from the **oldest** `period + 1` candles in the slice;
/// later candles do not contribute. The true range of each consecutive pair
/// is the greatest of `high - low`, `|high - prev_close|` and
/// `|low - prev_close|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atr {
    pub period: Period,
}

impl Default for Atr {
    fn default() -> Self {
        Self {
            period: Period::new_const(14),
        }
    }
}

impl Atr {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    /// Minimum candle count: `period` pairs need `period + 1` candles.
    #[inline]
    pub fn min_len(&self) -> usize {
        self.period.get() + 1
    }

    pub fn compute<T: OHLCV>(&self, candles: &[T]) -> Result<f64> {
        let period = self.period.get();
        if candles.len() < self.min_len() {
            return Err(IndicatorError::InsufficientData {
                need: self.min_len(),
                got: candles.len(),
            });
        }

        let sum: f64 = candles
            .windows(2)
            .take(period)
            .map(|pair| pair[1].true_range(pair[0].close()))
            .sum();

        Ok(sum / period as f64)
    }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

use std::collections::HashMap;

use crate::params::{get_period, ParamMeta, ParameterizedIndicator};

static ATR_PARAMS: &[ParamMeta] = &[ParamMeta::period(
    "period",
    14.0,
    (7.0, 28.0, 7.0),
    "Number of true-range samples averaged",
)];

impl ParameterizedIndicator for Atr {
    fn param_meta() -> &'static [ParamMeta] {
        ATR_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            period: get_period(params, "period", 14)?,
        })
    }

    fn indicator_id_str() -> &'static str {
        "ATR"
    }
}
