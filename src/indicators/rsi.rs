//! Relative Strength Index (Wilder smoothing) and the stochastic oscillator
//! applied to it.

use crate::{IndicatorError, Period, Result};

impl_with_defaults!(Rsi, StochRsi);

// ============================================================
// RSI
// ============================================================

/// Wilder's smoothed RSI, bounded 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rsi {
    pub period: Period,
}

impl Default for Rsi {
    fn default() -> Self {
        Self {
            period: Period::new_const(14),
        }
    }
}

impl Rsi {
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    /// Minimum series length: one delta per period slot plus the base price.
    #[inline]
    pub fn min_len(&self) -> usize {
        self.period.get() + 1
    }

    /// Series aligned with the input. Indices `0..period` are `None`; the
    /// value at index `period` comes from the initial average gain/loss over
    /// the first `period` deltas, and each later index applies Wilder's
    /// update `avg = (avg*(period-1) + x)/period`.
    pub fn compute(&self, prices: &[f64]) -> Result<Vec<Option<f64>>> {
        let period = self.period.get();
        if prices.len() < self.min_len() {
            return Err(IndicatorError::InsufficientData {
                need: self.min_len(),
                got: prices.len(),
            });
        }

        let mut out = vec![None; prices.len()];
        let p = period as f64;

        let mut gains = 0.0;
        let mut losses = 0.0;
        for i in 1..=period {
            let diff = prices[i] - prices[i - 1];
            if diff >= 0.0 {
                gains += diff;
            } else {
                losses -= diff;
            }
        }

        let mut avg_gain = gains / p;
        let mut avg_loss = losses / p;
        out[period] = Some(rsi_value(avg_gain, avg_loss));

        for i in period + 1..prices.len() {
            let diff = prices[i] - prices[i - 1];
            let gain = diff.max(0.0);
            let loss = (-diff).max(0.0);

            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
            out[i] = Some(rsi_value(avg_gain, avg_loss));
        }

        Ok(out)
    }
}

/// `RSI = 100 - 100/(1+RS)` with `RS = avg_gain/avg_loss`.
///
/// A zero average loss sends RS to +infinity and saturates RSI at 100; a
/// window with neither gains nor losses has no direction and maps to the
/// neutral 50 instead of dividing zero by zero.
#[inline]
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// ============================================================
// STOCHASTIC RSI
// ============================================================

/// %K and %D series aligned with the input price indices.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StochRsiSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// Stochastic oscillator applied to RSI values instead of raw price.
///
/// The raw stochastic ranges each RSI value against the min/max of the
/// trailing `period` RSI values; `%K` smooths the raw line over `k_period`
/// and `%D` smooths `%K` over `d_period`, both by simple moving average.
/// Values share RSI's 0..=100 scale; a degenerate window (`max == min`)
/// emits the neutral 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StochRsi {
    pub period: Period,
    pub k_period: Period,
    pub d_period: Period,
}

impl Default for StochRsi {
    fn default() -> Self {
        Self {
            period: Period::new_const(14),
            k_period: Period::new_const(3),
            d_period: Period::new_const(3),
        }
    }
}

impl StochRsi {
    pub fn new(period: Period, k_period: Period, d_period: Period) -> Self {
        Self {
            period,
            k_period,
            d_period,
        }
    }

    /// Minimum series length: RSI history, a full stochastic window, and
    /// enough raw stochastic values to smooth the first %K. Guarantees at
    /// least one defined %K value in the output.
    #[inline]
    pub fn min_len(&self) -> usize {
        self.period.get() * 2 + self.k_period.get() - 1
    }

    pub fn compute(&self, prices: &[f64]) -> Result<StochRsiSeries> {
        let period = self.period.get();
        if prices.len() < self.min_len() {
            return Err(IndicatorError::InsufficientData {
                need: self.min_len(),
                got: prices.len(),
            });
        }

        let rsi = Rsi {
            period: self.period,
        }
        .compute(prices)?;

        let raw = stochastic(&rsi, period);
        let k = option_sma(&raw, self.k_period.get());
        let d = option_sma(&k, self.d_period.get());

        Ok(StochRsiSeries { k, d })
    }
}

/// Raw stochastic of a partially-defined series over a trailing window.
/// Defined only where the entire window is defined.
fn stochastic(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len()];

    for i in 0..series.len() {
        if i + 1 < window {
            continue;
        }
        let Some(current) = series[i] else { continue };

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut complete = true;
        for value in &series[i + 1 - window..=i] {
            match value {
                Some(v) => {
                    min = min.min(*v);
                    max = max.max(*v);
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            continue;
        }

        out[i] = Some(if max - min == 0.0 {
            50.0
        } else {
            100.0 * (current - min) / (max - min)
        });
    }

    out
}

/// Simple moving average over a partially-defined series. Defined only where
/// the entire trailing window is defined.
fn option_sma(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; series.len()];

    for i in 0..series.len() {
        if i + 1 < window {
            continue;
        }

        let mut sum = 0.0;
        let mut complete = true;
        for value in &series[i + 1 - window..=i] {
            match value {
                Some(v) => sum += v,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            out[i] = Some(sum / window as f64);
        }
    }

    out
}

// ============================================================
// PARAMETER METADATA
// ============================================================

use std::collections::HashMap;

use crate::params::{get_period, ParamMeta, ParameterizedIndicator};

static RSI_PARAMS: &[ParamMeta] = &[ParamMeta::period(
    "period",
    14.0,
    (7.0, 28.0, 7.0),
    "Wilder smoothing period",
)];

static STOCH_RSI_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("period", 14.0, (7.0, 28.0, 7.0), "RSI and stochastic window period"),
    ParamMeta::period("k_period", 3.0, (2.0, 5.0, 1.0), "%K smoothing period"),
    ParamMeta::period("d_period", 3.0, (2.0, 5.0, 1.0), "%D smoothing period"),
];

impl ParameterizedIndicator for Rsi {
    fn param_meta() -> &'static [ParamMeta] {
        RSI_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            period: get_period(params, "period", 14)?,
        })
    }

    fn indicator_id_str() -> &'static str {
        "RSI"
    }
}

impl ParameterizedIndicator for StochRsi {
    fn param_meta() -> &'static [ParamMeta] {
        STOCH_RSI_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Ok(Self {
            period: get_period(params, "period", 14)?,
            k_period: get_period(params, "k_period", 3)?,
            d_period: get_period(params, "d_period", 3)?,
        })
    }

    fn indicator_id_str() -> &'static str {
        "STOCH_RSI"
    }
}
