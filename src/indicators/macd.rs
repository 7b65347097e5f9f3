//! Moving Average Convergence Divergence.

use crate::{indicators::Ema, IndicatorError, Period, Result};

impl_with_defaults!(Macd);

/// The three MACD series.
///
/// `macd` starts at input index `slow - 1`; `signal` is index-aligned with
/// `macd`; `histogram[i] = macd[i + signal_period - 1] - signal[i]`, i.e. the
/// histogram pairs each signal value with the macd value it smooths toward.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Fast/slow EMA difference with a signal EMA over the difference.
///
/// Both EMAs use the raw-price seeding of [`Ema`]; the `slow - 1` start of
/// the macd line is a windowing convention (the raw-seeded EMA is defined
/// from index 0), kept so values line up with the conventional presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Macd {
    pub fast: Period,
    pub slow: Period,
    pub signal: Period,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: Period::new_const(12),
            slow: Period::new_const(26),
            signal: Period::new_const(9),
        }
    }
}

impl Macd {
    pub fn new(fast: Period, slow: Period, signal: Period) -> Result<Self> {
        let macd = Self { fast, slow, signal };
        macd.validate_config()?;
        Ok(macd)
    }

    #[inline]
    pub fn min_len(&self) -> usize {
        self.slow.get() + self.signal.get()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.fast.get() >= self.slow.get() {
            return Err(IndicatorError::InvalidConfig(format!(
                "MACD fast period {} must be shorter than slow period {}",
                self.fast.get(),
                self.slow.get()
            )));
        }
        Ok(())
    }

    pub fn compute(&self, prices: &[f64]) -> Result<MacdSeries> {
        self.validate_config()?;
        if prices.len() < self.min_len() {
            return Err(IndicatorError::InsufficientData {
                need: self.min_len(),
                got: prices.len(),
            });
        }

        let fast_ema = Ema { period: self.fast }.compute(prices);
        let slow_ema = Ema { period: self.slow }.compute(prices);

        let start = self.slow.get() - 1;
        let macd: Vec<f64> = (start..prices.len())
            .map(|i| fast_ema[i] - slow_ema[i])
            .collect();

        let signal = Ema {
            period: self.signal,
        }
        .compute(&macd);

        let offset = self.signal.get() - 1;
        let histogram: Vec<f64> = signal
            .iter()
            .enumerate()
            .take_while(|(i, _)| i + offset < macd.len())
            .map(|(i, s)| macd[i + offset] - s)
            .collect();

        Ok(MacdSeries {
            macd,
            signal,
            histogram,
        })
    }
}

// ============================================================
// PARAMETER METADATA
// ============================================================

use std::collections::HashMap;

use crate::params::{get_period, ParamMeta, ParameterizedIndicator};

static MACD_PARAMS: &[ParamMeta] = &[
    ParamMeta::period("fast", 12.0, (8.0, 16.0, 2.0), "Fast EMA period"),
    ParamMeta::period("slow", 26.0, (20.0, 32.0, 2.0), "Slow EMA period"),
    ParamMeta::period("signal", 9.0, (5.0, 13.0, 2.0), "Signal EMA period"),
];

impl ParameterizedIndicator for Macd {
    fn param_meta() -> &'static [ParamMeta] {
        MACD_PARAMS
    }

    fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
        Macd::new(
            get_period(params, "fast", 12)?,
            get_period(params, "slow", 26)?,
            get_period(params, "signal", 9)?,
        )
    }

    fn indicator_id_str() -> &'static str {
        "MACD"
    }
}
