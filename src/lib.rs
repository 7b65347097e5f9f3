//! # indikit - technical indicator computations over OHLCV data
//!
//! Pure, allocation-per-call indicator math: SMA, EMA, RSI, Stochastic RSI,
//! Bollinger Bands, MACD and ATR. No I/O, no shared state, no caching - every
//! call reads its inputs and returns a fresh result, so indicators can be
//! invoked concurrently without coordination.
//!
//! ## Quick Start
//!
//! ```rust
//! use indikit::prelude::*;
//!
//! // Define your OHLCV data
//! struct Bar { o: f64, h: f64, l: f64, c: f64, v: f64 }
//!
//! impl OHLCV for Bar {
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//!     fn volume(&self) -> f64 { self.v }
//! }
//!
//! // Compute a single indicator over the close series
//! let closes = [10.0, 12.0, 11.0, 13.0, 15.0];
//! let sma = Sma::new(Period::new(3).unwrap()).compute(&closes);
//! assert_eq!(sma[2], Some(11.0));
//!
//! // Or build a snapshot engine covering the whole set
//! let engine = SnapshotBuilder::new()
//!     .with_all_defaults()
//!     .window(OutputWindow::LastN(3))
//!     .build()
//!     .unwrap();
//!
//! let bars: Vec<Bar> = vec![];
//! let snapshot = engine.snapshot(&bars).unwrap();
//! ```

pub mod indicators;
pub mod params;

pub mod prelude {
    pub use crate::{
        // Indicators
        indicators::*,
        // Parameters
        params::{get_multiplier, get_period, ParamMeta, ParamType, ParameterizedIndicator},
        // Parallel
        snapshot_parallel,
        // Errors
        IndicatorError,
        // Types
        Multiplier,
        OHLCVExt,
        OutputWindow,
        Period,
        Result,
        // Engine
        Snapshot,
        SnapshotBuilder,
        SnapshotConfig,
        SnapshotEngine,
        SnapshotError,
        SnapshotResult,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, IndicatorError>;

/// Errors that can occur when configuring or computing indicators
#[derive(Debug, Clone, thiserror::Error)]
pub enum IndicatorError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {need} candles, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("Invalid OHLCV at index {index}: {reason}")]
    InvalidOHLCV { index: usize, reason: &'static str },
}

impl IndicatorError {
    /// True for the expected "series too short" condition, as opposed to a
    /// configuration or data-quality error.
    #[inline]
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, IndicatorError::InsufficientData { .. })
    }
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Lookback period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(IndicatorError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    /// Create a Period from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

/// Standard-deviation multiplier (must be finite and > 0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Multiplier(f64);

impl Multiplier {
    /// Create a new Multiplier, validating the value is finite and positive
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(IndicatorError::InvalidValue(
                "Multiplier cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 {
            return Err(IndicatorError::InvalidValue("Multiplier must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Multiplier {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Multiplier {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Multiplier::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// True range against the previous close: the greatest of high-low,
    /// |high - prev_close| and |low - prev_close|.
    #[inline]
    fn true_range(&self, prev_close: f64) -> f64 {
        let high_low = self.high() - self.low();
        let high_close = (self.high() - prev_close).abs();
        let low_close = (self.low() - prev_close).abs();
        high_low.max(high_close).max(low_close)
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        if self.high() < self.low() {
            return Err(IndicatorError::InvalidOHLCV {
                index: 0,
                reason: "high < low",
            });
        }
        if self.open().is_nan()
            || self.high().is_nan()
            || self.low().is_nan()
            || self.close().is_nan()
        {
            return Err(IndicatorError::InvalidOHLCV {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if self.open().is_infinite()
            || self.high().is_infinite()
            || self.low().is_infinite()
            || self.close().is_infinite()
        {
            return Err(IndicatorError::InvalidOHLCV {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

// ============================================================
// OUTPUT WINDOW
// ============================================================

/// Caller-facing truncation policy for series outputs.
///
/// Historical consumers variously wanted the full aligned series or only the
/// trailing few values (e.g. the last 3 for a prompt payload). Both are the
/// same computation; this makes the truncation an explicit configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputWindow {
    /// Full series, index-aligned with the input
    #[default]
    Full,
    /// Only the trailing `n` values (fewer if the series is shorter)
    LastN(usize),
}

impl OutputWindow {
    /// Apply the policy to a computed series.
    pub fn apply<T>(self, mut series: Vec<T>) -> Vec<T> {
        match self {
            OutputWindow::Full => series,
            OutputWindow::LastN(n) => {
                let excess = series.len().saturating_sub(n);
                series.drain(..excess);
                series
            }
        }
    }
}

// ============================================================
// SNAPSHOT ENGINE
// ============================================================

use indicators::{
    Atr, Band, Bollinger, Ema, Macd, MacdSeries, Rsi, Sma, StochRsi, StochRsiSeries,
};

/// Engine configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotConfig {
    pub window: OutputWindow,
    pub validate_data: bool,
}

/// Indicator values for one candle series, ready to hand to a signal
/// consumer. Fields for indicators that were not configured, or that did not
/// have enough history, serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct Snapshot {
    pub sma: Option<Vec<Option<f64>>>,
    pub ema: Option<Vec<f64>>,
    pub rsi: Option<Vec<Option<f64>>>,
    pub stoch_rsi: Option<StochRsiSeries>,
    pub bollinger: Option<Vec<Option<Band>>>,
    pub macd: Option<MacdSeries>,
    pub atr: Option<f64>,
}

/// Computes a configured set of indicators over one candle series.
///
/// Insufficient history for an individual indicator leaves its snapshot field
/// `None`; configuration and data-quality errors fail the whole snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotEngine {
    sma: Option<Sma>,
    ema: Option<Ema>,
    rsi: Option<Rsi>,
    stoch_rsi: Option<StochRsi>,
    bollinger: Option<Bollinger>,
    macd: Option<Macd>,
    atr: Option<Atr>,
    config: SnapshotConfig,
}

impl SnapshotEngine {
    /// Compute all configured indicators over `bars`.
    pub fn snapshot<T: OHLCV>(&self, bars: &[T]) -> Result<Snapshot> {
        if self.config.validate_data {
            self.validate_bars(bars)?;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close()).collect();
        let window = self.config.window;
        let mut snapshot = Snapshot::default();

        if let Some(sma) = &self.sma {
            snapshot.sma = Some(window.apply(sma.compute(&closes)));
        }
        if let Some(ema) = &self.ema {
            snapshot.ema = Some(window.apply(ema.compute(&closes)));
        }
        if let Some(rsi) = &self.rsi {
            snapshot.rsi = short_ok(rsi.compute(&closes))?.map(|s| window.apply(s));
        }
        if let Some(stoch) = &self.stoch_rsi {
            snapshot.stoch_rsi = short_ok(stoch.compute(&closes))?.map(|s| StochRsiSeries {
                k: window.apply(s.k),
                d: window.apply(s.d),
            });
        }
        if let Some(bollinger) = &self.bollinger {
            snapshot.bollinger = Some(window.apply(bollinger.compute(&closes)));
        }
        if let Some(macd) = &self.macd {
            snapshot.macd = short_ok(macd.compute(&closes))?.map(|m| MacdSeries {
                macd: window.apply(m.macd),
                signal: window.apply(m.signal),
                histogram: window.apply(m.histogram),
            });
        }
        if let Some(atr) = &self.atr {
            snapshot.atr = short_ok(atr.compute(bars))?;
        }

        Ok(snapshot)
    }

    fn validate_bars<T: OHLCV>(&self, bars: &[T]) -> Result<()> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|e| match e {
                IndicatorError::InvalidOHLCV { reason, .. } => {
                    IndicatorError::InvalidOHLCV { index: i, reason }
                }
                other => other,
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if let Some(macd) = &self.macd {
            macd.validate_config()?;
        }
        Ok(())
    }
}

/// Map the expected insufficient-data condition to an absent value; every
/// other error propagates.
fn short_ok<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_insufficient_data() => Ok(None),
        Err(e) => Err(e),
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating SnapshotEngine instances
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    sma: Option<Sma>,
    ema: Option<Ema>,
    rsi: Option<Rsi>,
    stoch_rsi: Option<StochRsi>,
    bollinger: Option<Bollinger>,
    macd: Option<Macd>,
    atr: Option<Atr>,
    config: SnapshotConfig,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable every indicator with its default parameters
    pub fn with_all_defaults(self) -> Self {
        self.sma(Sma::default())
            .ema(Ema::default())
            .rsi(Rsi::default())
            .stoch_rsi(StochRsi::default())
            .bollinger(Bollinger::default())
            .macd(Macd::default())
            .atr(Atr::default())
    }

    pub fn sma(mut self, sma: Sma) -> Self {
        self.sma = Some(sma);
        self
    }

    pub fn ema(mut self, ema: Ema) -> Self {
        self.ema = Some(ema);
        self
    }

    pub fn rsi(mut self, rsi: Rsi) -> Self {
        self.rsi = Some(rsi);
        self
    }

    pub fn stoch_rsi(mut self, stoch_rsi: StochRsi) -> Self {
        self.stoch_rsi = Some(stoch_rsi);
        self
    }

    pub fn bollinger(mut self, bollinger: Bollinger) -> Self {
        self.bollinger = Some(bollinger);
        self
    }

    pub fn macd(mut self, macd: Macd) -> Self {
        self.macd = Some(macd);
        self
    }

    pub fn atr(mut self, atr: Atr) -> Self {
        self.atr = Some(atr);
        self
    }

    /// Set the truncation policy applied to series outputs
    pub fn window(mut self, window: OutputWindow) -> Self {
        self.config.window = window;
        self
    }

    /// Enable/disable per-bar OHLCV validation before computing
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    /// Build the engine, validating cross-parameter constraints
    pub fn build(self) -> Result<SnapshotEngine> {
        let engine = SnapshotEngine {
            sma: self.sma,
            ema: self.ema,
            rsi: self.rsi,
            stoch_rsi: self.stoch_rsi,
            bollinger: self.bollinger,
            macd: self.macd,
            atr: self.atr,
            config: self.config,
        };
        engine.validate()?;
        Ok(engine)
    }
}

// ============================================================
// PARALLEL SNAPSHOTS
// ============================================================

use rayon::prelude::*;

/// Result of snapshotting a single instrument
#[derive(Debug)]
pub struct SnapshotResult {
    pub symbol: String,
    pub snapshot: Snapshot,
}

/// Error from snapshotting a single instrument
#[derive(Debug)]
pub struct SnapshotError {
    pub symbol: String,
    pub error: IndicatorError,
}

/// Parallel snapshots over multiple instruments
pub fn snapshot_parallel<'a, T, I>(
    engine: &SnapshotEngine,
    instruments: I,
) -> (Vec<SnapshotResult>, Vec<SnapshotError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            engine
                .snapshot(bars)
                .map(|snapshot| SnapshotResult {
                    symbol: symbol.to_string(),
                    snapshot,
                })
                .map_err(|error| SnapshotError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test OHLCV bar
    #[derive(Debug, Clone)]
    struct Bar {
        o: f64,
        h: f64,
        l: f64,
        c: f64,
        v: f64,
    }

    impl Bar {
        fn new(o: f64, h: f64, l: f64, c: f64) -> Self {
            Self {
                o,
                h,
                l,
                c,
                v: 1000.0,
            }
        }
    }

    impl OHLCV for Bar {
        fn open(&self) -> f64 {
            self.o
        }

        fn high(&self) -> f64 {
            self.h
        }

        fn low(&self) -> f64 {
            self.l
        }

        fn close(&self) -> f64 {
            self.c
        }

        fn volume(&self) -> f64 {
            self.v
        }
    }

    fn make_trend_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.5;
                Bar::new(base, base + 1.0, base - 1.0, base + 0.25)
            })
            .collect()
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(1).is_ok());
        assert!(Period::new(100).is_ok());
        assert!(Period::new(0).is_err());
    }

    #[test]
    fn test_multiplier_validation() {
        assert!(Multiplier::new(2.0).is_ok());
        assert!(Multiplier::new(0.5).is_ok());
        assert!(Multiplier::new(0.0).is_err());
        assert!(Multiplier::new(-1.0).is_err());
        assert!(Multiplier::new(f64::NAN).is_err());
        assert!(Multiplier::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_ohlcv_ext() {
        let bar = Bar::new(100.0, 110.0, 90.0, 105.0);
        assert_eq!(bar.range(), 20.0);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
        // TR against a far-away previous close exceeds the plain range
        assert_eq!(bar.true_range(120.0), 30.0);
        assert_eq!(bar.true_range(100.0), 20.0);
    }

    #[test]
    fn test_ohlcv_validate() {
        assert!(Bar::new(100.0, 110.0, 90.0, 105.0).validate().is_ok());
        assert!(Bar::new(100.0, 90.0, 110.0, 105.0).validate().is_err());
        assert!(Bar::new(f64::NAN, 110.0, 90.0, 105.0).validate().is_err());
    }

    #[test]
    fn test_output_window_full() {
        let series = vec![1.0, 2.0, 3.0];
        assert_eq!(OutputWindow::Full.apply(series.clone()), series);
    }

    #[test]
    fn test_output_window_last_n() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(OutputWindow::LastN(3).apply(series), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_output_window_last_n_short_series() {
        let series = vec![1.0, 2.0];
        assert_eq!(OutputWindow::LastN(5).apply(series), vec![1.0, 2.0]);
    }

    #[test]
    fn test_builder_all_defaults() {
        let engine = SnapshotBuilder::new().with_all_defaults().build();
        assert!(engine.is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_macd() {
        let macd = Macd {
            fast: Period::new_const(26),
            slow: Period::new_const(12),
            signal: Period::new_const(9),
        };
        let engine = SnapshotBuilder::new().macd(macd).build();
        assert!(engine.is_err());
    }

    #[test]
    fn test_empty_snapshot() {
        let engine = SnapshotBuilder::new().with_all_defaults().build().unwrap();
        let bars: Vec<Bar> = vec![];
        let snapshot = engine.snapshot(&bars).unwrap();

        // Total indicators produce empty series, fallible ones degrade to None
        assert_eq!(snapshot.sma, Some(vec![]));
        assert_eq!(snapshot.ema, Some(vec![]));
        assert!(snapshot.rsi.is_none());
        assert!(snapshot.stoch_rsi.is_none());
        assert!(snapshot.macd.is_none());
        assert!(snapshot.atr.is_none());
    }

    #[test]
    fn test_snapshot_with_enough_history() {
        let engine = SnapshotBuilder::new().with_all_defaults().build().unwrap();
        let bars = make_trend_bars(50);
        let snapshot = engine.snapshot(&bars).unwrap();

        assert!(snapshot.sma.is_some());
        assert!(snapshot.ema.is_some());
        assert!(snapshot.rsi.is_some());
        assert!(snapshot.stoch_rsi.is_some());
        assert!(snapshot.bollinger.is_some());
        assert!(snapshot.macd.is_some());
        assert!(snapshot.atr.is_some());
    }

    #[test]
    fn test_snapshot_window_truncation() {
        let engine = SnapshotBuilder::new()
            .with_all_defaults()
            .window(OutputWindow::LastN(3))
            .build()
            .unwrap();
        let bars = make_trend_bars(50);
        let snapshot = engine.snapshot(&bars).unwrap();

        assert_eq!(snapshot.sma.unwrap().len(), 3);
        assert_eq!(snapshot.ema.unwrap().len(), 3);
        assert_eq!(snapshot.rsi.unwrap().len(), 3);
        let stoch = snapshot.stoch_rsi.unwrap();
        assert_eq!(stoch.k.len(), 3);
        assert_eq!(stoch.d.len(), 3);
        let macd = snapshot.macd.unwrap();
        assert_eq!(macd.macd.len(), 3);
        assert_eq!(macd.signal.len(), 3);
        assert_eq!(macd.histogram.len(), 3);
    }

    #[test]
    fn test_snapshot_validates_bars_when_enabled() {
        let engine = SnapshotBuilder::new()
            .sma(Sma::default())
            .validate_data(true)
            .build()
            .unwrap();

        let mut bars = make_trend_bars(10);
        bars[4] = Bar::new(100.0, 90.0, 110.0, 105.0); // high < low

        let err = engine.snapshot(&bars).unwrap_err();
        match err {
            IndicatorError::InvalidOHLCV { index, .. } => assert_eq!(index, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parallel_snapshots() {
        let engine = SnapshotBuilder::new().with_all_defaults().build().unwrap();

        let bars1 = make_trend_bars(50);
        let bars2 = make_trend_bars(40);

        let instruments: Vec<(&str, &[Bar])> = vec![("BTCUSDT", &bars1), ("ETHUSDT", &bars2)];

        let (results, errors) = snapshot_parallel(&engine, instruments);
        assert_eq!(results.len(), 2);
        assert!(errors.is_empty());

        // Parallel results match the sequential computation
        let sequential = engine.snapshot(&bars1).unwrap();
        let parallel = results
            .iter()
            .find(|r| r.symbol == "BTCUSDT")
            .map(|r| &r.snapshot)
            .unwrap();
        assert_eq!(&sequential, parallel);
    }
}
