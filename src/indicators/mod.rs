//! Technical indicator computations
//!
//! Each indicator is an independent, side-effect-free computation over an
//! oldest-first price or candle series:
//!
//! - **Moving averages**: [`Sma`], [`Ema`] (raw-price seeded)
//! - **Momentum**: [`Rsi`] (Wilder smoothing), [`StochRsi`]
//! - **Volatility**: [`Bollinger`] (population variance), [`Atr`]
//! - **Trend**: [`Macd`] (fast/slow EMA difference plus signal EMA)
//!
//! Aligned series use `Option<f64>` with `None` marking indices without a
//! full trailing window.

/// Generate `with_defaults()` -> `Self::default()` for multiple indicator types.
macro_rules! impl_with_defaults {
  ($($indicator:ty),* $(,)?) => {
    $(impl $indicator {
      pub fn with_defaults() -> Self { Self::default() }
    })*
  };
}

pub mod atr;
pub mod bollinger;
pub mod macd;
pub mod moving_average;
pub mod rsi;

// Re-export all indicators for convenience
pub use atr::*;
pub use bollinger::*;
pub use macd::*;
pub use moving_average::*;
pub use rsi::*;
