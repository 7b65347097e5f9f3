//! Parameter metadata for indicators
//!
//! This module provides metadata about indicator parameters, enabling:
//! - Grid search / parameter sweeps
//! - Parameter documentation
//! - Automatic configuration UI generation
//!
//! # Example
//!
//! ```rust
//! use indikit::params::{ParamMeta, ParamType, ParameterizedIndicator};
//! use indikit::prelude::*;
//!
//! // Get parameter metadata for an indicator
//! let params = Rsi::param_meta();
//! for param in params {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{IndicatorError, Multiplier, Period, Result};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Lookback period (positive integer)
  Period,
  /// Positive real multiplier (e.g. Bollinger standard-deviation width)
  Multiplier,
}

/// Metadata for a single indicator parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g. "period")
  pub name: &'static str,
  /// Parameter type (Period or Multiplier)
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Period parameter
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Create a new ParamMeta for a Multiplier parameter
  pub const fn multiplier(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Multiplier, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(IndicatorError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Multiplier => {
        // Range check is enough; Multiplier::new re-validates finiteness
        Ok(())
      },
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(IndicatorError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED INDICATOR TRAIT
// ============================================================

/// Trait for indicators that support parameterization
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of indicators with custom parameter values
/// - Grid search optimization
pub trait ParameterizedIndicator: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates an indicator with parameters from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;

  /// Returns the indicator ID string
  fn indicator_id_str() -> &'static str;
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  if value < 1.0 || value.fract() != 0.0 {
    return Err(IndicatorError::InvalidValue("Period must be a positive integer"));
  }
  Period::new(value as usize)
}

/// Helper to get a Multiplier from params with default fallback
pub fn get_multiplier(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Multiplier> {
  let value = params.get(key).copied().unwrap_or(default);
  Multiplier::new(value)
}

// ============================================================
// TESTS
// ============================================================
