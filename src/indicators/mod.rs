//! Decimal indicator math: EMA and MACD.

pub mod error;
pub mod momentum;
pub mod trend;

pub use error::IndicatorError;
pub use momentum::*;
pub use trend::*;
