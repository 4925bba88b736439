//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod price;
pub mod signal;

pub use indicators::{IndicatorReading, IndicatorSnapshot, MacdIndicator};
pub use price::{parse_timestamp, LatestQuote, PricePoint, PriceSeries, QuoteError, Symbol};
pub use signal::{SignalState, Transition};
