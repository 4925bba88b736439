//! External collaborators: price/indicator providers, session hours, event sinks.

pub mod alphavantage;
pub mod events;
pub mod market_data;
pub mod market_hours;
pub mod robinhood;

pub use alphavantage::AlphaVantageClient;
pub use events::{EventSink, MemorySink, PublishError, RedisStreamSink};
pub use market_data::{HistoricalPriceSource, IndicatorSource, LatestQuoteSource, ProviderError};
pub use market_hours::{MarketHours, MarketHoursSource};
pub use robinhood::RobinhoodClient;
