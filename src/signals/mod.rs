//! Signal evaluation: series assembly, state tracking, decay, publication.

pub mod decay;
pub mod engine;
pub mod publisher;
pub mod series;
pub mod state;

pub use decay::{DecayPolicy, DecayWindowCalculator};
pub use engine::SignalEngine;
pub use publisher::{format_2dp, SignalMessage, SignalPublisher};
pub use series::PriceSeriesAssembler;
pub use state::{classify, SignalStateTracker};
