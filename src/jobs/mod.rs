//! Job queue system for symbol evaluation

pub mod context;
pub mod handlers;
pub mod locks;
pub mod types;

pub use context::JobContext;
pub use handlers::{evaluate_symbol, EvaluationOutcome};
pub use locks::SymbolLocks;
pub use types::EvaluateSymbolJob;
