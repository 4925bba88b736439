//! MACD signal watcher: per-symbol indicator evaluation with decaying
//! signal-line windows, published as normalized BUY/SELL events.

pub mod cache;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod services;
pub mod signals;

pub use error::EngineError;
pub use signals::engine::SignalEngine;
