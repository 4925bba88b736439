//! Job types for the evaluation queue

use crate::models::Symbol;
use serde::{Deserialize, Serialize};

/// Evaluate one watched symbol and publish its signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateSymbolJob {
    pub symbol: Symbol,
}

impl EvaluateSymbolJob {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol }
    }
}
