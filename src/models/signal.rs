use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Directional state derived from the MACD / signal-line relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalState {
    Buy,
    Sell,
}

impl SignalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalState::Buy => "BUY",
            SignalState::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BUY" => Ok(SignalState::Buy),
            "SELL" => Ok(SignalState::Sell),
            other => Err(format!("unknown signal state '{}'", other)),
        }
    }
}

/// What happened to the persisted state during one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// No prior state existed; the computed state became the baseline.
    Initial,
    Unchanged,
    Flipped { from: SignalState },
}

impl Transition {
    pub fn is_flip(&self) -> bool {
        matches!(self, Transition::Flipped { .. })
    }
}
