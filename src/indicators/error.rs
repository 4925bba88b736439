use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("period must be greater than zero")]
    InvalidPeriod,

    #[error("short period {short} must be less than long period {long}")]
    InvalidPeriods { short: usize, long: usize },

    #[error("insufficient history: need {required} points, have {available}")]
    InsufficientHistory { required: usize, available: usize },
}
