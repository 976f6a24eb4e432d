use rust_decimal::Decimal;

/// Failure raised while turning a payslip snapshot into a score.
///
/// No variant is ever converted into a fallback score; callers receive either a complete
/// breakdown or one of these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("critical salary information is missing or not positive: {field}")]
    MissingCriticalData { field: &'static str },
    #[error("indicator {field} = {value} is outside its domain {expected}")]
    InvalidIndicator {
        field: &'static str,
        value: Decimal,
        expected: &'static str,
    },
    #[error("amount {field} = {value} must not be negative")]
    InvalidAmount { field: &'static str, value: Decimal },
    #[error("score computation failed: {0}")]
    InternalComputation(String),
}

impl ScoringError {
    /// Whether the failure stems from caller-supplied data rather than the engine itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ScoringError::InternalComputation(_))
    }

    pub(crate) fn overflow(operation: &str) -> Self {
        ScoringError::InternalComputation(format!("arithmetic overflow while computing {operation}"))
    }
}
