use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatteryRoiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BatteryRoiError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        BatteryRoiError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        BatteryRoiError::NumericOverflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for BatteryRoiError {
    fn from(e: serde_json::Error) -> Self {
        BatteryRoiError::SerializationError(e.to_string())
    }
}
