use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (SEK). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and fractions expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Energy in kilowatt-hours
pub type Kwh = Decimal;

/// Power in kilowatts
pub type Kw = Decimal;

/// Simple payback period. `Unattainable` when the annual net benefit never
/// recovers the investment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payback {
    Years(Years),
    Unattainable,
}

impl Payback {
    pub fn years(&self) -> Option<Years> {
        match self {
            Payback::Years(y) => Some(*y),
            Payback::Unattainable => None,
        }
    }

    pub fn is_attainable(&self) -> bool {
        matches!(self, Payback::Years(_))
    }
}

impl From<Option<Years>> for Payback {
    fn from(value: Option<Years>) -> Self {
        value.map_or(Payback::Unattainable, Payback::Years)
    }
}

/// Internal rate of return. `Indeterminate` when the root search fails or
/// lands outside the plausible band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Irr {
    Rate(Rate),
    Indeterminate,
}

impl Irr {
    pub fn rate(&self) -> Option<Rate> {
        match self {
            Irr::Rate(r) => Some(*r),
            Irr::Indeterminate => None,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
