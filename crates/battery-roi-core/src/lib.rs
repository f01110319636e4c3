pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "roi")]
pub mod roi;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::BatteryRoiError;
pub use types::*;

/// Standard result type for all battery-roi operations
pub type BatteryRoiResult<T> = Result<T, BatteryRoiError>;
