pub mod calendar;
pub mod collection;
pub mod equity;
pub mod error;
pub mod grants;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "thresholds")]
pub mod threshold;

#[cfg(feature = "report")]
pub mod report;

pub use calendar::{DateDelta, Granularity};
pub use collection::EquityCollection;
pub use equity::EquityUnit;
pub use error::StockworthError;
pub use types::*;

/// Standard result type for all stockworth operations
pub type StockworthResult<T> = Result<T, StockworthError>;
