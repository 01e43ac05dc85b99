//! af-core: stable foundation for the aquaflow report engine.
//!
//! Contains:
//! - stage (computation stages, life stages, limiting parameters)
//! - metric (unit labels + canonical `{value, unit}` metric)
//! - units (uom flow-rate conversions)
//! - numeric (Real + tolerances + mass-rate scaling)
//! - error (shared error types)

pub mod error;
pub mod metric;
pub mod numeric;
pub mod stage;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::CoreError;
pub use metric::{CanonicalMetric, Unit};
pub use numeric::*;
pub use stage::{LifeStage, Parameter, StageName};
pub use units::*;
