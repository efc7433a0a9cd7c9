//! Student performance analytics.
//!
//! Tiering, histograms, mid-rank percentiles, peer ranking and trend
//! prediction, composed into the student queries of [`Analytics`].

pub mod facade;
pub mod histogram;
pub mod peers;
pub mod percentile;
pub mod tier;
pub mod trend;
pub mod types;
pub mod utility;

pub use facade::Analytics;
pub use tier::{Tier, classify};
