//! Performance-score distribution analysis for a workforce roster.
//!
//! The core is [`comparison::build`]: it fits a normal distribution to the
//! roster's scores, places every worker in one of five percentile
//! categories, measures each worker against the corporate mean and their
//! direct supervisor, and repeats the fit per supervisor group.

pub mod comparison;
pub mod distribution;
pub mod error;
pub mod gap;
pub mod hierarchy;
pub mod loader;
pub mod models;
pub mod report;

pub use comparison::build;
pub use error::{Result, RosterError};
pub use models::{CategoryLabel, ComparisonRecord, ComparisonReport, DistributionStats, Worker};
