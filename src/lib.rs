//! # labqc - QC classification for laboratory analysis batches
//!
//! labqc takes the measurement rows of one instrument run, classifies every
//! sample identifier, groups replicate measurements, computes QC metrics, and
//! flags values outside their acceptance bounds.
//!
//! ## Pipeline
//!
//! Data flows strictly in one direction and nothing is kept between batches:
//!
//! - [`classify`] - sample id to [`classify::Category`] via ordered pattern rules
//! - [`group`] - replicate grouping in first-seen order
//! - [`metrics`] - mean, %RPD, %R, and µmol/L conversion
//! - [`bounds`] - acceptance checks per category
//! - [`report`] - partition into QC, Samples, and Reported Results
//!
//! [`engine::Engine`] wires the stages together; [`config`] holds the
//! chemistry-specific tables; [`record`] and [`export`] cover reading rows and
//! rendering results.
//!
//! ## Example
//!
//! ```
//! use labqc::config::QcConfig;
//! use labqc::engine::Engine;
//! use labqc::record::RawRecord;
//!
//! let engine = Engine::new(QcConfig::default()).expect("valid default config");
//! let records = vec![
//!     RawRecord::new(0, "S1", Some(5.0)),
//!     RawRecord::new(1, "S1", Some(5.2)),
//!     RawRecord::new(2, "CCV3", Some(12.0)),
//! ];
//!
//! let outcome = engine.run(&records);
//! assert_eq!(outcome.report.samples.len(), 1);
//! assert!(outcome.report.qc[0].recovery_out_of_bounds);
//! ```

pub mod bounds;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod group;
pub mod metrics;
pub mod record;
pub mod report;
pub mod ui;

pub use engine::{BatchOutcome, Engine};
pub use error::{ComputationError, ConfigurationError};
