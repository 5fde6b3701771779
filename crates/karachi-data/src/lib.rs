#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/karachi-rs/karachi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod dps;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod model;

pub use dps::DpsSource;
pub use error::{DataError, Result};
pub use extract::{EmptyReason, Extracted};
pub use index::IndexCode;
pub use model::{
    CompanyIdentity, EnrichedCompany, Fundamentals, IndexMetric, IndexSnapshot, SectorActivity,
    SectorRollup,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
