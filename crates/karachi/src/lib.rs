#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/karachi-rs/karachi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapter;
pub mod aggregate;
pub mod config;
pub mod universe;

// Re-export main types from sub-crates
pub use karachi_data as data;
pub use karachi_output as output;

pub use adapter::{CompanyFilter, DpsAdapter};
pub use aggregate::{SortBy, aggregate_sectors};
pub use config::AdapterConfig;
pub use universe::{ListedUniverse, Universe};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
