#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/karachi-rs/karachi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod response;

pub use export::{ExportError, ExportFormat, Exporter};
pub use report::TextReport;
pub use response::{
    CompaniesResponse, CompanyAnalyticsResponse, CompanyProfile, CompanySummary, Financials, Mover,
    Performance, PerformersResponse, Ratios, SectorBreakdownResponse, SectorCompaniesResponse,
    SectorCompany,
};
