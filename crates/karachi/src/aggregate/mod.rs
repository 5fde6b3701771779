//! Aggregation engine: joins identity, index metrics and fundamentals, rolls
//! companies up by sector, and picks the session's movers.
//!
//! Everything here is synchronous; the adapter loads inputs first.

pub mod enrich;
pub mod performers;
pub mod sector;

pub use enrich::{SortBy, enrich, rank};
pub use performers::{Performers, top_performers};
pub use sector::{aggregate_enriched, aggregate_sectors};
