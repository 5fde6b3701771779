//! Caching layer for portal data.

pub mod session;

pub use session::{CacheStats, SessionCache};
