//! Caching for search results.
//!
//! [`SearchCache`] is the capability a host hands to the client. The two
//! implementations in this module are ready-made hosts: [`MemoryCache`]
//! keeps entries for the lifetime of the process and [`DiskCache`]
//! additionally loads and persists them as JSON in the local data directory.

mod cache;
mod disk;
mod memory;

pub use cache::SearchCache;
pub use disk::{CacheError, DiskCache};
pub use memory::MemoryCache;
