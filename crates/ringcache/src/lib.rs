//! # ringcache
//!
//! Fixed-capacity in-memory key/value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to ring handle (O(1))
//! - **Recency ring**: circular doubly-linked list in an arena, anchored by a
//!   sentinel node; front is most recently touched, back is evicted (O(1))
//! - **SharedCache**: one mutex over both structures for multi-threaded use
//!
//! ```
//! use ringcache::{Cache, Error};
//!
//! let mut cache = Cache::new(2)?;
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.get("a")?;   // "a" is now most recent
//! cache.set("c", 3); // evicts "b"
//!
//! assert_eq!(cache.get("b"), Err(Error::NotFound));
//! assert_eq!(cache.len(), 2);
//! # Ok::<(), ringcache::Error>(())
//! ```

#![warn(missing_docs)]

mod cache;
mod error;
pub mod ring;
mod shared;
mod stats;

pub use cache::Cache;
pub use error::{Error, Result};
pub use shared::SharedCache;
pub use stats::CacheStats;
