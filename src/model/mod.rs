//! Model definitions for the records and request outcomes of the fetch engine.
//!
//! This module provides the core data structures and the traits at the seams
//! between the paginated collector and the network.

pub mod entity;
pub mod traits;
pub mod types;

// Re-export commonly used items at the module level
pub use entity::{parse_timestamp, Entity};
pub use traits::{Fetcher, QuotaProbe};
pub use types::{CollectionKind, Credential, EntityState, FetchResult};
