//! GitHub REST fetch engine.
//!
//! Walks paginated listings through the `Link` header, spreading requests over
//! the direct path and a pool of HTTP proxies according to their remaining
//! rate limit quota.

pub mod client;
pub mod collector;
pub mod endpoints;
pub mod filter;
pub mod link;
pub mod proxy;
pub mod rate_limit;
pub mod retry;

pub use client::Client;
pub use collector::PaginatedCollector;
pub use proxy::{ProxyPool, ProxyRotator};
pub use rate_limit::RateLimitProber;
