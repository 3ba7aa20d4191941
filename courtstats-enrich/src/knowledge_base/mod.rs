//! Knowledge base access (Wikidata action API)
//!
//! - **transport** - one GET per call, reqwest in production
//! - **cache** - memoized claim lookups
//! - **fetcher** - retry/backoff policy on top of the transport
//! - **claims** - claim model and value interpretation

pub mod cache;
pub mod claims;
pub mod fetcher;
pub mod transport;

pub use cache::ClaimCache;
pub use claims::{best_claim, Claim, ClaimList, ClaimValue};
pub use fetcher::{PropertyFetcher, RetryPolicy};
pub use transport::{ApiQuery, ApiResponse, HttpTransport, Transport};
