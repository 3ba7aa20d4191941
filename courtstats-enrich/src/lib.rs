//! courtstats-enrich library interface
//!
//! Fills missing player fields from Wikidata:
//! - **knowledge_base** - action API client with retry, backoff and claim cache
//! - **resolver** - name search validated against tennis categories
//! - **extractors** - per-field claim conversion
//! - **enrichment** - orchestration over a player record

pub mod enrichment;
pub mod error;
pub mod extractors;
pub mod knowledge_base;
pub mod resolver;

pub use crate::enrichment::{Enricher, EnrichmentOutcome, ENRICHMENT_TABLE};
pub use crate::error::{ExtractError, KbError, TransportError};
pub use crate::resolver::EntityResolver;
