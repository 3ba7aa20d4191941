//! Test Helper Utilities
//!
//! Shared utilities for testing courtstats-enrich

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_transport;

// Re-export commonly used items
pub use fixtures::{
    claims_body, claims_query, complete_record, entity_claim, label_body, labels_query,
    quantity_claim, search_body, search_query, string_claim, time_claim,
};
pub use mock_transport::MockTransport;

use std::sync::Arc;

use courtstats_common::config::KnowledgeBaseConfig;
use courtstats_enrich::knowledge_base::{ClaimCache, PropertyFetcher, RetryPolicy};
use courtstats_enrich::Enricher;

/// Fetcher over the mock with the default retry policy and no throttling
pub fn create_test_fetcher(transport: Arc<MockTransport>) -> PropertyFetcher {
    PropertyFetcher::new(transport, Arc::new(ClaimCache::new()), RetryPolicy::default())
}

pub fn create_test_enricher(transport: Arc<MockTransport>) -> Enricher {
    let fetcher = Arc::new(create_test_fetcher(transport));
    Enricher::with_fetcher(fetcher, &KnowledgeBaseConfig::default())
}
