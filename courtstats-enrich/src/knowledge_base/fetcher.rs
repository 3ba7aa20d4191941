//! Knowledge base property fetcher
//!
//! Issues action-API requests with retry, exponential backoff and
//! memoization of claim lookups.
//!
//! **Retry algorithm** (per request, up to `max_attempts`):
//! 1. HTTP 200: decode the body; done (an absent property is a legitimate
//!    empty answer, not retried). An undecodable body waits the current
//!    backoff and retries
//! 2. HTTP 429: read `Retry-After`
//!    a. advised wait above the ceiling: abort immediately, no further attempts
//!    b. otherwise wait the advised duration (current backoff when absent), retry
//! 3. HTTP 5xx or transport error: wait the current backoff, retry
//! 4. Any other status: terminal
//!
//! **Backoff:** starts at `base_backoff` (500 ms) and doubles after every
//! wait. No wait follows the last attempt.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use courtstats_common::config::KnowledgeBaseConfig;

use super::cache::ClaimCache;
use super::claims::{Claim, ClaimList};
use super::transport::{ApiQuery, HttpTransport, Transport};
use crate::error::{KbError, TransportError};

/// Retry and backoff settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    /// Longest `Retry-After` that is honoured
    pub max_acceptable_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            max_acceptable_wait: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &KnowledgeBaseConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_backoff: Duration::from_millis(config.base_backoff_ms),
            max_acceptable_wait: Duration::from_secs(config.max_acceptable_wait_secs),
        }
    }
}

// ============================================================================
// Action API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ClaimsResponse {
    #[serde(default)]
    claims: HashMap<String, Vec<Claim>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: HashMap<String, EntityLabels>,
}

#[derive(Debug, Deserialize)]
struct EntityLabels {
    #[serde(default)]
    labels: HashMap<String, Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    #[serde(default)]
    value: String,
}

// ============================================================================
// Fetcher
// ============================================================================

/// Knowledge base client shared by the resolver and the extractors
pub struct PropertyFetcher {
    transport: Arc<dyn Transport>,
    cache: Arc<ClaimCache>,
    policy: RetryPolicy,
    /// Optional client-side throttle shared by every request of this fetcher
    rate_limiter: Option<DefaultDirectRateLimiter>,
}

impl PropertyFetcher {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ClaimCache>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            cache,
            policy,
            rate_limiter: None,
        }
    }

    /// Throttle outgoing requests to `requests_per_second`
    pub fn with_rate_limit(mut self, requests_per_second: NonZeroU32) -> Self {
        self.rate_limiter = Some(RateLimiter::direct(Quota::per_second(requests_per_second)));
        self
    }

    /// Build an HTTP-backed fetcher from configuration
    pub fn from_config(
        config: &KnowledgeBaseConfig,
        cache: Arc<ClaimCache>,
    ) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(
            config.api_url.clone(),
            &config.user_agent,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        let fetcher = Self::new(Arc::new(transport), cache, RetryPolicy::from_config(config));

        Ok(match config.requests_per_second.and_then(NonZeroU32::new) {
            Some(rps) => fetcher.with_rate_limit(rps),
            None => fetcher,
        })
    }

    /// Claims for (entity, property), `None` for any failure
    pub async fn fetch(&self, entity: &str, property: &str) -> Option<Arc<ClaimList>> {
        match self.try_fetch(entity, property).await {
            Ok(claims) => Some(claims),
            Err(e) if e.is_not_found() => {
                debug!(entity_id = %entity, property = %property, "{}", e);
                None
            }
            Err(e) => {
                warn!(
                    entity_id = %entity,
                    property = %property,
                    error = %e,
                    "Claim lookup failed, treated as not found"
                );
                None
            }
        }
    }

    /// Claims for (entity, property) with the failure category preserved
    pub async fn try_fetch(&self, entity: &str, property: &str) -> Result<Arc<ClaimList>, KbError> {
        let entity = entity.trim();
        let property = property.trim();

        if entity.is_empty() || property.is_empty() {
            return Err(KbError::NotFound(format!(
                "empty argument (entity '{}', property '{}')",
                entity, property
            )));
        }

        if let Some(cached) = self.cache.get(entity, property) {
            debug!(entity_id = %entity, property = %property, "Claim cache hit");
            return cached.ok_or_else(|| absent(entity, property));
        }

        let query = ApiQuery::Claims {
            entity: entity.to_string(),
            property: property.to_string(),
        };
        let mut response: ClaimsResponse = self.request(&query).await?;

        let claims = response
            .claims
            .remove(property)
            .filter(|claims| !claims.is_empty())
            .map(Arc::new);

        self.cache.insert(entity, property, claims.clone());
        claims.ok_or_else(|| absent(entity, property))
    }

    /// Id of the single best label-search hit
    pub async fn search_entity(&self, text: &str, language: &str) -> Result<String, KbError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(KbError::NotFound("empty search text".to_string()));
        }

        let query = ApiQuery::Search {
            text: text.to_string(),
            language: language.to_string(),
        };
        let response: SearchResponse = self.request(&query).await?;

        response
            .search
            .into_iter()
            .next()
            .map(|hit| hit.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| KbError::NotFound(format!("no entity matches '{}'", text)))
    }

    /// Label of an entity in one language
    pub async fn entity_label(&self, entity: &str, language: &str) -> Result<String, KbError> {
        let entity = entity.trim();
        if entity.is_empty() {
            return Err(KbError::NotFound("empty entity id".to_string()));
        }

        let query = ApiQuery::Labels {
            entity: entity.to_string(),
            language: language.to_string(),
        };
        let mut response: EntitiesResponse = self.request(&query).await?;

        response
            .entities
            .remove(entity)
            .and_then(|mut e| e.labels.remove(language))
            .map(|label| label.value)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| KbError::NotFound(format!("no '{}' label for {}", language, entity)))
    }

    /// Send one query with retry and backoff, returning the decoded 200 body
    async fn request<T: DeserializeOwned>(&self, query: &ApiQuery) -> Result<T, KbError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut backoff = self.policy.base_backoff;
        let mut last_error = String::new();
        let mut last_was_malformed = false;

        for attempt in 1..=attempts {
            if let Some(limiter) = &self.rate_limiter {
                limiter.until_ready().await;
            }

            let wait = match self.transport.get(query).await {
                Ok(response) if response.status == 200 => {
                    match serde_json::from_str(&response.body) {
                        Ok(decoded) => {
                            if attempt > 1 {
                                debug!(query = %query.describe(), attempt, "Request succeeded after retry");
                            }
                            return Ok(decoded);
                        }
                        Err(e) => {
                            last_error = format!("{}: {}", query.describe(), e);
                            last_was_malformed = true;
                            backoff
                        }
                    }
                }
                Ok(response) if response.status == 429 => {
                    let advised = parse_retry_after(response.retry_after.as_deref());

                    if let Some(advised) = advised {
                        if advised > self.policy.max_acceptable_wait {
                            warn!(
                                query = %query.describe(),
                                advised_secs = advised.as_secs(),
                                ceiling_secs = self.policy.max_acceptable_wait.as_secs(),
                                "Retry-After too long, giving up"
                            );
                            return Err(KbError::RateLimited { advised });
                        }
                    }

                    last_error = "HTTP 429 Too Many Requests".to_string();
                    last_was_malformed = false;
                    advised.unwrap_or(backoff)
                }
                Ok(response) if response.status >= 500 => {
                    last_error = format!("HTTP {}", response.status);
                    last_was_malformed = false;
                    backoff
                }
                Ok(response) => {
                    warn!(
                        query = %query.describe(),
                        status = response.status,
                        "Knowledge base rejected request"
                    );
                    return Err(KbError::Rejected {
                        status: response.status,
                    });
                }
                Err(e) => {
                    last_error = e.to_string();
                    last_was_malformed = false;
                    backoff
                }
            };

            if attempt < attempts {
                warn!(
                    query = %query.describe(),
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %last_error,
                    "Knowledge base request failed, will retry after backoff"
                );
                tokio::time::sleep(wait).await;
            }

            backoff = backoff.saturating_mul(2);
        }

        error!(
            query = %query.describe(),
            attempts,
            error = %last_error,
            "Knowledge base request failed: attempts exhausted"
        );
        if last_was_malformed {
            return Err(KbError::Malformed(last_error));
        }
        Err(KbError::Exhausted {
            attempts,
            last: last_error,
        })
    }
}

fn absent(entity: &str, property: &str) -> KbError {
    KbError::NotFound(format!("property {} absent for {}", property, entity))
}

/// `Retry-After` in delta-seconds form; anything else is ignored
fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value?.trim().parse::<u64>().ok().map(Duration::from_secs)
}
