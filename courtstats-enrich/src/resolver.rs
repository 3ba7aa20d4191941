//! Entity resolution
//!
//! Finds the knowledge base entity for a player by name. A label search can
//! match a namesake (a footballer, a politician), so the single hit is only
//! accepted when its occupation or its sport identifies a tennis player.

use std::sync::Arc;
use tracing::{debug, info};

use courtstats_common::player::is_sentinel;

use crate::error::KbError;
use crate::knowledge_base::{ClaimValue, PropertyFetcher};

/// Occupation
pub const OCCUPATION_PROPERTY: &str = "P106";

/// Sport
pub const SPORT_PROPERTY: &str = "P641";

/// Tennis player, wheelchair tennis player
pub const TENNIS_OCCUPATIONS: &[&str] = &["Q10833314", "Q11513337"];

/// Tennis
pub const TENNIS_SPORT: &str = "Q847";

pub struct EntityResolver {
    fetcher: Arc<PropertyFetcher>,
    search_language: String,
}

impl EntityResolver {
    pub fn new(fetcher: Arc<PropertyFetcher>, search_language: impl Into<String>) -> Self {
        Self {
            fetcher,
            search_language: search_language.into(),
        }
    }

    /// Entity id of the player, `None` when no validated match exists
    pub async fn resolve(&self, name_last: Option<&str>, name_first: Option<&str>) -> Option<String> {
        match self.try_resolve(name_last, name_first).await {
            Ok(entity_id) => {
                info!(entity_id = %entity_id, "Resolved player entity");
                Some(entity_id)
            }
            Err(e) => {
                debug!(
                    name_last = ?name_last,
                    name_first = ?name_first,
                    "Entity not resolved: {}",
                    e
                );
                None
            }
        }
    }

    async fn try_resolve(
        &self,
        name_last: Option<&str>,
        name_first: Option<&str>,
    ) -> Result<String, KbError> {
        let search = compose_search_name(name_last, name_first)
            .ok_or_else(|| KbError::NotFound("last name missing".to_string()))?;

        let candidate = self
            .fetcher
            .search_entity(&search, &self.search_language)
            .await?;

        if self.is_tennis_player(&candidate).await {
            Ok(candidate)
        } else {
            Err(KbError::NotFound(format!(
                "'{}' matched {} which is not a tennis player",
                search, candidate
            )))
        }
    }

    /// Occupation or sport claims identify a tennis player
    pub async fn is_tennis_player(&self, entity_id: &str) -> bool {
        if self
            .has_entity_claim(entity_id, OCCUPATION_PROPERTY, TENNIS_OCCUPATIONS)
            .await
        {
            return true;
        }
        self.has_entity_claim(entity_id, SPORT_PROPERTY, &[TENNIS_SPORT])
            .await
    }

    async fn has_entity_claim(&self, entity_id: &str, property: &str, accepted: &[&str]) -> bool {
        let Some(claims) = self.fetcher.fetch(entity_id, property).await else {
            return false;
        };

        claims.iter().any(|claim| {
            matches!(claim.value(), Ok(ClaimValue::Entity(id)) if accepted.contains(&id.as_str()))
        })
    }
}

/// Search text for a player: "first last", or the last name alone
pub fn compose_search_name(name_last: Option<&str>, name_first: Option<&str>) -> Option<String> {
    let last = name_last.map(str::trim).filter(|s| !is_sentinel(s))?;

    match name_first.map(str::trim).filter(|s| !is_sentinel(s)) {
        Some(first) => Some(format!("{} {}", first, last)),
        None => Some(last.to_string()),
    }
}
