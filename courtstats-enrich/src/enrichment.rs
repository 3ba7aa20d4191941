//! Player enrichment
//!
//! Fills the missing fields of a player record from the knowledge base:
//!
//! 1. Resolve the entity id by name when the record has none. No match
//!    leaves the record untouched.
//! 2. For each field of [`ENRICHMENT_TABLE`] that is missing, run its
//!    extractor and keep the value when it differs from the stored one.
//!
//! Fields already holding a value are never fetched, so enriching a complete
//! record issues no request. Failures never surface: an extractor that
//! fails leaves its field missing.

use std::sync::Arc;
use tracing::{debug, info, warn};

use courtstats_common::config::KnowledgeBaseConfig;
use courtstats_common::{FieldValue, PlayerField, PlayerRecord};

use crate::error::{ExtractError, TransportError};
use crate::extractors::{Extractor, FieldExtractors, SocialNetwork};
use crate::knowledge_base::{ClaimCache, PropertyFetcher};
use crate::resolver::EntityResolver;

/// Field → extractor, in enrichment order
///
/// `player_id`, `wikidata_id` and `fullname` are absent: the first is the
/// caller's key, the second is resolved separately and the third is derived
/// from the names on the way into storage.
pub static ENRICHMENT_TABLE: &[(PlayerField, Extractor)] = &[
    (PlayerField::NameFirst, Extractor::GivenName),
    (PlayerField::NameLast, Extractor::FamilyName),
    (PlayerField::Hand, Extractor::Handedness),
    (PlayerField::BirthDate, Extractor::BirthDate),
    (PlayerField::Country, Extractor::Country),
    (PlayerField::Height, Extractor::Height),
    (PlayerField::Weight, Extractor::Weight),
    (PlayerField::Instagram, Extractor::Handle(SocialNetwork::Instagram)),
    (PlayerField::Facebook, Extractor::Handle(SocialNetwork::Facebook)),
    (PlayerField::XTwitter, Extractor::Handle(SocialNetwork::XTwitter)),
    (PlayerField::ProSince, Extractor::ProDebut),
];

/// Result of one enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    /// The caller must persist `record`
    pub changed: bool,
    pub record: PlayerRecord,
}

pub struct Enricher {
    resolver: EntityResolver,
    extractors: FieldExtractors,
}

impl Enricher {
    pub fn new(resolver: EntityResolver, extractors: FieldExtractors) -> Self {
        Self {
            resolver,
            extractors,
        }
    }

    /// Resolver and extractors sharing one fetcher
    pub fn with_fetcher(fetcher: Arc<PropertyFetcher>, config: &KnowledgeBaseConfig) -> Self {
        Self::new(
            EntityResolver::new(Arc::clone(&fetcher), config.search_language.clone()),
            FieldExtractors::new(fetcher, config.label_language.clone()),
        )
    }

    /// HTTP-backed enricher from configuration
    pub fn from_config(
        config: &KnowledgeBaseConfig,
        cache: Arc<ClaimCache>,
    ) -> Result<Self, TransportError> {
        let fetcher = Arc::new(PropertyFetcher::from_config(config, cache)?);
        Ok(Self::with_fetcher(fetcher, config))
    }

    pub async fn enrich(&self, mut record: PlayerRecord) -> EnrichmentOutcome {
        let mut changed = false;

        let entity_id = match record.raw(PlayerField::WikidataId) {
            Some(id) if !record.is_missing(PlayerField::WikidataId) => id.trim().to_string(),
            _ => {
                let resolved = self
                    .resolver
                    .resolve(record.name_last.as_deref(), record.name_first.as_deref())
                    .await;

                match resolved {
                    Some(id) => {
                        changed |= record.apply(PlayerField::WikidataId, FieldValue::Text(id.clone()));
                        id
                    }
                    None => {
                        debug!(player_id = %record.player_id, "No entity for player, record unchanged");
                        return EnrichmentOutcome {
                            changed: false,
                            record,
                        };
                    }
                }
            }
        };

        for &(field, extractor) in ENRICHMENT_TABLE {
            if !record.is_missing(field) {
                continue;
            }

            match self.extractors.run(extractor, &entity_id).await {
                Ok(value) => {
                    if record.apply(field, value) {
                        info!(
                            player_id = %record.player_id,
                            entity_id = %entity_id,
                            field = %field,
                            "Enriched field"
                        );
                        changed = true;
                    }
                }
                Err(ExtractError::NotFound(reason)) => {
                    debug!(
                        player_id = %record.player_id,
                        entity_id = %entity_id,
                        field = %field,
                        "No value: {}",
                        reason
                    );
                }
                Err(ExtractError::Malformed(reason)) => {
                    warn!(
                        player_id = %record.player_id,
                        entity_id = %entity_id,
                        field = %field,
                        "Malformed claim ignored: {}",
                        reason
                    );
                }
            }
        }

        EnrichmentOutcome { changed, record }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_enrichable_field() {
        for field in PlayerField::ALL {
            let listed = ENRICHMENT_TABLE.iter().any(|(f, _)| *f == field);
            let expected = !matches!(
                field,
                PlayerField::PlayerId | PlayerField::WikidataId | PlayerField::Fullname
            );
            assert_eq!(listed, expected, "{}", field);
        }
    }
}
