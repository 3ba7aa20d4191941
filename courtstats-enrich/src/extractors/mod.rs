//! Per-field extractors
//!
//! Each extractor reads one property of a player entity and turns its best
//! claim into a [`FieldValue`]. All of them go through the shared
//! [`PropertyFetcher`], so they inherit its retry policy and claim cache.
//!
//! # Extractors
//! - **BirthDate** - P569 timestamp, reduced precision defaults to the 1st
//! - **Country** - P27 citizenship, then P297 alpha-2 code of that country
//! - **Height** / **Weight** - P2048 / P2067 quantity converted to cm / kg
//! - **Handedness** - P552 entity mapped to right or left
//! - **Handle** - P2003 / P2013 / P2002 username, verbatim
//! - **ProDebut** - year of the P2031 timestamp
//! - **GivenName** / **FamilyName** - label of the P735 / P734 entity

pub mod values;

use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

use courtstats_common::{FieldValue, Hand};

use crate::error::ExtractError;
use crate::knowledge_base::{best_claim, ClaimValue, PropertyFetcher};

pub use values::{convert_quantity, hand_for_entity, parse_timestamp, parse_year};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialNetwork {
    Instagram,
    Facebook,
    XTwitter,
}

impl SocialNetwork {
    pub fn property(self) -> &'static str {
        match self {
            SocialNetwork::Instagram => "P2003",
            SocialNetwork::Facebook => "P2013",
            SocialNetwork::XTwitter => "P2002",
        }
    }
}

/// One extraction procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    BirthDate,
    Country,
    Height,
    Weight,
    Handedness,
    Handle(SocialNetwork),
    ProDebut,
    GivenName,
    FamilyName,
}

impl Extractor {
    /// Property read from the player entity
    pub fn property(self) -> &'static str {
        match self {
            Extractor::BirthDate => "P569",
            Extractor::Country => "P27",
            Extractor::Height => "P2048",
            Extractor::Weight => "P2067",
            Extractor::Handedness => "P552",
            Extractor::Handle(network) => network.property(),
            Extractor::ProDebut => "P2031",
            Extractor::GivenName => "P735",
            Extractor::FamilyName => "P734",
        }
    }
}

impl fmt::Display for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extractor::Handle(network) => write!(f, "{:?} handle ({})", network, self.property()),
            other => write!(f, "{:?} ({})", other, other.property()),
        }
    }
}

/// Alpha-2 code of a country entity
pub const ALPHA2_PROPERTY: &str = "P297";

/// Runs extractors against the knowledge base
pub struct FieldExtractors {
    fetcher: Arc<PropertyFetcher>,
    /// Language of name labels
    label_language: String,
}

impl FieldExtractors {
    pub fn new(fetcher: Arc<PropertyFetcher>, label_language: impl Into<String>) -> Self {
        Self {
            fetcher,
            label_language: label_language.into(),
        }
    }

    pub async fn run(&self, extractor: Extractor, entity_id: &str) -> Result<FieldValue, ExtractError> {
        match extractor {
            Extractor::BirthDate => self.birth_date(entity_id).await.map(FieldValue::Date),
            Extractor::Country => self.country(entity_id).await.map(FieldValue::Text),
            Extractor::Height => self
                .measure(entity_id, extractor, values::HEIGHT_UNITS_TO_CM)
                .await
                .map(FieldValue::Measure),
            Extractor::Weight => self
                .measure(entity_id, extractor, values::WEIGHT_UNITS_TO_KG)
                .await
                .map(FieldValue::Measure),
            Extractor::Handedness => self.hand(entity_id).await.map(FieldValue::Hand),
            Extractor::Handle(network) => self.handle(entity_id, network).await.map(FieldValue::Text),
            Extractor::ProDebut => self.pro_since(entity_id).await.map(FieldValue::Year),
            Extractor::GivenName | Extractor::FamilyName => self
                .entity_label(entity_id, extractor)
                .await
                .map(FieldValue::Text),
        }
    }

    pub async fn birth_date(&self, entity_id: &str) -> Result<NaiveDate, ExtractError> {
        let property = Extractor::BirthDate.property();
        match self.best_value(entity_id, property).await? {
            ClaimValue::Time(time) => parse_timestamp(&time.time),
            other => Err(unexpected(property, &other)),
        }
    }

    /// Lower-case ISO 3166-1 alpha-2 code of the citizenship country
    pub async fn country(&self, entity_id: &str) -> Result<String, ExtractError> {
        let property = Extractor::Country.property();
        let country_id = match self.best_value(entity_id, property).await? {
            ClaimValue::Entity(id) => id,
            other => return Err(unexpected(property, &other)),
        };

        let code = match self.best_value(&country_id, ALPHA2_PROPERTY).await? {
            ClaimValue::Text(code) => code,
            other => return Err(unexpected(ALPHA2_PROPERTY, &other)),
        };

        let code = code.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ExtractError::Malformed(format!(
                "{} of {} is not an alpha-2 code: '{}'",
                ALPHA2_PROPERTY, country_id, code
            )));
        }
        Ok(code.to_lowercase())
    }

    async fn measure(
        &self,
        entity_id: &str,
        extractor: Extractor,
        units: &[(&str, f64)],
    ) -> Result<u16, ExtractError> {
        let property = extractor.property();
        match self.best_value(entity_id, property).await? {
            ClaimValue::Quantity(quantity) => convert_quantity(&quantity, units),
            other => Err(unexpected(property, &other)),
        }
    }

    pub async fn height(&self, entity_id: &str) -> Result<u16, ExtractError> {
        self.measure(entity_id, Extractor::Height, values::HEIGHT_UNITS_TO_CM)
            .await
    }

    pub async fn weight(&self, entity_id: &str) -> Result<u16, ExtractError> {
        self.measure(entity_id, Extractor::Weight, values::WEIGHT_UNITS_TO_KG)
            .await
    }

    pub async fn hand(&self, entity_id: &str) -> Result<Hand, ExtractError> {
        let property = Extractor::Handedness.property();
        match self.best_value(entity_id, property).await? {
            ClaimValue::Entity(id) => hand_for_entity(&id)
                .ok_or_else(|| ExtractError::NotFound(format!("handedness {} is neither right nor left", id))),
            other => Err(unexpected(property, &other)),
        }
    }

    /// Username on a social network, verbatim
    pub async fn handle(&self, entity_id: &str, network: SocialNetwork) -> Result<String, ExtractError> {
        let property = network.property();
        match self.best_value(entity_id, property).await? {
            ClaimValue::Text(username) if !username.trim().is_empty() => Ok(username),
            ClaimValue::Text(_) => Err(ExtractError::NotFound(format!("{} username is empty", property))),
            other => Err(unexpected(property, &other)),
        }
    }

    pub async fn pro_since(&self, entity_id: &str) -> Result<i32, ExtractError> {
        let property = Extractor::ProDebut.property();
        match self.best_value(entity_id, property).await? {
            ClaimValue::Time(time) => parse_year(&time.time),
            other => Err(unexpected(property, &other)),
        }
    }

    async fn entity_label(&self, entity_id: &str, extractor: Extractor) -> Result<String, ExtractError> {
        let property = extractor.property();
        let name_id = match self.best_value(entity_id, property).await? {
            ClaimValue::Entity(id) => id,
            other => return Err(unexpected(property, &other)),
        };

        Ok(self
            .fetcher
            .entity_label(&name_id, &self.label_language)
            .await?)
    }

    /// Value of the best claim for (entity, property)
    async fn best_value(&self, entity_id: &str, property: &str) -> Result<ClaimValue, ExtractError> {
        let claims = self.fetcher.try_fetch(entity_id, property).await?;
        best_claim(&claims)
            .ok_or_else(|| ExtractError::NotFound(format!("only deprecated {} claims", property)))?
            .value()
    }
}

fn unexpected(property: &str, value: &ClaimValue) -> ExtractError {
    ExtractError::Malformed(format!("{} has unexpected value {:?}", property, value))
}
