//! Claim model for the Wikidata action API
//!
//! A claim is deserialized leniently (every field defaulted) so that one odd
//! claim does not fail the whole list; its value is only interpreted when an
//! extractor asks for it through [`Claim::value`].

use serde::Deserialize;

use crate::error::ExtractError;

/// Claims returned for one (entity, property) pair
pub type ClaimList = Vec<Claim>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub mainsnak: Snak,
    #[serde(default)]
    pub rank: Rank,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snak {
    /// "value", "somevalue" or "novalue"
    #[serde(default)]
    pub snaktype: String,
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub datavalue: Option<DataValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataValue {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

/// Interpreted claim value
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// Reference to another entity (`Q…`)
    Entity(String),
    Text(String),
    Time(TimeValue),
    Quantity(QuantityValue),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeValue {
    /// e.g. `+1986-06-03T00:00:00Z`
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuantityValue {
    /// Signed decimal, e.g. `+1.85`
    pub amount: String,
    /// Unit entity URI, or `"1"` when unitless
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Deserialize)]
struct EntityRef {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "numeric-id", default)]
    numeric_id: Option<u64>,
}

impl Claim {
    /// Interpret the main snak's value
    pub fn value(&self) -> Result<ClaimValue, ExtractError> {
        let snak = &self.mainsnak;

        if !snak.snaktype.is_empty() && snak.snaktype != "value" {
            return Err(ExtractError::NotFound(format!(
                "{} claim has no value ({})",
                snak.property, snak.snaktype
            )));
        }

        let data = snak.datavalue.as_ref().ok_or_else(|| {
            ExtractError::Malformed(format!("{} claim without datavalue", snak.property))
        })?;

        let malformed = |e: serde_json::Error| {
            ExtractError::Malformed(format!("{} {} value: {}", snak.property, data.kind, e))
        };

        match data.kind.as_str() {
            "wikibase-entityid" => {
                let entity: EntityRef =
                    serde_json::from_value(data.value.clone()).map_err(malformed)?;
                entity
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .or_else(|| entity.numeric_id.map(|n| format!("Q{}", n)))
                    .map(ClaimValue::Entity)
                    .ok_or_else(|| {
                        ExtractError::Malformed(format!("{} entity reference without id", snak.property))
                    })
            }
            "string" | "external-id" => data
                .value
                .as_str()
                .map(|s| ClaimValue::Text(s.to_string()))
                .ok_or_else(|| {
                    ExtractError::Malformed(format!("{} string value is not a string", snak.property))
                }),
            "time" => serde_json::from_value(data.value.clone())
                .map(ClaimValue::Time)
                .map_err(malformed),
            "quantity" => serde_json::from_value(data.value.clone())
                .map(ClaimValue::Quantity)
                .map_err(malformed),
            other => Err(ExtractError::Malformed(format!(
                "{} has unsupported value type '{}'",
                snak.property, other
            ))),
        }
    }
}

/// Claim an extractor should read: preferred rank first, else the first
/// claim that is not deprecated
pub fn best_claim(claims: &[Claim]) -> Option<&Claim> {
    claims
        .iter()
        .find(|c| c.rank == Rank::Preferred)
        .or_else(|| claims.iter().find(|c| c.rank != Rank::Deprecated))
}
