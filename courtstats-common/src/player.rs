//! Player record model
//!
//! A player exists in two shapes:
//! - [`PlayerRecord`]: storage form. Typed values, `None` marks a missing attribute.
//! - [`PlayerView`]: display form. Every field is a string and a missing
//!   attribute is rendered with the field's sentinel.
//!
//! Both shapes are addressed field by field through [`PlayerField`], which is
//! what the normalizer and the enrichment tables are keyed on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Sentinel rendered for most missing display values
pub const MISSING: &str = "-";

/// Sentinel rendered for a missing country (and written by legacy loaders)
pub const UNKNOWN: &str = "unknown";

/// Date format used by the storage collaborator
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format used by the display form
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Placeholder birth date written by legacy storage for "unknown"
pub fn epoch_default() -> NaiveDate {
    NaiveDate::from_ymd_opt(1800, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// True for the string sentinels that stand in for an absent value
pub fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == MISSING || value.eq_ignore_ascii_case(UNKNOWN)
}

/// Every attribute of a player, in record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerField {
    PlayerId,
    NameFirst,
    NameLast,
    Fullname,
    Hand,
    BirthDate,
    Country,
    Height,
    Weight,
    WikidataId,
    Instagram,
    Facebook,
    XTwitter,
    ProSince,
}

impl PlayerField {
    pub const ALL: [PlayerField; 14] = [
        PlayerField::PlayerId,
        PlayerField::NameFirst,
        PlayerField::NameLast,
        PlayerField::Fullname,
        PlayerField::Hand,
        PlayerField::BirthDate,
        PlayerField::Country,
        PlayerField::Height,
        PlayerField::Weight,
        PlayerField::WikidataId,
        PlayerField::Instagram,
        PlayerField::Facebook,
        PlayerField::XTwitter,
        PlayerField::ProSince,
    ];

    /// Column / JSON key name
    pub fn name(self) -> &'static str {
        match self {
            PlayerField::PlayerId => "player_id",
            PlayerField::NameFirst => "name_first",
            PlayerField::NameLast => "name_last",
            PlayerField::Fullname => "fullname",
            PlayerField::Hand => "hand",
            PlayerField::BirthDate => "birth_date",
            PlayerField::Country => "country",
            PlayerField::Height => "height",
            PlayerField::Weight => "weight",
            PlayerField::WikidataId => "wikidata_id",
            PlayerField::Instagram => "instagram",
            PlayerField::Facebook => "facebook",
            PlayerField::XTwitter => "x_twitter",
            PlayerField::ProSince => "pro_since",
        }
    }

    /// Sentinel the display form uses when this field has no value
    pub fn missing_sentinel(self) -> &'static str {
        match self {
            PlayerField::Country => UNKNOWN,
            _ => MISSING,
        }
    }
}

impl fmt::Display for PlayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Playing hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Right,
    Left,
}

impl Hand {
    /// Single-letter storage code
    pub fn code(self) -> &'static str {
        match self {
            Hand::Right => "R",
            Hand::Left => "L",
        }
    }

    /// Localized display label
    pub fn label(self) -> &'static str {
        match self {
            Hand::Right => "Derecha",
            Hand::Left => "Izquierda",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "r" => Some(Hand::Right),
            "l" => Some(Hand::Left),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "derecha" => Some(Hand::Right),
            "izquierda" => Some(Hand::Left),
            _ => None,
        }
    }
}

/// A typed value destined for one [`PlayerField`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    /// Height in cm or weight in kg
    Measure(u16),
    Year(i32),
    Hand(Hand),
}

/// Player in storage form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub player_id: String,
    pub name_first: Option<String>,
    pub name_last: Option<String>,
    pub fullname: Option<String>,
    /// Single-letter hand code (`R` / `L`)
    pub hand: Option<String>,
    pub birth_date: Option<NaiveDate>,
    /// Lower-case ISO-3166-1 alpha-2 code
    pub country: Option<String>,
    /// Centimetres
    pub height: Option<u16>,
    /// Kilograms
    pub weight: Option<u16>,
    pub wikidata_id: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub x_twitter: Option<String>,
    pub pro_since: Option<i32>,
}

impl PlayerRecord {
    /// Record with an identifier and nothing else known
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ..Default::default()
        }
    }

    /// Storage-form string for a field, `None` when the field is missing
    pub fn raw(&self, field: PlayerField) -> Option<String> {
        match field {
            PlayerField::PlayerId => Some(self.player_id.clone()),
            PlayerField::NameFirst => self.name_first.clone(),
            PlayerField::NameLast => self.name_last.clone(),
            PlayerField::Fullname => self.fullname.clone(),
            PlayerField::Hand => self.hand.clone(),
            PlayerField::BirthDate => self
                .birth_date
                .map(|d| d.format(STORAGE_DATE_FORMAT).to_string()),
            PlayerField::Country => self.country.clone(),
            PlayerField::Height => self.height.map(|v| v.to_string()),
            PlayerField::Weight => self.weight.map(|v| v.to_string()),
            PlayerField::WikidataId => self.wikidata_id.clone(),
            PlayerField::Instagram => self.instagram.clone(),
            PlayerField::Facebook => self.facebook.clone(),
            PlayerField::XTwitter => self.x_twitter.clone(),
            PlayerField::ProSince => self.pro_since.map(|v| v.to_string()),
        }
    }

    /// Whether a field holds no usable value
    ///
    /// Legacy sentinels written by older loaders count as missing, and so
    /// does the epoch placeholder for the birth date.
    pub fn is_missing(&self, field: PlayerField) -> bool {
        match field {
            PlayerField::BirthDate => match self.birth_date {
                None => true,
                Some(date) => date == epoch_default(),
            },
            _ => match self.raw(field) {
                None => true,
                Some(value) => is_sentinel(&value),
            },
        }
    }

    /// Set a field, returning whether the stored value changed
    ///
    /// A value whose kind does not fit the field is ignored.
    pub fn apply(&mut self, field: PlayerField, value: FieldValue) -> bool {
        match (field, value) {
            (PlayerField::NameFirst, FieldValue::Text(v)) => replace(&mut self.name_first, v),
            (PlayerField::NameLast, FieldValue::Text(v)) => replace(&mut self.name_last, v),
            (PlayerField::Hand, FieldValue::Hand(h)) => {
                replace(&mut self.hand, h.code().to_string())
            }
            (PlayerField::BirthDate, FieldValue::Date(d)) => replace(&mut self.birth_date, d),
            (PlayerField::Country, FieldValue::Text(v)) => {
                replace(&mut self.country, v.to_lowercase())
            }
            (PlayerField::Height, FieldValue::Measure(v)) => replace(&mut self.height, v),
            (PlayerField::Weight, FieldValue::Measure(v)) => replace(&mut self.weight, v),
            (PlayerField::WikidataId, FieldValue::Text(v)) => replace(&mut self.wikidata_id, v),
            (PlayerField::Instagram, FieldValue::Text(v)) => replace(&mut self.instagram, v),
            (PlayerField::Facebook, FieldValue::Text(v)) => replace(&mut self.facebook, v),
            (PlayerField::XTwitter, FieldValue::Text(v)) => replace(&mut self.x_twitter, v),
            (PlayerField::ProSince, FieldValue::Year(v)) => replace(&mut self.pro_since, v),
            (field, value) => {
                warn!(
                    player_id = %self.player_id,
                    field = %field,
                    value = ?value,
                    "Value kind does not fit field, ignored"
                );
                false
            }
        }
    }
}

fn replace<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        return false;
    }
    *slot = Some(value);
    true
}

/// Player in display form
///
/// Also the shape accepted from external input before it is normalized into
/// storage form; absent keys deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerView {
    pub player_id: String,
    pub name_first: String,
    pub name_last: String,
    pub fullname: String,
    pub hand: String,
    pub birth_date: String,
    pub country: String,
    pub height: String,
    pub weight: String,
    pub wikidata_id: String,
    pub instagram: String,
    pub facebook: String,
    pub x_twitter: String,
    pub pro_since: String,
}

impl PlayerView {
    pub fn get(&self, field: PlayerField) -> &str {
        match field {
            PlayerField::PlayerId => &self.player_id,
            PlayerField::NameFirst => &self.name_first,
            PlayerField::NameLast => &self.name_last,
            PlayerField::Fullname => &self.fullname,
            PlayerField::Hand => &self.hand,
            PlayerField::BirthDate => &self.birth_date,
            PlayerField::Country => &self.country,
            PlayerField::Height => &self.height,
            PlayerField::Weight => &self.weight,
            PlayerField::WikidataId => &self.wikidata_id,
            PlayerField::Instagram => &self.instagram,
            PlayerField::Facebook => &self.facebook,
            PlayerField::XTwitter => &self.x_twitter,
            PlayerField::ProSince => &self.pro_since,
        }
    }

    pub fn get_mut(&mut self, field: PlayerField) -> &mut String {
        match field {
            PlayerField::PlayerId => &mut self.player_id,
            PlayerField::NameFirst => &mut self.name_first,
            PlayerField::NameLast => &mut self.name_last,
            PlayerField::Fullname => &mut self.fullname,
            PlayerField::Hand => &mut self.hand,
            PlayerField::BirthDate => &mut self.birth_date,
            PlayerField::Country => &mut self.country,
            PlayerField::Height => &mut self.height,
            PlayerField::Weight => &mut self.weight,
            PlayerField::WikidataId => &mut self.wikidata_id,
            PlayerField::Instagram => &mut self.instagram,
            PlayerField::Facebook => &mut self.facebook,
            PlayerField::XTwitter => &mut self.x_twitter,
            PlayerField::ProSince => &mut self.pro_since,
        }
    }
}
