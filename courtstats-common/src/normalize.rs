//! Two-way normalization between storage form and display form
//!
//! Both directions are driven by per-field rules: every [`PlayerField`] maps
//! to exactly one [`DisplayRule`] and one [`StorageRule`]. The matches below
//! are exhaustive, so adding a field fails to compile until it is given a rule.
//!
//! Neither direction fails. Values that cannot be converted fall back to the
//! field's missing representation.

use chrono::{Datelike, NaiveDate, Utc};
use isocountry::CountryCode;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::player::{
    epoch_default, is_sentinel, FieldValue, Hand, PlayerField, PlayerRecord, PlayerView,
    DISPLAY_DATE_FORMAT, STORAGE_DATE_FORMAT, UNKNOWN,
};

/// Height accepted into storage, exclusive bounds (cm)
pub const HEIGHT_RANGE_CM: (u16, u16) = (100, 270);

/// Weight accepted into storage, exclusive bounds (kg)
pub const WEIGHT_RANGE_KG: (u16, u16) = (45, 150);

/// Earliest professional-debut year accepted into storage
pub const FIRST_PRO_YEAR: i32 = 1800;

static INITIALS_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z](\.[A-Z])*\.$").expect("static regex"));

static DISPLAY_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("static regex"));

/// How a field is rendered for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRule {
    Date,
    Country,
    Hand,
    Text,
}

/// How a field is accepted into storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageRule {
    /// Kept as given (trimmed)
    Identifier,
    /// Must be longer than one character
    FreeText,
    Date,
    Country,
    Hand,
    /// Integer strictly between the bounds
    Measure { min: u16, max: u16 },
    /// Year between [`FIRST_PRO_YEAR`] and the current year, inclusive
    Year,
    /// Computed from other fields after they are normalized
    Derived,
}

pub fn display_rule(field: PlayerField) -> DisplayRule {
    match field {
        PlayerField::BirthDate => DisplayRule::Date,
        PlayerField::Country => DisplayRule::Country,
        PlayerField::Hand => DisplayRule::Hand,
        PlayerField::PlayerId
        | PlayerField::NameFirst
        | PlayerField::NameLast
        | PlayerField::Fullname
        | PlayerField::Height
        | PlayerField::Weight
        | PlayerField::WikidataId
        | PlayerField::Instagram
        | PlayerField::Facebook
        | PlayerField::XTwitter
        | PlayerField::ProSince => DisplayRule::Text,
    }
}

pub fn storage_rule(field: PlayerField) -> StorageRule {
    match field {
        PlayerField::PlayerId => StorageRule::Identifier,
        PlayerField::NameFirst
        | PlayerField::NameLast
        | PlayerField::WikidataId
        | PlayerField::Instagram
        | PlayerField::Facebook
        | PlayerField::XTwitter => StorageRule::FreeText,
        PlayerField::Fullname => StorageRule::Derived,
        PlayerField::Hand => StorageRule::Hand,
        PlayerField::BirthDate => StorageRule::Date,
        PlayerField::Country => StorageRule::Country,
        PlayerField::Height => StorageRule::Measure {
            min: HEIGHT_RANGE_CM.0,
            max: HEIGHT_RANGE_CM.1,
        },
        PlayerField::Weight => StorageRule::Measure {
            min: WEIGHT_RANGE_KG.0,
            max: WEIGHT_RANGE_KG.1,
        },
        PlayerField::ProSince => StorageRule::Year,
    }
}

// ============================================================================
// Storage → display
// ============================================================================

/// Render a stored record for display
pub fn normalize_to_display(record: &PlayerRecord) -> PlayerView {
    let mut view = PlayerView::default();
    for field in PlayerField::ALL {
        *view.get_mut(field) = display_value(field, record.raw(field).as_deref());
    }
    view
}

/// Re-render a display-form record from an external source
///
/// Idempotent: a view produced by [`normalize_to_display`] comes back unchanged.
pub fn normalize_view_to_display(view: &PlayerView) -> PlayerView {
    let mut out = PlayerView::default();
    for field in PlayerField::ALL {
        *out.get_mut(field) = display_value(field, Some(view.get(field)));
    }
    out
}

/// Display string for one field
pub fn display_value(field: PlayerField, raw: Option<&str>) -> String {
    let value = raw.map(str::trim).unwrap_or("");
    let rule = display_rule(field);

    if rule != DisplayRule::Date && is_sentinel(value) {
        return field.missing_sentinel().to_string();
    }

    match rule {
        DisplayRule::Date => display_date(value),
        DisplayRule::Country => country_alpha2(value).unwrap_or_else(|| UNKNOWN.to_string()),
        DisplayRule::Hand => display_hand(value),
        DisplayRule::Text => value.to_string(),
    }
}

fn display_date(value: &str) -> String {
    if DISPLAY_DATE.is_match(value)
        && NaiveDate::parse_from_str(value, DISPLAY_DATE_FORMAT).is_ok()
    {
        return value.to_string();
    }

    match NaiveDate::parse_from_str(value, STORAGE_DATE_FORMAT) {
        Ok(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(e) => {
            if !is_sentinel(value) {
                warn!(value = %value, error = %e, "Date could not be converted for display");
            }
            epoch_default().format(DISPLAY_DATE_FORMAT).to_string()
        }
    }
}

fn display_hand(value: &str) -> String {
    if Hand::from_label(value).is_some() {
        return value.to_string();
    }
    Hand::from_code(value)
        .map(|hand| hand.label().to_string())
        .unwrap_or_else(|| PlayerField::Hand.missing_sentinel().to_string())
}

// ============================================================================
// Display / external input → storage
// ============================================================================

/// Normalize a display-form or externally supplied record into storage form
pub fn normalize_into_storage(view: &PlayerView) -> PlayerRecord {
    let mut record = PlayerRecord::new(view.player_id.trim());

    for field in PlayerField::ALL {
        let value = view.get(field).trim();
        let normalized = match storage_rule(field) {
            StorageRule::Identifier | StorageRule::Derived => continue,
            _ if is_sentinel(value) => None,
            StorageRule::FreeText => free_text(value).map(FieldValue::Text),
            StorageRule::Date => parse_date(value).map(FieldValue::Date),
            StorageRule::Country => country_alpha2(value).map(FieldValue::Text),
            StorageRule::Hand => storage_hand(value).map(FieldValue::Hand),
            StorageRule::Measure { min, max } => {
                measure_in_range(value, min, max).map(FieldValue::Measure)
            }
            StorageRule::Year => year_in_range(value).map(FieldValue::Year),
        };

        match normalized {
            Some(v) => {
                record.apply(field, v);
            }
            None if !is_sentinel(value) => {
                debug!(field = %field, value = %value, "Value rejected for storage");
            }
            None => {}
        }
    }

    record.fullname = compose_fullname(record.name_last.as_deref(), record.name_first.as_deref());
    record
}

fn free_text(value: &str) -> Option<String> {
    (value.chars().count() > 1).then(|| value.to_string())
}

/// Parse `YYYY-MM-DD` or `dd-mm-YYYY`; the epoch placeholder counts as missing
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = [STORAGE_DATE_FORMAT, DISPLAY_DATE_FORMAT]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok());

    match date {
        Some(date) if date == epoch_default() => None,
        Some(date) => Some(date),
        None => {
            warn!(value = %value, "Date could not be converted for storage");
            None
        }
    }
}

fn storage_hand(value: &str) -> Option<Hand> {
    Hand::from_label(value).or_else(|| Hand::from_code(value))
}

fn measure_in_range(value: &str, min: u16, max: u16) -> Option<u16> {
    let parsed = value.parse::<i64>().ok()?;
    (parsed > i64::from(min) && parsed < i64::from(max)).then(|| parsed as u16)
}

fn year_in_range(value: &str) -> Option<i32> {
    let year = value.parse::<i32>().ok()?;
    (FIRST_PRO_YEAR..=Utc::now().year()).contains(&year).then_some(year)
}

/// Map a 2- or 3-letter ISO-3166 code to lower-case alpha-2
pub fn country_alpha2(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();
    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let country = match code.len() {
        2 => CountryCode::for_alpha2(&code).ok(),
        3 => CountryCode::for_alpha3(&code).ok(),
        _ => None,
    }?;

    Some(country.alpha2().to_lowercase())
}

// ============================================================================
// Derived full name
// ============================================================================

/// `"Nadal R."` style name, `None` when the last name is unknown
pub fn compose_fullname(name_last: Option<&str>, name_first: Option<&str>) -> Option<String> {
    let last = name_last.map(str::trim).filter(|v| !is_sentinel(v))?;

    match name_first.map(str::trim).filter(|v| !is_sentinel(v)) {
        Some(first) => Some(format!("{} {}", last, initials(first))),
        None => Some(last.to_string()),
    }
}

/// Upper-case dotted initials; an already-initialed name is returned as is
pub fn initials(name: &str) -> String {
    let name = name.trim();

    if name.split_whitespace().all(|part| INITIALS_PART.is_match(part)) {
        return name.to_string();
    }

    let letters: Vec<String> = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .map(|c| c.to_uppercase().collect())
        .collect();

    format!("{}.", letters.join("."))
}
