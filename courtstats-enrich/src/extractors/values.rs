//! Claim value conversions
//!
//! Pure functions turning raw claim values into canonical field values:
//! partial-precision timestamps, quantities with unit conversion and the
//! handedness entities.

use chrono::NaiveDate;

use courtstats_common::Hand;

use crate::error::ExtractError;
use crate::knowledge_base::claims::QuantityValue;

/// Unit entity → centimetres
pub const HEIGHT_UNITS_TO_CM: &[(&str, f64)] = &[
    ("Q11573", 100.0), // metre
    ("Q174728", 1.0),  // centimetre
    ("Q3710", 30.48),  // foot
    ("Q218593", 2.54), // inch
];

/// Unit entity → kilograms
pub const WEIGHT_UNITS_TO_KG: &[(&str, f64)] = &[
    ("Q11570", 1.0),    // kilogram
    ("Q19908", 0.4536), // pound
];

/// Handedness entities
pub const RIGHT_HANDED: &str = "Q1310443";
pub const LEFT_HANDED: &str = "Q3029952";

/// Calendar date of a timestamp such as `+1986-06-03T00:00:00Z`
///
/// Accepts `YYYY`, `YYYY-MM` and `YYYY-MM-DD` with an optional sign and time
/// part. A zero or absent month or day (reduced precision) becomes the 1st.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDate, ExtractError> {
    let date_part = date_part(raw)?;
    let mut parts = date_part.split('-');

    let year = parse_component(parts.next(), raw)?
        .ok_or_else(|| malformed_time(raw))?;
    let month = parse_component(parts.next(), raw)?.filter(|m| *m > 0).unwrap_or(1);
    let day = parse_component(parts.next(), raw)?.filter(|d| *d > 0).unwrap_or(1);

    if parts.next().is_some() {
        return Err(malformed_time(raw));
    }

    let year = i32::try_from(year).map_err(|_| malformed_time(raw))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| malformed_time(raw))
}

/// Year of a timestamp such as `+2005-04-30T00:00:00Z`
pub fn parse_year(raw: &str) -> Result<i32, ExtractError> {
    let date_part = date_part(raw)?;
    let year = parse_component(date_part.split('-').next(), raw)?
        .ok_or_else(|| malformed_time(raw))?;
    i32::try_from(year).map_err(|_| malformed_time(raw))
}

/// Date portion of a timestamp with the sign removed
///
/// Dates before the common era are rejected; no player was born then.
fn date_part(raw: &str) -> Result<&str, ExtractError> {
    let trimmed = raw.trim();
    if trimmed.starts_with('-') {
        return Err(ExtractError::Malformed(format!(
            "timestamp '{}' is before the common era",
            raw
        )));
    }

    let unsigned = trimmed.trim_start_matches('+');
    let date_part = unsigned.split('T').next().unwrap_or_default();
    if date_part.is_empty() {
        return Err(malformed_time(raw));
    }
    Ok(date_part)
}

fn parse_component(part: Option<&str>, raw: &str) -> Result<Option<u32>, ExtractError> {
    match part {
        None => Ok(None),
        Some(p) => p.parse::<u32>().map(Some).map_err(|_| malformed_time(raw)),
    }
}

fn malformed_time(raw: &str) -> ExtractError {
    ExtractError::Malformed(format!("unparseable timestamp '{}'", raw))
}

/// Convert a quantity with `units` (unit entity → factor), truncating
pub fn convert_quantity(
    quantity: &QuantityValue,
    units: &[(&str, f64)],
) -> Result<u16, ExtractError> {
    let amount: f64 = quantity
        .amount
        .trim()
        .trim_start_matches('+')
        .parse()
        .map_err(|_| {
            ExtractError::Malformed(format!("unparseable amount '{}'", quantity.amount))
        })?;

    let unit = quantity.unit.rsplit('/').next().unwrap_or_default();
    let factor = units
        .iter()
        .find(|(id, _)| *id == unit)
        .map(|(_, factor)| *factor)
        .ok_or_else(|| ExtractError::NotFound(format!("unrecognized unit '{}'", quantity.unit)))?;

    let converted = (amount * factor).trunc();
    if !(0.0..=f64::from(u16::MAX)).contains(&converted) {
        return Err(ExtractError::Malformed(format!(
            "quantity {} {} out of range",
            quantity.amount, unit
        )));
    }
    Ok(converted as u16)
}

pub fn hand_for_entity(entity_id: &str) -> Option<Hand> {
    match entity_id {
        RIGHT_HANDED => Some(Hand::Right),
        LEFT_HANDED => Some(Hand::Left),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quantity(amount: &str, unit: &str) -> QuantityValue {
        QuantityValue {
            amount: amount.to_string(),
            unit: format!("http://www.wikidata.org/entity/{}", unit),
        }
    }

    #[test]
    fn test_parse_timestamp_precisions() {
        assert_eq!(parse_timestamp("+1986-06-03T00:00:00Z").unwrap(), date(1986, 6, 3));
        assert_eq!(parse_timestamp("1986-06-03T00:00:00").unwrap(), date(1986, 6, 3));
        assert_eq!(parse_timestamp("1986-06-03").unwrap(), date(1986, 6, 3));
        assert_eq!(parse_timestamp("2007-10").unwrap(), date(2007, 10, 1));
        assert_eq!(parse_timestamp("2007").unwrap(), date(2007, 1, 1));
        assert_eq!(parse_timestamp("+1987-00-00T00:00:00Z").unwrap(), date(1987, 1, 1));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(parse_timestamp(""), Err(ExtractError::Malformed(_))));
        assert!(matches!(parse_timestamp("soon"), Err(ExtractError::Malformed(_))));
        assert!(matches!(parse_timestamp("-0500-01-01T00:00:00Z"), Err(ExtractError::Malformed(_))));
        assert!(matches!(parse_timestamp("1986-13-40"), Err(ExtractError::Malformed(_))));
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("+2005-04-30T00:00:00Z").unwrap(), 2005);
        assert_eq!(parse_year("2001").unwrap(), 2001);
        assert!(parse_year("+T").is_err());
    }

    #[test]
    fn test_height_units() {
        assert_eq!(convert_quantity(&quantity("+1.85", "Q11573"), HEIGHT_UNITS_TO_CM).unwrap(), 185);
        assert_eq!(convert_quantity(&quantity("+185", "Q174728"), HEIGHT_UNITS_TO_CM).unwrap(), 185);
        assert_eq!(convert_quantity(&quantity("+6", "Q3710"), HEIGHT_UNITS_TO_CM).unwrap(), 182);
        assert_eq!(convert_quantity(&quantity("+73", "Q218593"), HEIGHT_UNITS_TO_CM).unwrap(), 185);
    }

    #[test]
    fn test_weight_units() {
        assert_eq!(convert_quantity(&quantity("+85", "Q11570"), WEIGHT_UNITS_TO_KG).unwrap(), 85);
        assert_eq!(convert_quantity(&quantity("+185", "Q19908"), WEIGHT_UNITS_TO_KG).unwrap(), 83);
    }

    #[test]
    fn test_unknown_unit_is_not_found() {
        let result = convert_quantity(&quantity("+1.85", "Q11570"), HEIGHT_UNITS_TO_CM);
        assert!(matches!(result, Err(ExtractError::NotFound(_))));
    }

    #[test]
    fn test_bad_amount_is_malformed() {
        let result = convert_quantity(&quantity("tall", "Q11573"), HEIGHT_UNITS_TO_CM);
        assert!(matches!(result, Err(ExtractError::Malformed(_))));
        let result = convert_quantity(&quantity("-1.85", "Q11573"), HEIGHT_UNITS_TO_CM);
        assert!(matches!(result, Err(ExtractError::Malformed(_))));
    }

    #[test]
    fn test_hand_for_entity() {
        assert_eq!(hand_for_entity("Q1310443"), Some(Hand::Right));
        assert_eq!(hand_for_entity("Q3029952"), Some(Hand::Left));
        assert_eq!(hand_for_entity("Q789447"), None);
    }
}
