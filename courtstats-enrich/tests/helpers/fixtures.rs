//! Action API response fixtures

use chrono::NaiveDate;
use serde_json::{json, Value};

use courtstats_common::PlayerRecord;
use courtstats_enrich::knowledge_base::ApiQuery;

pub fn claims_query(entity: &str, property: &str) -> ApiQuery {
    ApiQuery::Claims {
        entity: entity.to_string(),
        property: property.to_string(),
    }
}

pub fn search_query(text: &str) -> ApiQuery {
    ApiQuery::Search {
        text: text.to_string(),
        language: "en".to_string(),
    }
}

pub fn labels_query(entity: &str) -> ApiQuery {
    ApiQuery::Labels {
        entity: entity.to_string(),
        language: "es".to_string(),
    }
}

/// `wbgetclaims` body holding `claims` for `property`
pub fn claims_body(property: &str, claims: Vec<Value>) -> String {
    json!({ "claims": { property: claims } }).to_string()
}

pub fn search_body(entity: &str) -> String {
    json!({
        "searchinfo": {"search": "player"},
        "search": [{"id": entity, "label": "player"}],
        "success": 1
    })
    .to_string()
}

pub fn label_body(entity: &str, value: &str) -> String {
    json!({
        "entities": {
            entity: {
                "type": "item",
                "id": entity,
                "labels": {"es": {"language": "es", "value": value}}
            }
        },
        "success": 1
    })
    .to_string()
}

fn claim(property: &str, kind: &str, value: Value) -> Value {
    json!({
        "mainsnak": {
            "snaktype": "value",
            "property": property,
            "datavalue": {"value": value, "type": kind}
        },
        "type": "statement",
        "rank": "normal"
    })
}

pub fn entity_claim(property: &str, entity: &str) -> Value {
    let numeric: u64 = entity.trim_start_matches('Q').parse().unwrap_or(0);
    claim(
        property,
        "wikibase-entityid",
        json!({"entity-type": "item", "numeric-id": numeric, "id": entity}),
    )
}

pub fn string_claim(property: &str, value: &str) -> Value {
    claim(property, "external-id", json!(value))
}

pub fn time_claim(property: &str, time: &str) -> Value {
    claim(
        property,
        "time",
        json!({
            "time": time,
            "timezone": 0,
            "precision": 11,
            "calendarmodel": "http://www.wikidata.org/entity/Q1985727"
        }),
    )
}

pub fn quantity_claim(property: &str, amount: &str, unit: &str) -> Value {
    claim(
        property,
        "quantity",
        json!({
            "amount": amount,
            "unit": format!("http://www.wikidata.org/entity/{}", unit)
        }),
    )
}

/// Fully known player: enrichment has nothing to do
pub fn complete_record() -> PlayerRecord {
    PlayerRecord {
        player_id: "104745".to_string(),
        name_first: Some("Rafael".to_string()),
        name_last: Some("Nadal".to_string()),
        fullname: Some("Nadal R.".to_string()),
        hand: Some("L".to_string()),
        birth_date: NaiveDate::from_ymd_opt(1986, 6, 3),
        country: Some("es".to_string()),
        height: Some(185),
        weight: Some(85),
        wikidata_id: Some("Q10132".to_string()),
        instagram: Some("rafaelnadal".to_string()),
        facebook: Some("Nadal".to_string()),
        x_twitter: Some("RafaelNadal".to_string()),
        pro_since: Some(2001),
    }
}
