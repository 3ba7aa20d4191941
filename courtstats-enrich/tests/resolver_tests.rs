//! Entity resolver tests

mod helpers;

use std::sync::Arc;

use courtstats_enrich::knowledge_base::ApiResponse;
use courtstats_enrich::EntityResolver;
use helpers::*;

fn resolver(mock: &Arc<MockTransport>) -> EntityResolver {
    EntityResolver::new(Arc::new(create_test_fetcher(Arc::clone(mock))), "en")
}

fn script_claim(mock: &MockTransport, entity: &str, property: &str, value: &str) {
    mock.respond(
        claims_query(entity, property),
        ApiResponse::ok(claims_body(property, vec![entity_claim(property, value)])),
    );
}

#[tokio::test]
async fn test_accepts_tennis_player_by_occupation() {
    let mock = Arc::new(MockTransport::new());
    mock.respond(search_query("Rafael Nadal"), ApiResponse::ok(search_body("Q10132")));
    script_claim(&mock, "Q10132", "P106", "Q10833314");

    let resolved = resolver(&mock).resolve(Some("Nadal"), Some("Rafael")).await;

    assert_eq!(resolved.as_deref(), Some("Q10132"));
    // Occupation matched, sport never consulted
    assert_eq!(mock.calls_for(&claims_query("Q10132", "P641")), 0);
}

#[tokio::test]
async fn test_accepts_tennis_player_by_sport() {
    let mock = Arc::new(MockTransport::new());
    mock.respond(search_query("Esther Vergeer"), ApiResponse::ok(search_body("Q232475")));
    script_claim(&mock, "Q232475", "P641", "Q847");

    let resolved = resolver(&mock).resolve(Some("Vergeer"), Some("Esther")).await;

    assert_eq!(resolved.as_deref(), Some("Q232475"));
}

#[tokio::test]
async fn test_rejects_namesake_who_is_not_a_tennis_player() {
    let mock = Arc::new(MockTransport::new());
    mock.respond(search_query("Carlos Moya"), ApiResponse::ok(search_body("Q5750")));
    script_claim(&mock, "Q5750", "P106", "Q937857"); // association football player
    script_claim(&mock, "Q5750", "P641", "Q2736"); // association football

    let resolved = resolver(&mock).resolve(Some("Moya"), Some("Carlos")).await;

    assert!(resolved.is_none());
    assert_eq!(mock.calls_for(&claims_query("Q5750", "P106")), 1);
    assert_eq!(mock.calls_for(&claims_query("Q5750", "P641")), 1);
}

#[tokio::test]
async fn test_searches_last_name_alone_without_first_name() {
    let mock = Arc::new(MockTransport::new());
    mock.respond(search_query("Nadal"), ApiResponse::ok(search_body("Q10132")));
    script_claim(&mock, "Q10132", "P106", "Q10833314");

    let resolved = resolver(&mock).resolve(Some("Nadal"), Some("-")).await;

    assert_eq!(resolved.as_deref(), Some("Q10132"));
}

#[tokio::test]
async fn test_no_search_hit_is_not_found() {
    let mock = Arc::new(MockTransport::new());

    let resolved = resolver(&mock).resolve(Some("Nobody"), Some("Known")).await;

    assert!(resolved.is_none());
    assert_eq!(mock.calls(), vec![search_query("Known Nobody")]);
}

#[tokio::test]
async fn test_missing_last_name_issues_no_request() {
    let mock = Arc::new(MockTransport::new());

    assert!(resolver(&mock).resolve(None, Some("Rafael")).await.is_none());
    assert!(resolver(&mock).resolve(Some("unknown"), Some("Rafael")).await.is_none());

    assert_eq!(mock.call_count(), 0);
}
