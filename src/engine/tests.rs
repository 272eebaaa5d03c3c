//! Tests for the execution engine

use super::*;
use crate::error::Error;
use crate::http::scripted::{entity, list_page, Reply, ScriptedDispatcher};
use crate::request::{Ids, ResultShape};
use crate::types::Resource;
use pretty_assertions::assert_eq;
use serde_json::json;

fn doi(n: usize) -> String {
    format!("10.1/{n}")
}

// ============================================================================
// Fan-out Tests
// ============================================================================

#[tokio::test]
async fn test_fan_out_single_id_is_bare() {
    let ids = Ids::from(vec!["10.1/a"]);
    let result = fan_out(&ids, |id| async move { Ok(id.map(str::to_string)) })
        .await
        .unwrap();
    assert_eq!(result, FanOut::One(Some("10.1/a".to_string())));
}

#[tokio::test]
async fn test_fan_out_no_id_calls_once() {
    let result = fan_out(&Ids::None, |id| async move { Ok(id.is_none()) })
        .await
        .unwrap();
    assert_eq!(result, FanOut::One(true));
}

#[tokio::test]
async fn test_fan_out_many_ids_keeps_order() {
    let ids = Ids::from(vec!["10.1/a", "10.1/b"]);
    let result = fan_out(&ids, |id| async move { Ok(id.unwrap_or("").to_uppercase()) })
        .await
        .unwrap();
    assert_eq!(
        result,
        FanOut::Many(vec!["10.1/A".to_string(), "10.1/B".to_string()])
    );
    assert_eq!(result.len(), 2);
}

#[tokio::test]
async fn test_fan_out_stops_at_first_failure() {
    let ids = Ids::from((1..=5).map(doi).collect::<Vec<_>>());
    let mut seen = Vec::new();

    let err = fan_out(&ids, |id| {
        let id = id.unwrap_or_default().to_string();
        seen.push(id.clone());
        async move {
            if id == "10.1/3" {
                Err(Error::http_status(503, "unavailable"))
            } else {
                Ok(id)
            }
        }
    })
    .await
    .unwrap_err();

    assert_eq!(seen, vec!["10.1/1", "10.1/2", "10.1/3"]);
    assert!(matches!(err, Error::ForId { ref id, .. } if id == "10.1/3"));
    assert!(matches!(err.root(), Error::HttpStatus { status: 503, .. }));
}

// ============================================================================
// Engine Tests
// ============================================================================

#[tokio::test]
async fn test_execute_single_page() {
    let dispatcher = ScriptedDispatcher::new([list_page(0, 20, 1000, None)]);
    let engine = QueryEngine::new(&dispatcher);
    let request = SearchRequest::new(Resource::Works).query("ecology").limit(20);

    let result = engine.execute(&request).await.unwrap();

    assert_eq!(result.shape(), ResultShape::Single);
    assert_eq!(result.shape(), request.shape());
    assert_eq!(result.as_page().unwrap().item_count(), 20);

    let calls = dispatcher.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "/works");
    assert_eq!(calls[0].query.to_string(), "query=ecology&rows=20");
}

#[tokio::test]
async fn test_execute_many_ids() {
    let dispatcher = ScriptedDispatcher::new([
        entity(json!({"DOI": "10.1/a"})),
        entity(json!({"DOI": "10.1/b"})),
    ]);
    let engine = QueryEngine::new(&dispatcher);
    let request = SearchRequest::new(Resource::Works).ids(vec!["10.1/a", "10.1/b"]);

    let result = engine.execute(&request).await.unwrap();

    assert_eq!(result.shape(), ResultShape::PerId);
    let many = result.as_many().unwrap();
    assert_eq!(many.len(), 2);
    match &many[1] {
        Fetched::Page(page) => assert_eq!(page.message().unwrap()["DOI"], "10.1/b"),
        other => panic!("Expected Page, got {other:?}"),
    }

    let paths: Vec<String> = dispatcher.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/works/10.1/a", "/works/10.1/b"]);
}

#[tokio::test]
async fn test_execute_many_ids_all_or_nothing() {
    let dispatcher = ScriptedDispatcher::new([
        entity(json!({"DOI": "10.1/1"})),
        entity(json!({"DOI": "10.1/2"})),
        Reply::Status(404),
        entity(json!({"DOI": "10.1/4"})),
        entity(json!({"DOI": "10.1/5"})),
    ]);
    let engine = QueryEngine::new(&dispatcher);
    let ids: Vec<String> = (1..=5).map(doi).collect();
    let request = SearchRequest::new(Resource::Works).ids(ids);

    let err = engine.execute(&request).await.unwrap_err();

    assert!(matches!(err, Error::ForId { ref id, .. } if id == "10.1/3"));
    assert_eq!(dispatcher.call_count(), 3);
}

#[tokio::test]
async fn test_execute_cursor_walk_uses_request_cap() {
    let dispatcher = ScriptedDispatcher::new([
        list_page(0, 100, 10_000, Some("c1")),
        list_page(100, 100, 10_000, Some("c2")),
        list_page(200, 100, 10_000, Some("c3")),
    ]);
    let engine = QueryEngine::new(&dispatcher);
    let request = SearchRequest::new(Resource::Works)
        .limit(100)
        .cursor("*")
        .cursor_max(150);

    let result = engine.execute(&request).await.unwrap();

    assert_eq!(result.shape(), ResultShape::Pages);
    assert_eq!(result.as_pages().unwrap().len(), 2);
    assert_eq!(dispatcher.call_count(), 2);
}

#[tokio::test]
async fn test_execute_cursor_walk_uses_engine_default_cap() {
    let dispatcher = ScriptedDispatcher::new([
        list_page(0, 100, 10_000, Some("c1")),
        list_page(100, 100, 10_000, Some("c2")),
    ]);
    let engine = QueryEngine::new(&dispatcher).with_cursor_max(100);
    let request = SearchRequest::new(Resource::Works).limit(100).cursor("*");

    let result = engine.execute(&request).await.unwrap();
    assert_eq!(result.as_pages().unwrap().len(), 1);
}

#[tokio::test]
async fn test_execute_cursor_per_member() {
    let dispatcher = ScriptedDispatcher::new([
        list_page(0, 10, 10, Some("a1")),
        list_page(0, 5, 5, Some("b1")),
    ]);
    let engine = QueryEngine::new(&dispatcher);
    let request = SearchRequest::new(Resource::Members)
        .ids(vec!["98", "340"])
        .works(true)
        .cursor("*");

    let result = engine.execute(&request).await.unwrap();

    let many = result.as_many().unwrap();
    assert!(matches!(&many[0], Fetched::Pages(p) if p.total_items() == 10));
    assert!(matches!(&many[1], Fetched::Pages(p) if p.total_items() == 5));

    let paths: Vec<String> = dispatcher.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/members/98/works", "/members/340/works"]);
}

#[tokio::test]
async fn test_validation_failure_makes_no_calls() {
    let dispatcher = ScriptedDispatcher::new([list_page(0, 1, 1, None)]);
    let engine = QueryEngine::new(&dispatcher);
    let request = SearchRequest::new(Resource::Works).filter("not_a_filter", "x");

    let err = engine.execute(&request).await.unwrap_err();

    assert!(matches!(err, Error::UnknownFilter { .. }));
    assert_eq!(dispatcher.call_count(), 0);
}

#[test]
fn test_result_set_serializes_untagged() {
    let result = ResultSet::Many(vec![Fetched::Page(Page::new(json!({"status": "ok"})))]);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!([{"status": "ok"}])
    );
}
