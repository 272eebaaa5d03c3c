//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: search request → encoded HTTP requests → result set

use crossref_client::{
    ClientConfig, Crossref, Error, FanOut, Fetched, ResultShape, SearchRequest, StopReason,
    TransportOptions,
};
use crossref_client::types::SortOrder;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Crossref {
    let config = ClientConfig::builder().base_url(server.uri()).build();
    Crossref::with_config(&config).unwrap()
}

fn work_list(dois: &[&str], total: u64, next: Option<&str>) -> Value {
    let items: Vec<Value> = dois.iter().map(|d| json!({"DOI": d})).collect();
    let mut message = json!({
        "items": items,
        "total-results": total,
        "items-per-page": dois.len(),
    });
    if let Some(next) = next {
        message["next-cursor"] = json!(next);
    }
    json!({"status": "ok", "message-type": "work-list", "message": message})
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
async fn test_works_query_and_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query", "ecology"))
        .and(query_param("query.author", "carl boettiger"))
        .and(query_param("filter", "has-full-text:true,from-pub-date:2014"))
        .and(query_param("rows", "2"))
        .and(query_param("sort", "published"))
        .and(query_param("order", "desc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(work_list(&["10.7717/peerj.1", "10.7717/peerj.2"], 2, None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = SearchRequest::default()
        .query("ecology")
        .field_query("author", "carl boettiger")
        .filter("has_full_text", true)
        .filter("from_pub_date", 2014_u32)
        .limit(2)
        .sort("published")
        .order(SortOrder::Desc);

    let result = client.works(request).await.unwrap();

    assert_eq!(result.shape(), ResultShape::Single);
    let page = result.as_page().unwrap();
    assert_eq!(page.item_count(), 2);
    assert_eq!(page.items()[0]["DOI"], "10.7717/peerj.1");
}

#[tokio::test]
async fn test_single_doi_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/10.1371/journal.pone.0033693"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message-type": "work",
            "message": {"DOI": "10.1371/journal.pone.0033693", "title": ["Methylphenidate"]}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .works(SearchRequest::default().ids("10.1371/journal.pone.0033693"))
        .await
        .unwrap();

    let page = result.as_page().unwrap();
    assert_eq!(page.message().unwrap()["title"][0], "Methylphenidate");
}

#[tokio::test]
async fn test_multi_doi_fan_out() {
    let mock_server = MockServer::start().await;

    for doi in ["10.1/a", "10.1/b", "10.1/c"] {
        Mock::given(method("GET"))
            .and(path(format!("/works/{doi}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "message": {"DOI": doi}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let result = client
        .works(SearchRequest::default().ids(vec!["10.1/a", "10.1/b", "10.1/c"]))
        .await
        .unwrap();

    let dois: Vec<String> = result
        .as_many()
        .unwrap()
        .iter()
        .map(|fetched| match fetched {
            Fetched::Page(page) => page.message().unwrap()["DOI"].as_str().unwrap().to_string(),
            Fetched::Pages(_) => panic!("Expected a page"),
        })
        .collect();
    assert_eq!(dois, vec!["10.1/a", "10.1/b", "10.1/c"]);
}

#[tokio::test]
async fn test_fan_out_failure_returns_no_partial_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/10.1/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/works/10.1/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Resource not found."))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .works(SearchRequest::default().ids(vec!["10.1/ok", "10.1/missing", "10.1/ok"]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ForId { ref id, .. } if id == "10.1/missing"));
    assert!(matches!(err.root(), Error::HttpStatus { status: 404, .. }));
    assert!(err.to_string().contains("10.1/missing"));
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[tokio::test]
async fn test_cursor_walk_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("cursor", "*"))
        .and(query_param("rows", "2"))
        .and(query_param_is_missing("offset"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(work_list(&["10.1/1", "10.1/2"], 5, Some("c1"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("cursor", "c1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(work_list(&["10.1/3", "10.1/4"], 5, Some("c2"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_list(&["10.1/5"], 5, Some("c3"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = SearchRequest::default()
        .query("octopus")
        .offset(10)
        .limit(2)
        .cursor("*");

    let result = client.works(request).await.unwrap();

    let pages = result.as_pages().unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages.total_items(), 5);
    assert_eq!(pages.stop_reason(), StopReason::Exhausted);
    let dois: Vec<&str> = pages.items().map(|i| i["DOI"].as_str().unwrap()).collect();
    assert_eq!(dois, vec!["10.1/1", "10.1/2", "10.1/3", "10.1/4", "10.1/5"]);
}

#[tokio::test]
async fn test_cursor_walk_failure_mid_walk() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("cursor", "*"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(work_list(&["10.1/1"], 100, Some("c1"))),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .works(SearchRequest::default().cursor("*"))
        .await
        .unwrap_err();

    match &err {
        Error::AtCursor { cursor, page, .. } => {
            assert_eq!(cursor, "c1");
            assert_eq!(*page, 1);
        }
        other => panic!("Expected AtCursor, got {other:?}"),
    }
    assert!(matches!(err.root(), Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_member_works_cursor_walk() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/members/98/works"))
        .and(query_param("cursor", "*"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(work_list(&["10.1/1", "10.1/2"], 10, Some("m1"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = SearchRequest::default()
        .ids("98")
        .works(true)
        .cursor("*")
        .cursor_max(2);

    let result = client.members(request).await.unwrap();

    let pages = result.as_pages().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages.stop_reason(), StopReason::CapReached);
    assert_eq!(pages.next_cursor(), Some("m1"));
}

// ============================================================================
// Derived Operation Tests
// ============================================================================

#[tokio::test]
async fn test_registration_agency() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works/10.1126/science.169.3946.635/agency"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message-type": "work-agency",
            "message": {
                "DOI": "10.1126/science.169.3946.635",
                "agency": {"id": "crossref", "label": "Crossref"}
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let agency = client
        .registration_agency("10.1126/science.169.3946.635", TransportOptions::default())
        .await
        .unwrap();

    assert_eq!(agency, FanOut::One("Crossref".to_string()));
}

#[tokio::test]
async fn test_random_dois() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("sample", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(work_list(&["10.9/x", "10.9/y"], 2, None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let dois = client.random_dois(2).await.unwrap();
    assert_eq!(dois, vec!["10.9/x", "10.9/y"]);
}

// ============================================================================
// Validation and Transport Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_filter_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .works(SearchRequest::default().filter("has_magic", true))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnknownFilter { ref name } if name == "has_magic"));
}

#[tokio::test]
async fn test_api_key_and_mailto() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/types"))
        .and(header("Crossref-Plus-API-Token", "Bearer plus-key"))
        .and(header("user-agent", "tool/2.0 (mailto:me@example.org)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "message": {"items": [{"id": "journal-article"}], "total-results": 1}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .base_url(mock_server.uri())
        .api_key("plus-key")
        .user_agent("tool/2.0")
        .mailto("me@example.org")
        .build();
    let client = Crossref::with_config(&config).unwrap();

    let result = client.types(SearchRequest::default()).await.unwrap();
    assert_eq!(result.as_page().unwrap().item_count(), 1);
}

#[tokio::test]
async fn test_transport_options_pass_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/licenses"))
        .and(header("X-Trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request =
        SearchRequest::default().transport(TransportOptions::new().header("X-Trace", "abc"));
    let result = client.licenses(request).await.unwrap();
    assert_eq!(result.as_page().unwrap().status(), Some("ok"));
}
