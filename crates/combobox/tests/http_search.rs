//! HTTP search source against a mock server.

use combobox::{
    ApiConfig, ComboboxConfig, ErrorKind, HttpMethod, HttpSearchSource, Mode, OptionId,
    ResponseMapping, SearchError, SearchSource,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn products() -> serde_json::Value {
    json!({
        "products": [
            { "id": 1, "title": "iPhone 9" },
            { "id": 2, "title": "iPhone X" },
            { "id": 3, "name": "Pixel" },
            { "id": "sku-4" }
        ],
        "total": 4
    })
}

#[tokio::test]
async fn test_get_sends_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/search"))
        .and(query_param("q", "phone"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products()))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpSearchSource::new(&format!("{}/products/search", server.uri())).unwrap();
    let found = source.search("phone").await.unwrap();

    let labels: Vec<_> = found.iter().map(|o| o.label()).collect();
    assert_eq!(labels, vec!["iPhone 9", "iPhone X", "Pixel", "Unknown"]);
    assert_eq!(found[0].value(), "1");
    assert_eq!(found[0].id(), Some(&OptionId::Number(1)));
    assert_eq!(found[3].value(), "sku-4");
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/search"))
        .and(body_json(json!({ "query": "ann" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "uid": "u1", "name": "Ann" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpSearchSource::new(&format!("{}/users/search", server.uri()))
        .unwrap()
        .method(HttpMethod::Post)
        .response_mapping(ResponseMapping {
            object_key: "users".into(),
            value_key: "uid".into(),
            label_key: "name".into(),
            limit: None,
        });
    let found = source.search("ann").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value(), "u1");
    assert_eq!(found[0].label(), "Ann");
}

#[tokio::test]
async fn test_custom_body_transform() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "term": "x", "size": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpSearchSource::new(&server.uri())
        .unwrap()
        .method(HttpMethod::Post)
        .body_transform(|query: &str| json!({ "term": query, "size": 5 }));
    assert!(source.search("x").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = HttpSearchSource::new(&server.uri()).unwrap();
    let err = source.search("phone").await.unwrap_err();
    assert_eq!(
        err,
        SearchError::Status {
            status: 500,
            reason: "Internal Server Error".into()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.to_string(), "API request failed: 500 Internal Server Error");
}

#[tokio::test]
async fn test_unexpected_shape_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": { "id": 1 } })))
        .mount(&server)
        .await;

    let source = HttpSearchSource::new(&server.uri()).unwrap();
    let err = source.search("phone").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid API response: expected an array at key \"products\", but got object"
    );
}

#[tokio::test]
async fn test_invalid_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let source = HttpSearchSource::new(&server.uri()).unwrap();
    let err = source.search("phone").await.unwrap_err();
    assert!(matches!(err, SearchError::Decode(_)));
}

#[tokio::test]
async fn test_config_headers_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer secret"))
        .and(header("x-tenant", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products()))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = ApiConfig::new(server.uri());
    api.headers.insert("Authorization".into(), "Bearer secret".into());
    api.headers.insert("X-Tenant".into(), "acme".into());
    let config = ComboboxConfig::new(Mode::Search)
        .with_api(api)
        .with_max_suggestions(2);

    let source = config
        .api
        .as_ref()
        .unwrap()
        .build_source(config.max_suggestions)
        .unwrap();
    let found = source.search("phone").await.unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let source = HttpSearchSource::new("http://127.0.0.1:1/search").unwrap();
    let err = source.search("phone").await.unwrap_err();
    assert!(matches!(err, SearchError::Transport(_)));
    assert!(err.to_string().starts_with("API request failed: "));
}

#[test]
fn test_invalid_url_is_rejected() {
    assert!(HttpSearchSource::new("not a url").is_err());
    let bad_header = HttpSearchSource::new("http://localhost/")
        .unwrap()
        .header("bad header", "x");
    assert!(bad_header.is_err());
}
