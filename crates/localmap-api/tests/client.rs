//! Integration tests for `StoreClient` using wiremock HTTP mocks.

use localmap_api::{ApiError, StoreClient};
use localmap_core::geo::LatLngBounds;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> StoreClient {
    StoreClient::new(base_url, 30, "localmap-test/0.1")
        .expect("client construction should not fail")
}

fn store_json(key: &str, name: &str, lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "uuid": key,
        "storeName": name,
        "address": "12 Jong-ro, Jongno-gu",
        "localBill": "Seoul Love Gift Card",
        "region": "Seoul",
        "sectorName": "Cafe",
        "telNumber": "02-123-4567",
        "latitude": lat,
        "longitude": lng
    })
}

#[tokio::test]
async fn nearby_by_point_returns_stores() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/nearby"))
        .and(query_param("latitude", "37.5665"))
        .and(query_param("longitude", "126.978"))
        .and(query_param("distance", "3000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            store_json("k1", "Coffee Hanok", 37.5703, 126.983),
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stores = client
        .nearby_by_point(37.5665, 126.978, 3000)
        .await
        .expect("should parse stores");

    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].key, "k1");
    assert_eq!(stores[0].name, "Coffee Hanok");
}

#[tokio::test]
async fn nearby_by_rect_sends_corner_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/nearby/linestring"))
        .and(query_param("leftLatitude", "37.5"))
        .and(query_param("leftLongitude", "126.9"))
        .and(query_param("rightLatitude", "37.6"))
        .and(query_param("rightLongitude", "127.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let bounds = LatLngBounds::new(37.5, 126.9, 37.6, 127.1);
    let stores = client
        .nearby_by_rect(&bounds)
        .await
        .expect("should parse empty list");
    assert!(stores.is_empty());
}

#[tokio::test]
async fn markers_by_rect_returns_projections() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/nearby/marker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"uuid": "m1", "latitude": 37.51, "longitude": 126.95},
            {"uuid": "m2", "latitude": 37.52, "longitude": 126.96},
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let bounds = LatLngBounds::new(37.5, 126.9, 37.6, 127.1);
    let markers = client
        .markers_by_rect(&bounds)
        .await
        .expect("should parse markers");

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].key, "m1");
    assert!((markers[1].latitude - 37.52).abs() < 1e-9);
}

#[tokio::test]
async fn search_by_name_unwraps_page_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/search/name"))
        .and(query_param("storeName", "Coffee"))
        .and(query_param("page", "0"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [store_json("k1", "Coffee Hanok", 37.50, 127.02)],
            "totalElements": 1,
            "totalPages": 1
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stores = client
        .search_by_name("Coffee", 0, 20)
        .await
        .expect("should parse page");

    assert_eq!(stores.len(), 1);
    assert!((stores[0].latitude - 37.50).abs() < 1e-9);
    assert!((stores[0].longitude - 127.02).abs() < 1e-9);
}

#[tokio::test]
async fn search_by_region_unwraps_page_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/search/region"))
        .and(query_param("region", "Seoul"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": [store_json("k9", "Hanok Books", 37.57, 126.98)]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stores = client
        .search_by_region("Seoul", 0, 20)
        .await
        .expect("should parse page");
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].region, "Seoul");
}

#[tokio::test]
async fn store_detail_fetches_by_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/k1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(store_json("k1", "Coffee Hanok", 37.57, 126.98)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let store = client.store_detail("k1").await.expect("should parse store");
    assert_eq!(store.key, "k1");
    assert_eq!(store.phone.as_deref(), Some("02-123-4567"));
}

#[tokio::test]
async fn institutions_returns_v2_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/institutions/v2/names"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"regionName": "Seoul", "latitude": 37.5665, "longitude": 126.978},
            {"regionName": "Busan", "latitude": 35.1796, "longitude": 129.0756},
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let institutions = client
        .institutions()
        .await
        .expect("should parse institutions");
    assert_eq!(institutions.len(), 2);
    assert_eq!(institutions[1].region_name, "Busan");
}

#[tokio::test]
async fn non_success_status_is_an_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/nearby"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.nearby_by_point(37.5, 126.9, 3000).await;
    assert!(matches!(result, Err(ApiError::Http(_))));
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/local-stores/nearby"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.nearby_by_point(37.5, 126.9, 3000).await;
    assert!(matches!(result, Err(ApiError::Deserialize { .. })));
}
