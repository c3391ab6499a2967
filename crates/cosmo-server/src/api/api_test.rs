use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cosmo_cms::CmsClient;

use super::*;
use crate::content::Revalidation;

fn revalidation() -> Revalidation {
    Revalidation {
        services: Duration::from_secs(600),
        detail: Duration::from_secs(3600),
        works: Duration::from_secs(3000),
    }
}

fn test_state(server: &MockServer) -> AppState {
    let cms = CmsClient::with_base_url(&server.uri(), None, 5, "cosmo-test/0.1").expect("client");
    AppState::new(
        ContentService::new(cms, revalidation()),
        ImageResolver::new(server.uri()),
    )
}

fn test_app(state: AppState) -> Router {
    build_app(state, RateLimitState::per_minute(1_000))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

fn service(id: i64, title: &str, slug: &str, description: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "slug": slug,
        "description": description,
        "image": [{
            "url": format!("/uploads/{slug}.jpg"),
            "formats": { "large": { "url": format!("/uploads/large_{slug}.jpg") } }
        }]
    })
}

async fn mount_services(server: &MockServer, services: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .and(query_param("populate", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": services })))
        .mount(server)
        .await;
}

async fn mount_works(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 7,
                "title": "Губы",
                "before_after": true,
                "photos": [
                    { "url": "/uploads/before.jpg", "mime": "image/jpeg" },
                    { "url": "/uploads/after.jpg", "mime": "image/jpeg" }
                ]
            }]
        })))
        .mount(server)
        .await;
}

fn many_services(count: i64) -> Vec<serde_json::Value> {
    (1..=count)
        .map(|i| service(i, &format!("Услуга {i}"), &format!("usluga-{i}"), "Описание"))
        .collect()
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("bad_request", StatusCode::BAD_REQUEST),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("cms_unavailable", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}

#[tokio::test]
async fn health_echoes_request_id() {
    let server = MockServer::start().await;
    let response = test_app(test_state(&server))
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
}

#[tokio::test]
async fn home_page_features_three_services_and_seeds_search() {
    let server = MockServer::start().await;
    let mut services = many_services(4);
    services.push(service(5, "Пилинг", "piling", &"к".repeat(120)));
    mount_services(&server, services).await;
    mount_works(&server).await;

    let state = test_state(&server);
    let (status, json) = get_json(test_app(state.clone()), "/api/v1/pages/home").await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["featured"].as_array().map(Vec::len), Some(3));
    assert!(data["error"].is_null());
    assert_eq!(data["works"][0]["display"]["kind"], "before_after_images");

    let index = state.search.read().await;
    assert!(index.is_seeded());
    assert_eq!(index.all().len(), 5);
    // Search entries keep the whole description.
    assert_eq!(index.all()[4].description.chars().count(), 120);
}

#[tokio::test]
async fn home_page_renders_error_when_services_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_works(&server).await;

    let state = test_state(&server);
    let (status, json) = get_json(test_app(state.clone()), "/api/v1/pages/home").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"]["error"],
        "Не удалось загрузить услуг (Статус: 500)"
    );
    assert_eq!(json["data"]["featured"], json!([]));
    assert_eq!(json["data"]["works"].as_array().map(Vec::len), Some(1));
    let index = state.search.read().await;
    assert!(index.is_seeded());
    assert!(index.all().is_empty());
}

#[tokio::test]
async fn services_page_shows_grid_catalog_and_total() {
    let server = MockServer::start().await;
    let mut services = many_services(10);
    services.push(service(11, "Ёлочный пилинг", "yolochnyj", "Описание"));
    services.push(service(12, "", "", "Описание"));
    mount_services(&server, services).await;

    let (status, json) = get_json(test_app(test_state(&server)), "/api/v1/pages/services").await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["services"].as_array().map(Vec::len), Some(9));
    assert_eq!(data["total"], 12);
    let letters: Vec<&str> = data["catalog"]
        .as_array()
        .expect("catalog")
        .iter()
        .filter_map(|group| group["letter"].as_str())
        .collect();
    assert_eq!(letters, vec!["Ё", "У", "#"]);
}

#[tokio::test]
async fn services_page_renders_malformed_response_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let (status, json) = get_json(test_app(test_state(&server)), "/api/v1/pages/services").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["error"], "Некорректный формат ответа от API");
    assert_eq!(json["data"]["total"], 0);
}

#[tokio::test]
async fn service_detail_resolves_large_main_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .and(query_param("filters[slug][$eq]", "piling"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [service(5, "Пилинг", "piling", "Полное описание")]
        })))
        .mount(&server)
        .await;

    let (status, json) =
        get_json(test_app(test_state(&server)), "/api/v1/pages/services/piling").await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["service"]["title"], "Пилинг");
    assert_eq!(data["service"]["description"], "Полное описание");
    assert_eq!(
        data["main_image_url"],
        format!("{}/uploads/large_piling.jpg", server.uri())
    );
}

#[tokio::test]
async fn unknown_service_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let (status, json) =
        get_json(test_app(test_state(&server)), "/api/v1/pages/services/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn unknown_service_is_looked_up_again_instead_of_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let app = test_app(test_state(&server));
    for _ in 0..2 {
        let (status, _) = get_json(app.clone(), "/api/v1/pages/services/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn works_page_uses_gallery_error_wording() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/works"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (status, json) = get_json(test_app(test_state(&server)), "/api/v1/pages/works").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["error"], "Не удалось загрузить работы");
    assert_eq!(json["data"]["works"], json!([]));
}

#[tokio::test]
async fn services_are_served_from_cache_within_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": many_services(2) })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(test_state(&server));
    for _ in 0..3 {
        let (status, _) = get_json(app.clone(), "/api/v1/pages/services").await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn search_loads_services_and_matches_case_insensitively() {
    let server = MockServer::start().await;
    mount_services(
        &server,
        vec![
            service(1, "Чистка лица", "chistka", "..."),
            service(2, "Массаж", "massazh", "..."),
        ],
    )
    .await;

    let app = test_app(test_state(&server));
    let (status, json) = get_json(app.clone(), "/api/v1/search?q=%D0%9B%D0%98%D0%A6%D0%90").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = json["data"]["results"]
        .as_array()
        .expect("results")
        .iter()
        .filter_map(|s| s["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Чистка лица"]);

    let (_, json) = get_json(app, "/api/v1/search?q=%20%20").await;
    assert_eq!(json["data"]["results"], json!([]));
}

#[tokio::test]
async fn search_recovers_after_failed_home_render() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_services(&server, vec![service(2, "Массаж", "massazh", "...")]).await;
    mount_works(&server).await;

    let app = test_app(test_state(&server));
    let (status, json) = get_json(app.clone(), "/api/v1/pages/home").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["error"].is_string());

    // массаж
    let (status, json) = get_json(app, "/api/v1/search?q=%D0%BC%D0%B0%D1%81%D1%81%D0%B0%D0%B6").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = json["data"]["results"]
        .as_array()
        .expect("results")
        .iter()
        .filter_map(|s| s["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Массаж"]);
}

#[tokio::test]
async fn search_is_bad_gateway_while_cms_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, json) = get_json(test_app(test_state(&server)), "/api/v1/search?q=x").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "cms_unavailable");
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let server = MockServer::start().await;
    let (status, json) = get_json(test_app(test_state(&server)), "/api/v1/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn slugs_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (status, json) = get_json(test_app(test_state(&server)), "/api/v1/services/slugs").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "cms_unavailable");
    assert_eq!(
        json["error"]["message"],
        "Не удалось загрузить услуг (Статус: 503)"
    );
}

#[tokio::test]
async fn slugs_are_listed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uslugas"))
        .and(query_param("fields[0]", "slug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "slug": "piling" }, { "id": 2, "slug": "massazh" }]
        })))
        .mount(&server)
        .await;

    let (status, json) = get_json(test_app(test_state(&server)), "/api/v1/services/slugs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!(["piling", "massazh"]));
}

#[tokio::test]
async fn rate_limit_rejects_excess_requests() {
    let server = MockServer::start().await;
    mount_services(&server, many_services(1)).await;

    let app = build_app(test_state(&server), RateLimitState::per_minute(1));
    let (first, _) = get_json(app.clone(), "/api/v1/pages/services").await;
    let (second, json) = get_json(app, "/api/v1/pages/services").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"]["code"], "rate_limited");
}
