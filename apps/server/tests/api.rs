use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use ratekeeper_core::rates::TriggerOutcome;
use ratekeeper_market_data::OpenExchangeRatesProvider;
use ratekeeper_server::{api::app_router, build_state_with_provider, config::Config, AppState};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    _server: MockServer,
    _dir: TempDir,
}

async fn build_test_app(rates: Value) -> TestApp {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timestamp": 1_714_564_800,
            "base": "USD",
            "rates": rates
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = Config {
        db_path: dir.path().join("currencies.db").to_string_lossy().to_string(),
        ..Config::default()
    };
    let provider = OpenExchangeRatesProvider::with_base_url("test", server.uri());
    let state = build_state_with_provider(&config, Arc::new(provider)).unwrap();
    let router = app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        _server: server,
        _dir: dir,
    }
}

async fn refresh(app: &TestApp) {
    match app.state.refresh_scheduler.trigger() {
        TriggerOutcome::Started(handle) => handle.await.unwrap(),
        TriggerOutcome::Dropped => panic!("no refresh should be running"),
    }
}

async fn send(app: &TestApp, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Method::GET, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn standard_rates() -> Value {
    json!({ "USD": 1.0, "RUB": 90.0, "EUR": 0.9 })
}

#[tokio::test]
async fn root_and_healthz_answer_plain_text() {
    let app = build_test_app(standard_rates()).await;

    let (status, body) = send(&app, Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Hello, I am microservice");

    let (status, body) = send(&app, Method::GET, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn refresh_then_query_end_to_end() {
    let app = build_test_app(standard_rates()).await;
    refresh(&app).await;

    let (status, eur) = get_json(&app, "/currency/latest?currency=eur").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(eur["name"], "EUR");
    assert!((eur["exchange_to_rub"].as_f64().unwrap() - 100.0).abs() < 1e-9);
    assert!(eur["id"].is_i64());
    assert!(eur["update_time"].is_string());

    let (status, all) = get_json(&app, "/currency/all").await;
    assert_eq!(status, StatusCode::OK);
    let rates: Vec<(String, f64)> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|o| {
            (
                o["name"].as_str().unwrap().to_string(),
                o["exchange_to_rub"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(rates.len(), 3);
    assert_eq!(rates[0].0, "EUR");
    assert_eq!(rates[1], ("RUB".to_string(), 1.0));
    assert_eq!(rates[2].0, "USD");
    assert!((rates[2].1 - 90.0).abs() < 1e-9);

    let update_times: Vec<&Value> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|o| &o["update_time"])
        .collect();
    assert!(update_times.iter().all(|t| *t == update_times[0]));
}

#[tokio::test]
async fn history_grows_with_each_refresh() {
    let app = build_test_app(standard_rates()).await;
    refresh(&app).await;
    refresh(&app).await;

    let (status, history) = get_json(&app, "/currency?currency=USD").await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0]["id"].as_i64().unwrap() < history[1]["id"].as_i64().unwrap());

    let (status, latest) = get_json(&app, "/currency/latest?currency=USD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["id"], history[1]["id"]);
}

#[tokio::test]
async fn history_of_unknown_currency_is_empty() {
    let app = build_test_app(standard_rates()).await;
    refresh(&app).await;

    let (status, body) = get_json(&app, "/currency?currency=GBP").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn history_range_before_first_refresh_is_empty() {
    let app = build_test_app(standard_rates()).await;
    refresh(&app).await;

    let (status, body) = get_json(
        &app,
        "/currency?currency=USD&from=2000-01-01T00:00:00Z&to=2000-01-02T00:00:00Z",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn missing_currency_is_bad_request() {
    let app = build_test_app(standard_rates()).await;

    for uri in ["/currency", "/currency?currency=", "/currency/latest"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().contains("currency"));
    }
}

#[tokio::test]
async fn invalid_parameters_are_bad_request() {
    let app = build_test_app(standard_rates()).await;

    for uri in [
        "/currency?currency=U%24D",
        "/currency?currency=USD&from=yesterday",
        "/currency?currency=USD&from=2024-02-01T00:00:00Z&to=2024-01-01T00:00:00Z",
        "/currency/all?at=now",
        "/currency/convert?currency=EUR&amount=ten",
        "/currency/convert?currency=EUR&amount=-5",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], 400);
    }
}

#[tokio::test]
async fn latest_of_unknown_currency_is_not_found() {
    let app = build_test_app(standard_rates()).await;
    refresh(&app).await;

    let (status, body) = get_json(&app, "/currency/latest?currency=GBP").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert!(body["error"].as_str().unwrap().contains("GBP"));
}

#[tokio::test]
async fn latest_as_of_before_any_refresh_is_not_found() {
    let app = build_test_app(standard_rates()).await;
    refresh(&app).await;

    let (status, _) = get_json(&app, "/currency/latest?currency=USD&at=2000-01-01T00:00:00Z").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn convert_divides_reference_amount_by_rate() {
    let app = build_test_app(standard_rates()).await;
    refresh(&app).await;

    let (status, body) = get_json(&app, "/currency/convert?currency=EUR&amount=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "EUR");
    assert_eq!(body["reference_currency"], "RUB");
    assert!((body["amount"].as_f64().unwrap() - 10.0).abs() < 1e-9);
    assert_eq!(body["reference_amount"], 1000.0);
}

#[tokio::test]
async fn convert_overflow_is_bad_request() {
    let app = build_test_app(json!({ "USD": 1.0, "RUB": 90.0, "JPY": 9_000_000.0 })).await;
    refresh(&app).await;

    let (status, body) = get_json(&app, "/currency/convert?currency=JPY&amount=1e308").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, body) = get_json(&app, "/currency/convert?currency=JPY&amount=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["amount"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn source_without_reference_stores_nothing() {
    let app = build_test_app(json!({ "USD": 1.0, "EUR": 0.9 })).await;
    refresh(&app).await;

    let (status, body) = get_json(&app, "/currency/all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn snapshot_before_any_refresh_is_empty() {
    let app = build_test_app(standard_rates()).await;

    let (status, body) = get_json(&app, "/currency/all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let app = build_test_app(standard_rates()).await;

    for (method, uri) in [
        (Method::POST, "/currency?currency=USD"),
        (Method::DELETE, "/currency/latest?currency=USD"),
        (Method::PUT, "/currency/all"),
    ] {
        let (status, _) = send(&app, method, uri).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[tokio::test]
async fn openapi_document_lists_currency_routes() {
    let app = build_test_app(standard_rates()).await;

    let (status, doc) = get_json(&app, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/currency/latest"].is_object());
    assert!(doc["paths"]["/currency/all"].is_object());

    for path in ["/currency", "/currency/latest", "/currency/all", "/currency/convert"] {
        assert!(
            doc["paths"][path]["get"]["responses"]["500"].is_object(),
            "{path} documents no storage failure"
        );
    }
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_test_app(standard_rates()).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
