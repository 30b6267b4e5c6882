use std::sync::Arc;

use axum::{routing::get, Router};

use crate::main_lib::AppState;

#[utoipa::path(get, path = "/", responses((status = 200, description = "Greeting", body = String)))]
pub async fn hello() -> &'static str {
    "Hello, I am microservice"
}

#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Health", body = String)))]
pub async fn healthz() -> &'static str {
    "ok"
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(hello))
        .route("/healthz", get(healthz))
}
