// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler,
        complaint::complaint_handler,
        users::{admin_handler, dashboard_handler},
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let session_routes = Router::new()
        .merge(dashboard_handler())
        .nest("/admin", admin_handler())
        .nest("/complaint", complaint_handler())
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_handler())
        .merge(session_routes)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
