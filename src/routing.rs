use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::net::error;
use crate::net::layer;
use crate::state::ArcShared;

mod user;
mod widget;

async fn ping() -> (StatusCode, &'static str) {
    (StatusCode::OK, "pong")
}

async fn not_found() -> error::ApiError {
    error::ApiError::from(error::GeneralKind::NotFound)
}

async fn handle_error(err: tower::BoxError) -> error::Error {
    if err.is::<tower::timeout::error::Elapsed>() {
        error::Error::api(error::GeneralKind::Timeout)
    } else {
        error::Error::new()
            .source(err)
    }
}

pub fn routes(state: &ArcShared) -> Router {
    Router::new()
        .route("/registration", post(user::registration))
        .route("/login", post(user::login))
        .route("/logout", post(user::logout))
        .route("/auth", post(user::auth))
        .route("/me", get(user::me))
        .route("/save_settings", post(widget::save_settings))
        .route("/get_settings", get(widget::get_settings))
        .route("/ping", get(ping))
        .fallback(not_found)
        .layer(ServiceBuilder::new()
            .layer(layer::RIDLayer::new())
            .layer(TraceLayer::new_for_http()
                .make_span_with(layer::make_span_with)
                .on_request(layer::on_request)
                .on_response(layer::on_response)
                .on_failure(layer::on_failure))
            .layer(HandleErrorLayer::new(handle_error))
            .layer(TimeoutLayer::new(Duration::new(90, 0))))
        .with_state(state.clone())
}
