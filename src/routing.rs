//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    auth::admin_guard,
    budget::{get_budget_endpoint, set_budget_endpoint},
    endpoints,
    error::ErrorBody,
    rate_limit::rate_limit,
    record::{
        create_record_endpoint, delete_record_endpoint, edit_record_endpoint,
        list_records_endpoint,
    },
    stats::get_stats_endpoint,
    status::get_status,
};

/// Return a router with all the app's routes.
///
/// Admin routes are rate limited per client before the admin secret is
/// checked. CORS is allowed from any origin.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::STATUS, get(get_status));

    let protected_routes = Router::new()
        .route(
            endpoints::RECORDS,
            get(list_records_endpoint).post(create_record_endpoint),
        )
        .route(
            endpoints::RECORD,
            put(edit_record_endpoint).delete(delete_record_endpoint),
        )
        .route(endpoints::STATS, get(get_stats_endpoint))
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint).post(set_budget_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_guard))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_owned(),
        }),
    )
        .into_response()
}
