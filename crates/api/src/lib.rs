pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Classroom routes
    let classroom_routes = Router::new()
        .route("/", post(routes::classroom::create))
        .route("/university/{university_id}", get(routes::classroom::list_by_university))
        .route(
            "/university/{university_id}/admin/{account_id}",
            get(routes::classroom::list_by_admin),
        )
        .route("/{classroom_id}", get(routes::classroom::get))
        .route("/{classroom_id}", put(routes::classroom::update))
        .route("/{classroom_id}/provision", post(routes::classroom::provision))
        .route("/{classroom_id}/end", post(routes::classroom::end))
        .route("/{classroom_id}/member", post(routes::classroom::add_members))
        .route("/{classroom_id}/member", delete(routes::classroom::remove_members))
        .route("/{classroom_id}/participant", get(routes::classroom::participants));

    // Attendance routes
    let attendance_routes = Router::new()
        .route("/", post(routes::attendance::create))
        .route("/mark", post(routes::attendance::mark_batch))
        .route("/classroom/{classroom_id}", get(routes::attendance::list_by_classroom))
        .route(
            "/classroom/{classroom_id}/date/{date}",
            get(routes::attendance::list_by_classroom_and_date),
        )
        .route(
            "/classroom/{classroom_id}/date/{date}/account/{account_id}",
            get(routes::attendance::get_by_triple),
        )
        .route("/{attendance_id}", get(routes::attendance::get))
        .route("/{attendance_id}", put(routes::attendance::update))
        .route("/{attendance_id}/session", post(routes::attendance::append_session));

    Router::new()
        .nest("/api/classroom", classroom_routes)
        .nest("/api/attendance", attendance_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
