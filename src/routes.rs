use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::handlers;
use crate::middleware::require_principal;
use crate::state::AppState;

/// Full route table. Collection paths answer with and without the trailing slash.
pub fn app(state: AppState) -> Router {
    let config = config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .merge(property_routes(state.clone()))
        .merge(ctrl_voc_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(CorsLayer::permissive());

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn property_routes(state: AppState) -> Router<AppState> {
    use handlers::properties;

    let public = Router::new()
        .route("/properties", get(properties::list))
        .route("/properties/", get(properties::list))
        .route("/properties/id/:id", get(properties::show));

    let protected = Router::new()
        .route("/properties", post(properties::create))
        .route("/properties/", post(properties::create))
        .route(
            "/properties/id/:id",
            put(properties::update).delete(properties::remove),
        )
        .route_layer(middleware::from_fn_with_state(state, require_principal));

    public.merge(protected)
}

fn ctrl_voc_routes(state: AppState) -> Router<AppState> {
    use handlers::ctrl_voc;

    let public = Router::new()
        .route("/ctrl_voc", get(ctrl_voc::list))
        .route("/ctrl_voc/", get(ctrl_voc::list))
        .route("/ctrl_voc/id/:id", get(ctrl_voc::show));

    let protected = Router::new()
        .route("/ctrl_voc", post(ctrl_voc::create))
        .route("/ctrl_voc/", post(ctrl_voc::create))
        .route(
            "/ctrl_voc/id/:id",
            put(ctrl_voc::update).delete(ctrl_voc::remove),
        )
        .route_layer(middleware::from_fn_with_state(state, require_principal));

    public.merge(protected)
}
