use axum::{http::Method, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};

use crate::api::handlers;
use crate::store::traits::ConceptoStore;

pub fn create_router<S: ConceptoStore + 'static>() -> Router<Arc<S>> {
    // Every response carries Access-Control-Allow-Origin: * so the bundled
    // frontend (or any other origin) can talk to the API directly.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Concepto collection
        .route(
            "/api/conceptos",
            get(handlers::list_conceptos::<S>)
                .post(handlers::create_concepto::<S>)
                .delete(handlers::delete_all_conceptos::<S>)
                .options(handlers::preflight),
        )
        // Literal sub-paths must be registered on their own so they are never
        // swallowed by the :id matcher below.
        .route(
            "/api/conceptos/buscar",
            get(handlers::search_conceptos::<S>).options(handlers::preflight),
        )
        .route(
            "/api/conceptos/stats",
            get(handlers::get_stats::<S>).options(handlers::preflight),
        )
        // Single concepto
        .route(
            "/api/conceptos/:id",
            get(handlers::get_concepto::<S>)
                .put(handlers::update_concepto::<S>)
                .delete(handlers::delete_concepto::<S>)
                .options(handlers::preflight),
        )
        // Static frontend
        .route_service("/", ServeFile::new("public/index.html"))
        .nest_service("/public", ServeDir::new("public"))
        // Everything else: JSON 404 (or 200 for stray preflights)
        .fallback(handlers::route_fallback)
        .layer(cors)
}
