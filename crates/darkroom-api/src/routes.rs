use axum::{
    Router, middleware,
    routing::{get, post},
};

use darkroom_types::models::{Camera, ChemicalBatch, FilmRoll, FilmStock};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::resources::{self, create, delete, get_one, update};
use crate::{chemical_batches, film_rolls, health};

/// All API routes, nested under `/api`. Layers that depend on deployment
/// (CORS, tracing, static files) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health::health));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/cameras",
            get(resources::list::<Camera>).post(create::<Camera>),
        )
        .route(
            "/cameras/{id}",
            get(get_one::<Camera>)
                .put(update::<Camera>)
                .delete(delete::<Camera>),
        )
        .route(
            "/film-stocks",
            get(resources::list::<FilmStock>).post(create::<FilmStock>),
        )
        .route(
            "/film-stocks/{id}",
            get(get_one::<FilmStock>)
                .put(update::<FilmStock>)
                .delete(delete::<FilmStock>),
        )
        .route(
            "/chemical-batches",
            get(chemical_batches::list).post(create::<ChemicalBatch>),
        )
        .route(
            "/chemical-batches/{id}",
            get(get_one::<ChemicalBatch>)
                .put(update::<ChemicalBatch>)
                .delete(chemical_batches::delete),
        )
        .route("/chemical-batches/{id}/rolls", get(chemical_batches::rolls))
        .route("/chemical-batches/{id}/restore", post(chemical_batches::restore))
        .route(
            "/film-rolls",
            get(film_rolls::list).post(film_rolls::create),
        )
        .route(
            "/film-rolls/{id}",
            get(film_rolls::get_one)
                .put(film_rolls::update)
                .delete(delete::<FilmRoll>),
        )
        // route_layer: unknown paths stay 404 instead of 401
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(state)
}
