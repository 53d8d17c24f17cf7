pub mod characters;
pub mod error;
pub mod favorites;
pub mod planets;
pub mod sitemap;
pub mod state;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, AppStateInner};

/// Full HTTP surface. Route paths must stay in sync with `sitemap::ROUTES`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(sitemap::sitemap))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{user_id}/favorites", get(favorites::get_favorites))
        .route(
            "/users/{user_id}/favorite/planet/{planet_id}",
            post(favorites::post_planet_favorite)
                .delete(favorites::delete_planet_favorite),
        )
        .route(
            "/users/{user_id}/favorite/people/{people_id}",
            post(favorites::post_character_favorite)
                .delete(favorites::delete_character_favorite),
        )
        .route(
            "/people",
            get(characters::list_characters).post(characters::create_character),
        )
        .route(
            "/people/{people_id}",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .route("/planets", get(planets::list_planets).post(planets::create_planet))
        .route(
            "/planets/{planet_id}",
            get(planets::get_planet)
                .put(planets::update_planet)
                .delete(planets::delete_planet),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
