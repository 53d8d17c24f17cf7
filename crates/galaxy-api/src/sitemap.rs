use axum::Json;

use galaxy_types::api::{RouteInfo, Sitemap};

/// Every route served by [`crate::router`], in registration order.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/users"),
    ("POST", "/users"),
    ("GET", "/users/{user_id}"),
    ("PUT", "/users/{user_id}"),
    ("DELETE", "/users/{user_id}"),
    ("GET", "/users/{user_id}/favorites"),
    ("POST", "/users/{user_id}/favorite/planet/{planet_id}"),
    ("DELETE", "/users/{user_id}/favorite/planet/{planet_id}"),
    ("POST", "/users/{user_id}/favorite/people/{people_id}"),
    ("DELETE", "/users/{user_id}/favorite/people/{people_id}"),
    ("GET", "/people"),
    ("POST", "/people"),
    ("GET", "/people/{people_id}"),
    ("PUT", "/people/{people_id}"),
    ("DELETE", "/people/{people_id}"),
    ("GET", "/planets"),
    ("POST", "/planets"),
    ("GET", "/planets/{planet_id}"),
    ("PUT", "/planets/{planet_id}"),
    ("DELETE", "/planets/{planet_id}"),
];

/// GET / — map of available routes.
pub async fn sitemap() -> Json<Sitemap> {
    Json(Sitemap {
        routes: ROUTES
            .iter()
            .map(|(method, path)| RouteInfo {
                method: method.to_string(),
                path: path.to_string(),
            })
            .collect(),
    })
}
