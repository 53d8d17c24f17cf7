use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use galaxy_api::sitemap::ROUTES;
use galaxy_api::{AppState, AppStateInner, router};
use galaxy_db::Database;
use galaxy_db::models::{NewCharacter, NewPlanet, NewUser};

fn state() -> AppState {
    AppStateInner::new(Database::open_in_memory().unwrap())
}

fn seed_user(state: &AppState) -> i64 {
    state
        .db
        .create_user(&NewUser {
            email: "luke@rebels.org",
            name: "Luke",
            lastname: "Skywalker",
            password_hash: "hash",
            is_active: true,
            subscription_date: chrono::Utc::now(),
        })
        .unwrap()
        .id
}

fn seed_planets(state: &AppState, count: usize) -> Vec<i64> {
    (0..count)
        .map(|i| {
            state
                .db
                .create_planet(&NewPlanet {
                    name: &format!("Planet {}", i + 1),
                    size: 1000 + i as i32,
                    material: "rock",
                    population: 1_000_000,
                })
                .unwrap()
                .id
        })
        .collect()
}

fn seed_character(state: &AppState, name: &str) -> i64 {
    state
        .db
        .create_character(&NewCharacter {
            name,
            age: 900,
            genre: "male",
            affiliation: "Jedi Order",
        })
        .unwrap()
        .id
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn planet_ids(favorites: &Value) -> Vec<i64> {
    favorites["favorites"]["planets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn favorite_planet_lifecycle() {
    let state = state();
    let user_id = seed_user(&state);
    let planets = seed_planets(&state, 5);
    assert_eq!(user_id, 1);
    assert_eq!(planets[4], 5);
    let app = router(state);

    let (status, body) = send(&app, Method::POST, "/users/1/favorite/planet/5", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"], 1);
    assert_eq!(body["planet_id"], 5);

    let (status, body) = send(&app, Method::GET, "/users/1/favorites", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 1);
    assert_eq!(planet_ids(&body), vec![5]);
    assert_eq!(body["favorites"]["planets"][0]["name"], "Planet 5");
    assert_eq!(body["favorites"]["characters"], json!([]));

    let (status, _) = send(&app, Method::DELETE, "/users/1/favorite/planet/5", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/users/1/favorites", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(planet_ids(&body).is_empty());
}

#[tokio::test]
async fn duplicate_favorite_conflicts() {
    let state = state();
    seed_user(&state);
    seed_planets(&state, 1);
    let app = router(state);

    let (status, _) = send(&app, Method::POST, "/users/1/favorite/planet/1", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/users/1/favorite/planet/1", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already a favorite"));

    let (_, body) = send(&app, Method::GET, "/users/1/favorites", None).await;
    assert_eq!(planet_ids(&body), vec![1]);
}

#[tokio::test]
async fn removing_non_favorite_is_bad_request() {
    let state = state();
    seed_user(&state);
    let yoda = seed_character(&state, "Yoda");
    let app = router(state);

    let uri = format!("/users/1/favorite/people/{}", yoda);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn missing_entities_are_not_found() {
    let state = state();
    seed_user(&state);
    let yoda = seed_character(&state, "Yoda");
    let app = router(state);

    let uri = format!("/users/999999/favorite/people/{}", yoda);
    let (status, body) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User with id 999999 does not exist");

    let (status, body) = send(&app, Method::POST, "/users/1/favorite/planet/999999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Planet with id 999999 does not exist");

    let (status, _) = send(&app, Method::GET, "/users/42/favorites", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn planet_crud() {
    let app = router(state());

    let planet = json!({"name": "Hoth", "size": 7200, "material": "ice", "population": 0});
    let (status, created) = send(&app, Method::POST, "/planets", Some(planet.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::POST, "/planets", Some(planet)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) =
        send(&app, Method::POST, "/planets", Some(json!({"name": "Endor"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Missing required fields"));

    let uri = format!("/planets/{}", id);
    let (status, updated) =
        send(&app, Method::PUT, &uri, Some(json!({"population": 3000}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["population"], 3000);
    assert_eq!(updated["material"], "ice");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = send(&app, Method::GET, "/planets", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"size": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn character_rename_to_taken_name_conflicts() {
    let state = state();
    seed_character(&state, "Han Solo");
    let chewie = seed_character(&state, "Chewbacca");
    let app = router(state);

    let uri = format!("/people/{}", chewie);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"name": "Han Solo"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A character named 'Han Solo' already exists");

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Chewbacca");
}

#[tokio::test]
async fn deleting_character_drops_it_from_favorites() {
    let state = state();
    seed_user(&state);
    let yoda = seed_character(&state, "Yoda");
    let app = router(state);

    let uri = format!("/users/1/favorite/people/{}", yoda);
    let (status, body) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["character_id"], yoda);

    let (status, _) = send(&app, Method::DELETE, &format!("/people/{}", yoda), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/users/1/favorites", None).await;
    assert_eq!(body["favorites"]["characters"], json!([]));
}

#[tokio::test]
async fn users_can_be_created_and_listed() {
    let app = router(state());

    let user = json!({
        "email": "leia@rebels.org",
        "name": "Leia",
        "lastname": "Organa",
        "password": "alderaan4ever"
    });
    let (status, created) = send(&app, Method::POST, "/users", Some(user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "leia@rebels.org");
    assert_eq!(created["is_active"], true);
    assert!(created["subscription_date"].is_string());
    assert!(created.get("password").is_none());

    let (status, _) = send(&app, Method::POST, "/users", Some(user)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::POST, "/users", Some(json!({"email": "x@y.z"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listed) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_body_is_bad_request_json() {
    let app = router(state());

    let (status, body) =
        send(&app, Method::POST, "/planets", Some(json!({"name": "Kamino", "size": "big"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn sitemap_lists_routes() {
    let app = router(state());

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let routes = body["routes"].as_array().unwrap();
    assert!(routes.iter().any(|r| r["method"] == "GET" && r["path"] == "/users/{user_id}/favorites"));
    assert!(routes.iter().any(|r| r["method"] == "DELETE" && r["path"] == "/planets/{planet_id}"));
}

#[tokio::test]
async fn non_integer_path_id_is_json_bad_request() {
    let app = router(state());

    for (method, uri) in [
        (Method::GET, "/users/abc/favorites"),
        (Method::GET, "/planets/abc"),
        (Method::DELETE, "/people/abc"),
        (Method::POST, "/users/1/favorite/planet/abc"),
    ] {
        let response = app
            .clone()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json",
            "{}",
            uri
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn put_back_serialized_planet_ignores_id() {
    let state = state();
    seed_planets(&state, 1);
    let app = router(state);

    let (status, mut planet) = send(&app, Method::GET, "/planets/1", None).await;
    assert_eq!(status, StatusCode::OK);
    planet["size"] = json!(2);

    let (status, updated) = send(&app, Method::PUT, "/planets/1", Some(planet)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["size"], 2);
    assert_eq!(updated["name"], "Planet 1");

    let (status, _) = send(
        &app,
        Method::POST,
        "/people",
        Some(json!({"id": 7, "name": "Rey", "age": 19, "genre": "female", "affiliation": "Resistance"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn user_get_update_delete() {
    let state = state();
    let luke = seed_user(&state);
    let app = router(state);

    let (status, han) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "han@falcon.net", "name": "Han", "lastname": "Solo", "password": "kessel12"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/users/{}", luke);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "luke@rebels.org");

    let (status, body) =
        send(&app, Method::PUT, &uri, Some(json!({"id": luke, "is_active": false}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);
    assert_eq!(body["name"], "Luke");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"email": han["email"]}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A user with email 'han@falcon.net' already exists");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"email": "luke@rebels.org"}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("User with id {} does not exist", luke));
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"name": "Ben"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_user_drops_their_favorites() {
    let state = state();
    let user_id = seed_user(&state);
    seed_planets(&state, 1);
    let yoda = seed_character(&state, "Yoda");
    let app = router(state.clone());

    let (status, _) = send(&app, Method::POST, "/users/1/favorite/planet/1", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/users/1/favorite/people/{}", yoda);
    let (status, _) = send(&app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/users/1/favorites", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let remaining: i64 = state
        .db
        .with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT (SELECT COUNT(*) FROM favorite_planets WHERE user_id = ?1)
                      + (SELECT COUNT(*) FROM favorite_characters WHERE user_id = ?1)",
                [user_id],
                |row| row.get(0),
            )?)
        })
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn every_sitemap_route_is_served() {
    for (method, path) in ROUTES {
        let state = state();
        seed_user(&state);
        seed_planets(&state, 1);
        seed_character(&state, "Yoda");
        let app = router(state);

        let uri = path
            .split('/')
            .map(|segment| if segment.starts_with('{') { "1" } else { segment })
            .collect::<Vec<_>>()
            .join("/");
        let method: Method = method.parse().unwrap();
        let body = matches!(method, Method::POST | Method::PUT).then(|| json!({}));

        let (status, _) = send(&app, method.clone(), &uri, body).await;
        assert_ne!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
    }
}
