use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode, header};

use axum_test::TestServer;

use music_clicker::{
    app::AppState,
    auth::{Authenticator, HeaderAuth, TokenAuth, header::X_USERNAME},
    config::Config,
    earnings::now_ms,
    routes,
    store::UserStore,
};

use music_clicker_model::{
    Item, ItemKind, User, item::RARITY_TIERS, response::LoginResponse, user::Equipped,
};

use serde_json::json;

use tempfile::TempDir;

struct TestApp {
    server: TestServer,
    store: UserStore,
    // dropped last so the data dir outlives the server
    _data_dir: TempDir,
}

async fn setup_with(auth: Authenticator) -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let store = UserStore::open_dir(data_dir.path()).await.unwrap();

    let state = AppState {
        store: store.clone(),
        auth,
        config: Arc::new(Config::default()),
    };

    TestApp {
        server: TestServer::new(routes::router(state)).unwrap(),
        store,
        _data_dir: data_dir,
    }
}

async fn setup() -> TestApp {
    setup_with(Authenticator::new(HeaderAuth)).await
}

fn username(name: &'static str) -> (HeaderName, HeaderValue) {
    (X_USERNAME, HeaderValue::from_static(name))
}

async fn fetch_state(app: &TestApp, name: &'static str) -> User {
    let (key, value) = username(name);
    let response = app.server.get("/api/state").add_header(key, value).await;
    response.assert_status_ok();
    response.json::<User>()
}

#[tokio::test]
async fn test_login_and_play() {
    let app = setup().await;

    // login
    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "username": "alice" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<LoginResponse>();
    assert!(body.ok);
    assert!(body.token.is_none());

    // fresh state
    let user = fetch_state(&app, "alice").await;
    assert_eq!(user.username, "alice");
    assert_eq!(user.money, 0.0);
    assert!(user.inventory.singles.is_empty());
    assert!(user.inventory.albums.is_empty());
    assert_eq!(user.equipped, Equipped::default());

    // click
    let (key, value) = username("alice");
    let response = app.server.post("/api/click").add_header(key, value).await;
    response.assert_status_ok();
    let item = response.json::<Item>();
    assert!(RARITY_TIERS.contains(&item.rarity));

    let user = fetch_state(&app, "alice").await;
    assert_eq!(user.inventory.get(item.kind), &vec![item.clone()]);
    assert_eq!(
        user.inventory.singles.len() + user.inventory.albums.len(),
        1
    );

    // too poor for a pack
    let (key, value) = username("alice");
    let response = app
        .server
        .post("/api/buyPack")
        .add_header(key, value)
        .json(&json!({ "genre": "Rock" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.header(header::CONTENT_TYPE), "text/plain; charset=utf-8");
    assert_eq!(response.text(), "not enough money");

    let user = fetch_state(&app, "alice").await;
    assert_eq!(user.money, 0.0);
    assert_eq!(
        user.inventory.singles.len() + user.inventory.albums.len(),
        1
    );

    // exactly enough for a pack
    let mut user = app.store.get("alice").await.unwrap().unwrap();
    user.money = 1_000.0;
    user.last_update = now_ms();
    app.store.save(&user).await.unwrap();

    let (key, value) = username("alice");
    let response = app
        .server
        .post("/api/buyPack")
        .add_header(key, value)
        .json(&json!({ "genre": "Rock" }))
        .await;
    response.assert_status_ok();
    let items = response.json::<Vec<Item>>();
    assert_eq!(items.len(), 5);
    assert!(items.iter().all(|item| item.genre == "Rock"));

    let user = fetch_state(&app, "alice").await;
    assert_eq!(user.money, 0.0);
    assert_eq!(
        user.inventory.singles.len() + user.inventory.albums.len(),
        6
    );
    for item in &items {
        assert!(user.inventory.get(item.kind).contains(item));
    }
}

#[tokio::test]
async fn test_login_requires_username() {
    let app = setup().await;

    let response = app.server.post("/api/login").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "username": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app.server.post("/api/login").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_long_username() {
    let app = setup().await;
    let name = "x".repeat(200);

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "username": name }))
        .await;
    response.assert_status_ok();

    let value = HeaderValue::from_str(&name).unwrap();
    let response = app.server.post("/api/click").add_header(X_USERNAME, value).await;
    response.assert_status_ok();

    let user = app.store.get(&name).await.unwrap().unwrap();
    assert_eq!(user.username, name);
    assert_eq!(
        user.inventory.singles.len() + user.inventory.albums.len(),
        1
    );
}

#[tokio::test]
async fn test_login_accepts_forms() {
    let app = setup().await;

    let response = app
        .server
        .post("/api/login")
        .form(&[("username", "bob")])
        .await;
    response.assert_status_ok();

    assert!(app.store.get("bob").await.unwrap().is_some());
}

#[tokio::test]
async fn test_missing_identity() {
    let app = setup().await;

    app.server
        .get("/api/state")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .post("/api/click")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .post("/api/buyPack")
        .json(&json!({ "genre": "Rock" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/equip")
        .json(&json!({ "type": "single", "itemId": "00000000-0000-0000-0000-000000000000" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.header(header::CONTENT_TYPE), "text/plain; charset=utf-8");
    assert_eq!(response.text(), "no username");
}

#[tokio::test]
async fn test_equip_toggle() {
    let app = setup().await;

    let (key, value) = username("carol");
    let item = app
        .server
        .post("/api/click")
        .add_header(key, value)
        .await
        .json::<Item>();

    let body = json!({ "type": item.kind, "itemId": item.id });

    let (key, value) = username("carol");
    let response = app
        .server
        .post("/api/equip")
        .add_header(key, value)
        .json(&body)
        .await;
    response.assert_status_ok();
    let equipped = response.json::<Equipped>();
    assert_eq!(equipped.get(item.kind), &vec![item.rarity]);

    let (key, value) = username("carol");
    let equipped = app
        .server
        .post("/api/equip")
        .add_header(key, value)
        .json(&body)
        .await
        .json::<Equipped>();
    assert_eq!(equipped, Equipped::default());
}

#[tokio::test]
async fn test_equip_unknown_kind() {
    let app = setup().await;

    let (key, value) = username("dave");
    let response = app
        .server
        .post("/api/equip")
        .add_header(key, value)
        .json(&json!({ "type": "ep", "itemId": "00000000-0000-0000-0000-000000000000" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offline_earnings() {
    let app = setup().await;

    let mut user = User::new("erin", now_ms() - 5_000);
    user.equipped.singles = vec![10];
    user.equipped.albums = vec![20];
    app.store.save(&user).await.unwrap();

    let user = fetch_state(&app, "erin").await;

    // 3/s for at least 5 seconds
    assert!(user.money >= 15.0);
    assert_eq!(user.money % 3.0, 0.0);
}

#[tokio::test]
async fn test_packs() {
    let app = setup().await;

    let response = app.server.get("/api/packs").await;
    response.assert_status_ok();

    assert_eq!(
        response.json::<Vec<String>>(),
        vec!["Rock", "Pop", "Jazz", "HipHop", "Electronic"]
    );
}

#[tokio::test]
async fn test_token_auth() {
    let app = setup_with(Authenticator::new(TokenAuth::new("hunter2"))).await;

    let response = app
        .server
        .post("/api/login")
        .json(&json!({ "username": "frank" }))
        .await;
    response.assert_status_ok();
    let token = response.json::<LoginResponse>().token.unwrap();

    // a bare username is not enough anymore
    let (key, value) = username("frank");
    app.server
        .get("/api/state")
        .add_header(key, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();
    let response = app
        .server
        .post("/api/click")
        .add_header(header::AUTHORIZATION, bearer)
        .await;
    response.assert_status_ok();

    let user = app.store.get("frank").await.unwrap().unwrap();
    assert_eq!(
        user.inventory.singles.len() + user.inventory.albums.len(),
        1
    );
    assert!(matches!(
        response.json::<Item>().kind,
        ItemKind::Single | ItemKind::Album
    ));
}
