//! API integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use biblioteca_server::{
    config::{AppConfig, PersistFailurePolicy, StorageBackend},
    create_router,
    repository::{
        storage::{FileStorage, KeyValueStorage, MemoryStorage},
        Repository,
    },
    services::Services,
    AppError, AppResult, AppState,
};

/// Router over the given storage, with the session already hydrated
fn app_with(storage: Arc<dyn KeyValueStorage>) -> Router {
    app_with_policy(storage, PersistFailurePolicy::Keep)
}

fn app_with_policy(storage: Arc<dyn KeyValueStorage>, policy: PersistFailurePolicy) -> Router {
    let mut config = AppConfig::default();
    config.session.backend = StorageBackend::Memory;
    config.session.on_persist_failure = policy;
    config.auth.login_delay_ms = 0;
    config.auth.register_delay_ms = 0;

    let services = Services::new(Repository::new(storage), &config);
    services.auth.initialize();

    create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

fn app() -> Router {
    app_with(Arc::new(MemoryStorage::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    let request = match body {
        Some(body) => request.body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };

    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn navigate(app: &Router, path: &str) -> Value {
    let (status, body) = post(app, "/api/v1/navigate", json!({ "path": path })).await;
    assert_eq!(status, StatusCode::OK);
    body
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    post(
        app,
        "/api/v1/auth/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

fn has_link(screen: &Value, path: &str) -> bool {
    screen["navbar"]["links"]
        .as_array()
        .map(|links| links.iter().any(|l| l["path"] == path))
        .unwrap_or(false)
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = get(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["session_ready"], true);
    assert_eq!(body["session_storage"], "memory");
}

#[tokio::test]
async fn test_empty_store_boots_anonymous() {
    let app = app();

    let (_, session) = get(&app, "/api/v1/session").await;
    assert_eq!(session["is_logged"], false);
    assert_eq!(session["loading"], false);

    let (status, screen) = get(&app, "/api/v1/screen").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(screen["location"], "/");
    assert_eq!(screen["view"]["view"], "catalog");
    assert_eq!(screen["view"]["login_prompt"], true);
    assert!(has_link(&screen, "/login"));

    let screen = navigate(&app, "/curador").await;
    assert_eq!(screen["location"], "/login");
    assert_eq!(screen["view"]["view"], "login");
    assert_eq!(screen["view"]["redirect_to"], "/curador");

    let (status, body) = get(&app, "/api/v1/curator/dashboard").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn test_protected_book_returns_after_login_once() {
    let app = app();

    let screen = navigate(&app, "/book/5").await;
    assert_eq!(screen["location"], "/login");

    let (status, screen) = login(&app, "joao@email.com", "123456").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(screen["location"], "/book/5");
    assert_eq!(screen["view"]["view"], "book_detail");
    assert_eq!(screen["view"]["book"]["title"], "1984");

    let (_, history) = get(&app, "/api/v1/history").await;
    assert_eq!(history, json!(["/", "/book/5"]));

    // Back skips the replaced login entry
    let (_, screen) = post(&app, "/api/v1/back", json!({})).await;
    assert_eq!(screen["location"], "/");

    // The origin is gone: logging in again from /login lands home
    post(&app, "/api/v1/auth/logout", json!({})).await;
    navigate(&app, "/login").await;
    let (_, screen) = login(&app, "joao@email.com", "123456").await;
    assert_eq!(screen["location"], "/");
}

#[tokio::test]
async fn test_reader_is_denied_curator_console() {
    let app = app();
    login(&app, "maria@email.com", "maria123").await;

    let screen = navigate(&app, "/curador").await;
    assert_eq!(screen["location"], "/curador");
    assert_eq!(screen["view"]["view"], "access_denied");
    assert_eq!(screen["view"]["back_to"], "/");
    assert!(!has_link(&screen, "/curador"));
    assert_eq!(screen["navbar"]["greeting"], "Hello, Maria Santos!");

    let (status, _) = get(&app, "/api/v1/curator/loans").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, book) = get(&app, "/api/v1/books/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "O Cortiço");
}

#[tokio::test]
async fn test_persisted_admin_session() {
    let storage = Arc::new(MemoryStorage::with_items([
        ("user", r#"{"id":1,"role":"admin"}"#),
        ("isLogged", "true"),
    ]));
    let app = app_with(storage);

    let (_, session) = get(&app, "/api/v1/session").await;
    assert_eq!(session["is_logged"], true);
    assert_eq!(session["user"]["role"], "admin");

    let screen = navigate(&app, "/curador").await;
    assert!(has_link(&screen, "/curador"));
    assert_eq!(screen["view"]["view"], "curator");
    assert_eq!(screen["view"]["tab"], "dashboard");
    assert_eq!(screen["view"]["dashboard"]["stats"]["total_books"], 3);

    let (status, _) = get(&app, "/api/v1/curator/dashboard").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_persisted_session_is_cleared() {
    let storage = Arc::new(MemoryStorage::with_items([
        ("user", "{not json"),
        ("isLogged", "true"),
    ]));
    let app = app_with(storage.clone());

    let (_, session) = get(&app, "/api/v1/session").await;
    assert_eq!(session["is_logged"], false);
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_admin_login_and_logout() {
    let storage = Arc::new(MemoryStorage::new());
    let app = app_with(storage.clone());
    navigate(&app, "/login").await;

    let (status, screen) = login(&app, "admin@biblioteca.com", "admin123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(screen["location"], "/");
    assert!(has_link(&screen, "/curador"));
    assert_eq!(screen["navbar"]["show_logout"], true);

    let (_, session) = get(&app, "/api/v1/session").await;
    assert_eq!(session["user"]["id"], 1);
    assert_eq!(storage.get_item("isLogged").unwrap().as_deref(), Some("true"));

    let (status, screen) = post(&app, "/api/v1/auth/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(has_link(&screen, "/login"));
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_login_form_errors() {
    let app = app();
    navigate(&app, "/login").await;

    let (status, screen) = login(&app, "admin@biblioteca.com", "not-the-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        screen["view"]["errors"]["general"],
        "Invalid email or password"
    );
    assert_eq!(screen["view"]["email"], "admin@biblioteca.com");

    let (status, screen) = login(&app, "not-an-email", "123").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(screen["view"]["errors"]["email"], "Invalid email");
    assert_eq!(
        screen["view"]["errors"]["password"],
        "Password must be at least 6 characters"
    );

    let (_, screen) = send(&app, Method::DELETE, "/api/v1/auth/errors/email", None).await;
    assert!(screen["view"]["errors"]["email"].is_null());
    assert_eq!(
        screen["view"]["errors"]["password"],
        "Password must be at least 6 characters"
    );
}

#[tokio::test]
async fn test_register_new_reader() {
    let app = app();
    navigate(&app, "/login").await;
    let (_, screen) = post(&app, "/api/v1/auth/mode", json!({ "mode": "register" })).await;
    assert_eq!(screen["view"]["mode"], "register");

    let (status, screen) = post(
        &app,
        "/api/v1/auth/register",
        json!({
            "name": "Ana Souza",
            "email": "joao@email.com",
            "password": "segredo",
            "confirm_password": "segredo"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(screen["view"]["errors"]["email"], "Email already registered");

    let (status, screen) = post(
        &app,
        "/api/v1/auth/register",
        json!({
            "name": "Ana Souza",
            "email": "Ana@Email.com",
            "password": "segredo",
            "confirm_password": "segredo"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(screen["navbar"]["greeting"], "Hello, Ana Souza!");

    let (_, session) = get(&app, "/api/v1/session").await;
    assert_eq!(session["user"]["id"], 4);
    assert_eq!(session["user"]["email"], "ana@email.com");
    assert_eq!(session["user"]["role"], "user");
}

#[tokio::test]
async fn test_catalog_search() {
    let app = app();

    let (status, body) = get(&app, "/api/v1/books?genre=Romance&sort=year").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result_label"], "2 books found");
    assert_eq!(body["books"][0]["title"], "Dom Casmurro");
    assert_eq!(body["stats"]["total_titles"], 6);

    let (_, body) = get(&app, "/api/v1/books?search=orwell").await;
    assert_eq!(body["result_label"], "1 book found");
    assert_eq!(body["books"][0]["link"], "/book/5");

    let (status, _) = get(&app, "/api/v1/books/5").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_book_and_route() {
    let app = app();
    login(&app, "joao@email.com", "123456").await;

    let screen = navigate(&app, "/book/99").await;
    assert_eq!(screen["view"]["view"], "book_not_found");

    let screen = navigate(&app, "/estante").await;
    assert_eq!(screen["view"]["view"], "not_found");

    let (status, _) = get(&app, "/api/v1/books/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_curator_books_and_loans() {
    let app = app();
    login(&app, "admin@biblioteca.com", "admin123").await;

    let (status, body) = post(
        &app,
        "/api/v1/curator/books",
        json!({
            "title": "",
            "author": "Clarice Lispector",
            "genre": "Poesia",
            "total_copies": 1,
            "available_copies": 2
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"]["title"], "Title is required");
    assert_eq!(body["fields"]["genre"], "Unknown genre");
    assert_eq!(
        body["fields"]["available_copies"],
        "Available copies cannot exceed total copies"
    );

    let (status, book) = post(
        &app,
        "/api/v1/curator/books",
        json!({
            "title": "A Hora da Estrela",
            "author": "Clarice Lispector",
            "genre": "Romance",
            "year": 1977,
            "total_copies": 2,
            "available_copies": 2
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["id"], 4);

    let (_, books) = get(&app, "/api/v1/curator/books?search=clarice").await;
    assert_eq!(books.as_array().map(Vec::len), Some(1));

    let (status, _) = send(&app, Method::DELETE, "/api/v1/curator/books/4", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/api/v1/curator/books/4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, row) = post(&app, "/api/v1/curator/loans/1/return", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row["display_status"], "returned");
    assert_eq!(row["can_renew"], false);

    let (_, books) = get(&app, "/api/v1/curator/books?search=orwell").await;
    assert_eq!(books[0]["available_copies"], 1);

    let (status, _) = post(&app, "/api/v1/curator/loans/1/return", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post(&app, "/api/v1/curator/loans/2/renew", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Cannot renew a returned loan");

    let (status, _) = post(&app, "/api/v1/curator/loans/9/renew", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_file_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let app = app_with(Arc::new(FileStorage::open(&path).unwrap()));
    login(&app, "admin@biblioteca.com", "admin123").await;
    drop(app);

    let app = app_with(Arc::new(FileStorage::open(&path).unwrap()));
    let (_, session) = get(&app, "/api/v1/session").await;
    assert_eq!(session["is_logged"], true);
    assert_eq!(session["user"]["name"], "Administrador");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = app();
    let (status, doc) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/auth/login"].is_object());
}

/// Storage that reads and deletes but refuses every write
struct ReadOnlyStorage;

impl KeyValueStorage for ReadOnlyStorage {
    fn get_item(&self, _key: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _value: &str) -> AppResult<()> {
        Err(AppError::Storage("read-only storage".to_string()))
    }

    fn remove_item(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_login_rolled_back_when_storage_refuses() {
    let app = app_with_policy(Arc::new(ReadOnlyStorage), PersistFailurePolicy::Rollback);

    let screen = navigate(&app, "/book/5").await;
    assert_eq!(screen["location"], "/login");

    let (status, screen) = login(&app, "joao@email.com", "123456").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(screen["location"], "/login");
    assert_eq!(screen["view"]["errors"]["general"], "Could not save session");
    assert_eq!(screen["view"]["redirect_to"], "/book/5");
    assert_eq!(screen["navbar"]["show_logout"], false);

    let (_, session) = get(&app, "/api/v1/session").await;
    assert_eq!(session["user"], Value::Null);
}
