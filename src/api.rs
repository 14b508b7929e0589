use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::{
    auth::{hash_password, validate_credentials},
    database::{self, NewChat},
    shared::{ApiResponse, Chat, ContactList, ContactRequest, Credentials, SendChatRequest},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatHistoryQuery {
    pub u1: String,
    pub u2: String,
    #[serde(rename = "from-ts", default = "lower_bound")]
    pub from_ts: String,
    #[serde(rename = "to-ts", default = "upper_bound")]
    pub to_ts: String,
}

fn lower_bound() -> String {
    "-inf".to_string()
}

fn upper_bound() -> String {
    "+inf".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ContactListQuery {
    pub username: String,
}

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/verify-contact", post(handle_verify_contact))
        .route("/chat-history", get(handle_chat_history))
        .route("/contact-list", get(handle_contact_list))
        .route("/chat", post(handle_send_chat))
        .layer(CorsLayer::permissive())
}

fn store_error(context: &str, e: sqlx::Error) -> StatusCode {
    error!("Database error while {}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<Json<ApiResponse<()>>, StatusCode> {
    info!("Registration request for '{}'", request.username);

    if let Err(reason) = validate_credentials(&request) {
        warn!("Rejected registration for '{}': {}", request.username, reason);
        return Ok(Json(ApiResponse::fail(reason)));
    }

    let exists = database::is_user_exist(&state.database, &request.username)
        .await
        .map_err(|e| store_error("checking user", e))?;
    if exists {
        return Ok(Json(ApiResponse::fail("username already taken")));
    }

    let password_hash = hash_password(&request.password).map_err(|_| {
        error!("Failed to generate password salt");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    database::register_new_user(&state.database, &request.username, &password_hash)
        .await
        .map_err(|e| store_error("registering user", e))?;

    info!("User '{}' registered", request.username);
    Ok(Json(ApiResponse::ok("registered")))
}

pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<Json<ApiResponse<()>>, StatusCode> {
    let authentic =
        database::is_user_authentic(&state.database, &request.username, &request.password)
            .await
            .map_err(|e| store_error("authenticating user", e))?;

    if !authentic {
        warn!("Failed login for '{}'", request.username);
        return Ok(Json(ApiResponse::fail("invalid username or password")));
    }

    info!("User '{}' logged in", request.username);
    Ok(Json(ApiResponse::ok("login success")))
}

pub async fn handle_verify_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<ApiResponse<()>>, StatusCode> {
    let exists = database::is_user_exist(&state.database, &request.username)
        .await
        .map_err(|e| store_error("verifying contact", e))?;

    if !exists {
        return Ok(Json(ApiResponse::fail("invalid username")));
    }

    Ok(Json(ApiResponse::ok("valid username")))
}

pub async fn handle_chat_history(
    State(state): State<AppState>,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<ApiResponse<Vec<Chat>>>, StatusCode> {
    info!(
        "Chat history between '{}' and '{}' ({} .. {})",
        query.u1, query.u2, query.from_ts, query.to_ts
    );

    let chats = database::fetch_chat_between(
        &state.database,
        &query.u1,
        &query.u2,
        &query.from_ts,
        &query.to_ts,
    )
    .await
    .map_err(|e| store_error("fetching chat history", e))?;

    Ok(Json(ApiResponse::list(chats)))
}

pub async fn handle_contact_list(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ApiResponse<Vec<ContactList>>>, StatusCode> {
    let contacts = database::fetch_contact_list(&state.database, &query.username)
        .await
        .map_err(|e| store_error("fetching contact list", e))?;

    Ok(Json(ApiResponse::list(contacts)))
}

pub async fn handle_send_chat(
    State(state): State<AppState>,
    Json(request): Json<SendChatRequest>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    if request.message.trim().is_empty() {
        return Ok(Json(ApiResponse::fail("message is empty")));
    }

    for user in [&request.from, &request.to] {
        let exists = database::is_user_exist(&state.database, user)
            .await
            .map_err(|e| store_error("checking chat participant", e))?;
        if !exists {
            warn!("Chat rejected, unknown user '{}'", user);
            return Ok(Json(ApiResponse::fail("invalid username")));
        }
    }

    let chat = NewChat {
        from: request.from,
        to: request.to,
        message: request.message,
        timestamp: chrono::Utc::now().timestamp(),
    };

    let key = database::create_chat(&state.database, chat)
        .await
        .map_err(|e| store_error("storing chat", e))?;

    Ok(Json(ApiResponse {
        status: true,
        message: None,
        data: Some(key),
        total: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    async fn test_router() -> (TempDir, Router) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let database = database::init_db(temp_dir.path().to_str().unwrap())
            .await
            .expect("Failed to initialize test database");

        let state = AppState { database };

        (temp_dir, create_api_routes().with_state(state))
    }

    async fn post_json(router: &Router, uri: &str, body: Value) -> Value {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn get_json(router: &Router, uri: &str) -> Value {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register(router: &Router, username: &str, password: &str) -> Value {
        post_json(
            router,
            "/register",
            json!({"username": username, "password": password}),
        )
        .await
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (_dir, router) = test_router().await;

        let result = register(&router, "alice", "hunter2").await;
        assert_eq!(result["status"], true);
        assert_eq!(result["message"], "registered");

        let login = post_json(
            &router,
            "/login",
            json!({"username": "alice", "password": "hunter2"}),
        )
        .await;
        assert_eq!(login["status"], true);

        let bad_login = post_json(
            &router,
            "/login",
            json!({"username": "alice", "password": "nope"}),
        )
        .await;
        assert_eq!(bad_login["status"], false);
        assert_eq!(bad_login["message"], "invalid username or password");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (_dir, router) = test_router().await;

        register(&router, "alice", "first").await;
        let again = register(&router, "alice", "second").await;
        assert_eq!(again["status"], false);
        assert_eq!(again["message"], "username already taken");
    }

    #[tokio::test]
    async fn test_shared_password_logs_in_both_users() {
        let (_dir, router) = test_router().await;
        register(&router, "alice", "password1").await;
        register(&router, "bob", "password1").await;

        for user in ["alice", "bob"] {
            let login = post_json(
                &router,
                "/login",
                json!({"username": user, "password": "password1"}),
            )
            .await;
            assert_eq!(login["status"], true, "login failed for {}", user);
        }
    }

    #[tokio::test]
    async fn test_register_rejects_empty_password() {
        let (_dir, router) = test_router().await;

        let result = register(&router, "alice", "").await;
        assert_eq!(result["status"], false);
        assert!(result.get("data").is_none());
    }

    #[tokio::test]
    async fn test_verify_contact() {
        let (_dir, router) = test_router().await;
        register(&router, "bob", "pw").await;

        let known = post_json(&router, "/verify-contact", json!({"username": "bob"})).await;
        assert_eq!(known["status"], true);

        let unknown = post_json(&router, "/verify-contact", json!({"username": "eve"})).await;
        assert_eq!(unknown["status"], false);
        assert_eq!(unknown["message"], "invalid username");
    }

    #[tokio::test]
    async fn test_send_chat_and_read_history() {
        let (_dir, router) = test_router().await;
        register(&router, "alice", "pw").await;
        register(&router, "bob", "pw").await;

        let sent = post_json(
            &router,
            "/chat",
            json!({"from": "alice", "to": "bob", "message": "hello bob"}),
        )
        .await;
        assert_eq!(sent["status"], true);
        assert!(sent["data"].as_str().unwrap().starts_with("chat#"));

        let history = get_json(&router, "/chat-history?u1=bob&u2=alice").await;
        assert_eq!(history["status"], true);
        assert_eq!(history["total"], 1);
        assert_eq!(history["data"][0]["message"], "hello bob");
        assert_eq!(history["data"][0]["from"], "alice");

        let contacts = get_json(&router, "/contact-list?username=bob").await;
        assert_eq!(contacts["total"], 1);
        assert_eq!(contacts["data"][0]["username"], "alice");
    }

    #[tokio::test]
    async fn test_send_chat_to_unknown_user() {
        let (_dir, router) = test_router().await;
        register(&router, "alice", "pw").await;

        let sent = post_json(
            &router,
            "/chat",
            json!({"from": "alice", "to": "ghost", "message": "anyone?"}),
        )
        .await;
        assert_eq!(sent["status"], false);

        let contacts = get_json(&router, "/contact-list?username=alice").await;
        assert_eq!(contacts["total"], 0);
    }

    #[tokio::test]
    async fn test_chat_history_respects_window() {
        let (_dir, router) = test_router().await;
        register(&router, "alice", "pw").await;
        register(&router, "bob", "pw").await;
        post_json(
            &router,
            "/chat",
            json!({"from": "bob", "to": "alice", "message": "now"}),
        )
        .await;

        let old = get_json(&router, "/chat-history?u1=alice&u2=bob&from-ts=0&to-ts=10").await;
        assert_eq!(old["status"], true);
        assert_eq!(old["total"], 0);

        let open = get_json(&router, "/chat-history?u1=alice&u2=bob&from-ts=-inf&to-ts=%2Binf").await;
        assert_eq!(open["total"], 1);
    }

    #[tokio::test]
    async fn test_chat_history_requires_users() {
        let (_dir, router) = test_router().await;

        let request = Request::builder()
            .method(Method::GET)
            .uri("/chat-history?u1=alice")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
