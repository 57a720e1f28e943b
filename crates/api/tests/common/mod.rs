#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tower::ServiceExt;

use viewcat_api::auth::jwt::{generate_access_token, JwtConfig};
use viewcat_api::categorization::CategorizationService;
use viewcat_api::config::ServerConfig;
use viewcat_api::middleware::auth::AuthUser;
use viewcat_api::router::build_app_router;
use viewcat_api::state::AppState;
use viewcat_api::ws::WsManager;
use viewcat_core::board_access::InMemoryBoardAccess;
use viewcat_events::{ChangeEvent, ChangeNotifier, EventBus};

pub const TEAM: &str = "team-1";
pub const BOARD: &str = "board-1";
pub const OWNER: &str = "user-owner";
pub const OTHER: &str = "user-other";
pub const OUTSIDER: &str = "user-outsider";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        event_bus_capacity: 64,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Everything a test needs to drive the service and observe its effects.
///
/// `BOARD` belongs to `TEAM`; `OWNER` and `OTHER` may view it, `OUTSIDER`
/// may not.
pub struct TestContext {
    pub pool: PgPool,
    pub boards: Arc<InMemoryBoardAccess>,
    pub bus: Arc<EventBus>,
    pub events: broadcast::Receiver<ChangeEvent>,
    pub service: CategorizationService,
}

impl TestContext {
    pub fn new(pool: PgPool) -> Self {
        let boards = Arc::new(InMemoryBoardAccess::new());
        boards.add_board(BOARD, TEAM);
        boards.grant_view(OWNER, BOARD);
        boards.grant_view(OTHER, BOARD);

        let bus = Arc::new(EventBus::new(64));
        let events = bus.subscribe();
        let service = CategorizationService::new(
            pool.clone(),
            Arc::clone(&boards) as _,
            ChangeNotifier::new(Arc::clone(&bus)),
        );

        Self {
            pool,
            boards,
            bus,
            events,
            service,
        }
    }

    /// Build the full application router over this context's service.
    pub fn app(&self) -> Router {
        let config = test_config();
        let state = AppState {
            pool: self.pool.clone(),
            config: Arc::new(config.clone()),
            ws_manager: Arc::new(WsManager::new()),
            categories: self.service.clone(),
        };
        build_app_router(state, &config)
    }

    /// Every event published so far, in order.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn user(user_id: &str) -> AuthUser {
    AuthUser::new(user_id)
}

/// A valid Bearer token for `user_id` under the test config.
pub fn token_for(user_id: &str) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user_id)));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(user_id), None).await
}

pub async fn post_as(app: Router, uri: &str, user_id: &str, body: Option<Value>) -> Response<Body> {
    send(app, Method::POST, uri, Some(user_id), body).await
}

pub async fn put_as(app: Router, uri: &str, user_id: &str, body: Option<Value>) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user_id), body).await
}

pub async fn delete_as(app: Router, uri: &str, user_id: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user_id), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
