//! HTTP surface: router wiring and server startup.

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::AuthConfig;
use crate::store::{PgDirectory, UserDirectory};

pub mod hal;
pub mod handlers;

/// Build the application router over any directory implementation.
pub fn router<D: UserDirectory + 'static>(directory: Arc<D>, config: AuthConfig) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::login::<D>))
        .route("/choikini", get(handlers::all_choikini::<D>))
        .route(
            "/choikini/:user",
            get(handlers::user_choikini::<D>).post(handlers::register_choikini::<D>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(directory))
        .layer(Extension(Arc::new(config)))
}

/// Connect the directory and start serving.
/// # Errors
/// Returns an error if the database or listener cannot be set up.
pub async fn new(port: u16, dsn: String) -> Result<()> {
    let directory = Arc::new(PgDirectory::connect(&dsn).await?);

    let app = router(directory, AuthConfig::default());

    let listener = TcpListener::bind(format!("::0:{port}")).await?;
    info!("Listening on port {port}");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::router;
    use crate::auth::{credential, AuthConfig};
    use crate::auth::policy::AccessLevel;
    use crate::store::{MemoryDirectory, UserRecord};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn seeded_directory() -> Arc<MemoryDirectory> {
        let config = AuthConfig::new();
        let derived = credential::hash(config.hash_algorithm(), "S1").expect("digest");
        let hash =
            credential::encrypt(config.crypto_algorithm(), &derived, "secret").expect("hash");
        let directory = MemoryDirectory::new();
        directory
            .insert_user(UserRecord {
                id: Uuid::new_v4(),
                name: "alice".to_string(),
                password_salt: "S1".to_string(),
                password_hash: hash,
                token: String::new(),
                access: AccessLevel::Usual,
            })
            .await;
        Arc::new(directory)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn index_greets() {
        let app = router(seeded_directory().await, AuthConfig::new());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_without_payload_is_bad_request() {
        let app = router(seeded_directory().await, AuthConfig::new());
        let response = app
            .oneshot(
                Request::post("/login")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_round_trip_returns_hal_token() {
        let app = router(seeded_directory().await, AuthConfig::new());
        let payload = json!({ "name": "alice", "password": "secret" });
        let response = app
            .oneshot(
                Request::post("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["_embedded"]["state"], "OK");
        assert_ne!(body["_embedded"]["response"]["token"], "");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let directory = seeded_directory().await;

        let app = router(Arc::clone(&directory), AuthConfig::new());
        let wrong = app
            .oneshot(
                Request::post("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "name": "alice", "password": "wrong" }).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        let app = router(directory, AuthConfig::new());
        let unknown = app
            .oneshot(
                Request::post("/login")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "name": "mallory", "password": "secret" }).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        let wrong = body_json(wrong).await;
        let unknown = body_json(unknown).await;
        assert_eq!(wrong["_embedded"]["stateDetail"], unknown["_embedded"]["stateDetail"]);
    }

    #[tokio::test]
    async fn missing_token_header_is_unauthorized() {
        let app = router(seeded_directory().await, AuthConfig::new());
        let response = app
            .oneshot(
                Request::get("/choikini/alice")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
