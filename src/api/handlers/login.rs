use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

use super::failure_response;
use crate::api::hal::Hal;
use crate::auth::{self, AuthConfig};
use crate::store::UserDirectory;

#[derive(Deserialize)]
pub struct LoginRequest {
    name: String,
    password: String,
}

// axum handler for login; the only endpoint taking a password
pub async fn login<D: UserDirectory + 'static>(
    Extension(directory): Extension<Arc<D>>,
    Extension(config): Extension<Arc<AuthConfig>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(Hal::ng("/login", "missing payload")),
        )
            .into_response();
    };

    let password = SecretString::from(request.password);
    match auth::login(directory.as_ref(), &config, &request.name, &password).await {
        Ok(view) => (
            StatusCode::OK,
            Json(Hal::ok("/login", json!({ "token": view.token }))),
        )
            .into_response(),
        Err(err) => failure_response("/login", &err),
    }
}
