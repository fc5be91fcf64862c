//! Entry endpoints. All of them run under the session guard, so the
//! presented token is spent whether or not the operation succeeds.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use super::{extract_header, failure_response, now_unix, TOKEN_HEADER, USER_HEADER};
use crate::api::hal::Hal;
use crate::auth::{guard, policy, Error};
use crate::store::{ChoikiniEntry, UserDirectory, UserEntries};

#[derive(Deserialize)]
pub struct EntryRequest {
    entry: String,
}

// axum handler registering one entry for the authenticated user
pub async fn register_choikini<D: UserDirectory + 'static>(
    Path(user): Path<String>,
    headers: HeaderMap,
    Extension(directory): Extension<Arc<D>>,
    payload: Option<Json<EntryRequest>>,
) -> Response {
    let self_href = format!("/choikini/{user}");

    let Some(token) = extract_header(&headers, TOKEN_HEADER) else {
        return failure_response(&self_href, &Error::SessionInvalid);
    };
    let Some(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(Hal::ng(&self_href, "missing payload")),
        )
            .into_response();
    };

    let entry = ChoikiniEntry {
        entry_date: now_unix(),
        entry: request.entry,
    };

    let store = Arc::clone(&directory);
    let result = guard::run_authenticated(directory.as_ref(), &user, &token, |session| {
        async move {
            store.append_entry(session.id, &entry).await?;
            Ok(json!({ "isProcessed": true }))
        }
    })
    .await;

    match result {
        Ok(body) => (StatusCode::OK, Json(Hal::ok(&self_href, body))).into_response(),
        Err(err) => failure_response(&self_href, &err),
    }
}

// axum handler returning the authenticated user's own entries
pub async fn user_choikini<D: UserDirectory + 'static>(
    Path(user): Path<String>,
    headers: HeaderMap,
    Extension(directory): Extension<Arc<D>>,
) -> Response {
    let self_href = format!("/choikini/{user}");

    let Some(token) = extract_header(&headers, TOKEN_HEADER) else {
        return failure_response(&self_href, &Error::SessionInvalid);
    };

    let store = Arc::clone(&directory);
    let result = guard::run_authenticated(directory.as_ref(), &user, &token, |session| {
        async move {
            let entries = store.entries_for(session.id).await?;
            Ok(json!({ "user": session.name, "choikiniList": entries }))
        }
    })
    .await;

    match result {
        Ok(body) => (StatusCode::OK, Json(Hal::ok(&self_href, body))).into_response(),
        Err(err) => failure_response(&self_href, &err),
    }
}

// axum handler listing every user's entries; elevated callers only
pub async fn all_choikini<D: UserDirectory + 'static>(
    headers: HeaderMap,
    Extension(directory): Extension<Arc<D>>,
) -> Response {
    let self_href = "/choikini";

    let Some(name) = extract_header(&headers, USER_HEADER) else {
        return failure_response(self_href, &Error::SessionInvalid);
    };
    let Some(token) = extract_header(&headers, TOKEN_HEADER) else {
        return failure_response(self_href, &Error::SessionInvalid);
    };

    let store = Arc::clone(&directory);
    let result = guard::run_authenticated(directory.as_ref(), &name, &token, |session| {
        async move {
            // The session is valid here; only the authorization can fail, and
            // the guard still spends the token on that path.
            if !policy::is_elevated(session.access) {
                return Err(Error::InsufficientPrivilege);
            }

            let mut listing = Vec::new();
            for record in store.list_all().await? {
                let entries = store.entries_for(record.id).await?;
                listing.push(UserEntries {
                    user: record.name,
                    entries,
                });
            }
            Ok(json!({ "choikinis": listing }))
        }
    })
    .await;

    match result {
        Ok(body) => (StatusCode::OK, Json(Hal::ok(self_href, body))).into_response(),
        Err(err) => failure_response(self_href, &err),
    }
}
