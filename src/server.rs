//! HTTP lookup endpoint.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::error::{BotError, Result};
use crate::membership::{lookup_by_id, resolve_username};
use crate::telegram::TelegramApi;
use crate::types::{ChatRef, Membership, MembershipStatus};

#[derive(Clone)]
pub struct AppState {
    api: Arc<dyn TelegramApi>,
    default_group: ChatRef,
}

impl AppState {
    pub fn new(api: Arc<dyn TelegramApi>, default_group: ChatRef) -> Self {
        Self { api, default_group }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    user_id: Option<String>,
    username: Option<String>,
    group_id: Option<String>,
}

/// Who the caller asked about
enum Target<'a> {
    UserId(&'a str),
    Username(&'a str),
}

/// Blank query values count as absent
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl VerifyQuery {
    fn target(&self) -> Option<Target<'_>> {
        present(self.user_id.as_deref())
            .map(Target::UserId)
            .or_else(|| present(self.username.as_deref()).map(Target::Username))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Found {
    exists: bool,
    user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    status: MembershipStatus,
}

impl From<Membership> for Found {
    fn from(membership: Membership) -> Self {
        Found {
            exists: true,
            user_id: membership.identity.user_id,
            username: membership.identity.username,
            status: membership.status,
        }
    }
}

#[derive(Debug, Serialize)]
struct NotFound {
    exists: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/api/verify", get(verify))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the HTTP API on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn liveness() -> &'static str {
    "Telegram bot is running!"
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(NotFound { exists: false })).into_response()
}

async fn verify(
    State(state): State<AppState>,
    query: std::result::Result<Query<VerifyQuery>, QueryRejection>,
) -> Response {
    // Malformed query strings are answered like any other failed lookup
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!("Unreadable verification query: {}", rejection.body_text());
            return not_found();
        }
    };

    let Some(target) = query.target() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Provide userId or username",
            }),
        )
            .into_response();
    };

    match lookup(&state, &query, target).await {
        Ok(membership) => {
            debug!(
                "Resolved user {} with status {}",
                membership.identity.user_id, membership.status
            );
            (StatusCode::OK, Json(Found::from(membership))).into_response()
        }
        Err(e) => {
            warn!("Verification lookup failed ({}): {}", e.kind(), e);
            not_found()
        }
    }
}

async fn lookup(state: &AppState, query: &VerifyQuery, target: Target<'_>) -> Result<Membership> {
    let group = match present(query.group_id.as_deref()) {
        Some(group) => group.parse::<ChatRef>()?,
        None => state.default_group.clone(),
    };

    match target {
        Target::UserId(raw) => {
            let user_id = raw
                .parse::<u64>()
                .map_err(|_| BotError::NotFound(format!("invalid userId {raw:?}")))?;
            lookup_by_id(state.api.as_ref(), &group, user_id).await
        }
        Target::Username(username) => {
            resolve_username(state.api.as_ref(), &group, username).await
        }
    }
}
