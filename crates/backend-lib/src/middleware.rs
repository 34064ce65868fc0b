// crates/backend-lib/src/middleware.rs

//! Route gate middleware.
//!
//! Projects the bearer token into session claims and consults the pure
//! gate decision before any request reaches a handler.

use crate::auth::gate::{self, RouteDecision};
use crate::store::IdentityStore;
use crate::AppState;
use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use saberpro_common::SessionClaims;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// The connection's peer address, when the server was started with connect
/// info. Degrades to `None` instead of rejecting so in-process callers
/// without a real socket still reach the handler.
pub struct ClientAddr(pub Option<SocketAddr>);

impl<S: Send + Sync> FromRequestParts<S> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self(peer))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Gate every request on (claims, path). Allowed requests carry their
/// claims in the request extensions for downstream handlers.
pub async fn route_gate<S: IdentityStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims: Option<SessionClaims> = match bearer_token(request.headers()) {
        Some(token) => state.sessions.project(token).await,
        None => None,
    };

    match gate::decide(claims.as_ref(), request.uri().path()) {
        RouteDecision::Allow => {
            if let Some(claims) = claims {
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        },
        RouteDecision::RedirectToLogin => Redirect::temporary(gate::LOGIN_PAGE).into_response(),
        RouteDecision::Forbidden => {
            let body = serde_json::json!({
                "error": {
                    "code": "AUTHZ_001",
                    "message": "You do not have access to this page",
                }
            });
            (StatusCode::FORBIDDEN, axum::Json(body)).into_response()
        },
    }
}
