// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router and auth handlers.
use crate::auth::provider::{
    ActivationProvider, CredentialProvider, EmailProvider, StudentIdProvider,
};
use crate::error::AppError;
use crate::middleware::{bearer_token, route_gate, ClientAddr};
use crate::store::IdentityStore;
use crate::validation;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use saberpro_common::{AuthResponse, SessionClaims, StudentCheck};
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router
pub fn create_router<S: IdentityStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register::<S>))
        .route("/api/auth/login", post(login::<S>))
        .route("/api/auth/student/login", post(student_login::<S>))
        .route("/api/auth/student/activate", post(activate::<S>))
        .route("/api/auth/check-student", get(check_student::<S>))
        .route("/api/auth/session", get(session::<S>))
        .route("/api/auth/session/refresh", post(refresh_session::<S>))
        .route("/api/auth/logout", post(logout::<S>))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            route_gate::<S>,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Client key for the auth lockout. A reverse proxy's `x-real-ip` header
/// wins when present; otherwise each connection is keyed by its own peer
/// address so one client's failures never lock out another.
fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(ip) = headers.get("x-real-ip").and_then(|h| h.to_str().ok()) {
        return ip.to_string();
    }
    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Run one credential provider with the lockout bookkeeping around it.
async fn authorize_limited<S: IdentityStore>(
    state: &AppState<S>,
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    provider: &dyn CredentialProvider,
    raw: Value,
) -> Result<AuthResponse, AppError> {
    counter!("auth.attempts").increment(1);

    let client = client_key(headers, peer);
    if !state.rate_limiter.check(&client) {
        counter!("auth.rate_limited").increment(1);
        return Err(AppError::AuthRateLimited);
    }

    match provider.authorize(raw).await {
        Ok(claims) => {
            counter!("auth.success").increment(1);
            state.rate_limiter.record_success(&client);
            let token = state.sessions.issue(claims.clone()).await;
            Ok(AuthResponse { token, claims })
        },
        Err(err) => {
            // Only credential failures count toward the lockout.
            if matches!(err, AppError::Auth) {
                counter!("auth.rejected").increment(1);
                state.rate_limiter.record_failure(&client);
            }
            Err(err)
        },
    }
}

async fn login<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
    Json(raw): Json<Value>,
) -> Result<Json<AuthResponse>, AppError> {
    let provider = EmailProvider::new(state.resolver());
    let response = authorize_limited(&state, &headers, peer, &provider, raw).await?;
    Ok(Json(response))
}

async fn register<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
    Json(mut raw): Json<Value>,
) -> Result<Json<AuthResponse>, AppError> {
    // The route is the registration path regardless of what the payload
    // carried.
    if let Value::Object(map) = &mut raw {
        map.insert("action".to_string(), Value::String("register".to_string()));
    }
    let provider = EmailProvider::new(state.resolver());
    let response = authorize_limited(&state, &headers, peer, &provider, raw).await?;
    Ok(Json(response))
}

async fn student_login<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
    Json(raw): Json<Value>,
) -> Result<Json<AuthResponse>, AppError> {
    let provider = StudentIdProvider::new(state.resolver());
    let response = authorize_limited(&state, &headers, peer, &provider, raw).await?;
    Ok(Json(response))
}

async fn activate<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    ClientAddr(peer): ClientAddr,
    headers: HeaderMap,
    Json(raw): Json<Value>,
) -> Result<Json<AuthResponse>, AppError> {
    let provider = ActivationProvider::new(state.resolver());
    let response = authorize_limited(&state, &headers, peer, &provider, raw).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckStudentParams {
    student_id: String,
}

/// Pre-login student check: reachable with no session so the login page
/// can route a student toward activation before any credentials exist.
async fn check_student<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<CheckStudentParams>,
) -> Result<Json<StudentCheck>, AppError> {
    validation::validate_student_id_format(&params.student_id)?;

    let identity = state.store.find_by_student_id(&params.student_id).await?;
    let check = match identity.as_ref().and_then(|i| i.student.as_ref()) {
        Some(profile) => StudentCheck {
            exists: true,
            is_activated: profile.is_activated,
        },
        None => StudentCheck {
            exists: false,
            is_activated: false,
        },
    };
    Ok(Json(check))
}

/// Project the bearer token into the session object.
async fn session<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<SessionClaims>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Auth)?;
    let claims = state.sessions.project(token).await.ok_or(AppError::Auth)?;
    Ok(Json(claims))
}

/// Trusted update trigger: re-read role and onboarding state from the
/// store and merge them into the live session.
async fn refresh_session<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<SessionClaims>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Auth)?;
    let current = state.sessions.project(token).await.ok_or(AppError::Auth)?;

    let fresh = state.resolver().refresh_claims(&current).await?;
    if !state.sessions.update(token, fresh.clone()).await {
        return Err(AppError::Auth);
    }
    Ok(Json(fresh))
}

async fn logout<S: IdentityStore>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.revoke(token).await;
    }
    Ok(StatusCode::NO_CONTENT)
}
