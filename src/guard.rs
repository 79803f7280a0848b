use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{AppState, auth::AuthUser};

/// access_guard
///
/// Middleware wrapped around the whole router, fallback included. It resolves
/// the caller's identity, asks the `AccessPolicy` for a decision and either
/// lets the request through or answers with a `307` redirect before any
/// handler (or the 404 fallback) runs.
///
/// Identity resolution failures (no token, bad token, unknown profile or
/// role) are treated as "no identity". The resolved `AuthUser` is stored in
/// the request extensions so handlers extracting `AuthUser` reuse it.
pub async fn access_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let path = parts.uri.path().to_owned();

    let identity = if state.policy.needs_identity(&path) {
        AuthUser::from_request_parts(&mut parts, &state).await.ok()
    } else {
        None
    };
    let role = identity.as_ref().map(|user| user.role);

    let decision = state.policy.decide(&path, role);
    tracing::debug!(path = %path, role = ?role, decision = ?decision, "access decision");

    if let Some(target) = decision.redirect_target() {
        return Redirect::temporary(target).into_response();
    }

    if let Some(user) = identity {
        parts.extensions.insert(user);
    }
    next.run(Request::from_parts(parts, body)).await
}
