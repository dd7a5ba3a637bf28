//! Restricts a route group to loopback peers.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ApiErrorResponse;

/// Admits only requests whose TCP peer is a loopback address.
///
/// The peer comes from `ConnectInfo`; headers such as `Host` or
/// `X-Forwarded-For` are ignored. Requests without connection info are
/// refused.
pub async fn local_only(request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    match peer {
        Some(addr) if addr.ip().to_canonical().is_loopback() => next.run(request).await,
        _ => {
            warn!(
                peer = ?peer,
                path = %request.uri().path(),
                "Rejected non-local admin request"
            );
            (
                StatusCode::FORBIDDEN,
                Json(ApiErrorResponse {
                    error: "FORBIDDEN".to_string(),
                    message: "Admin endpoints only accessible from localhost".to_string(),
                }),
            )
                .into_response()
        }
    }
}
