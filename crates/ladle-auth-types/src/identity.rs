//! Gateway-injected identity header extractors.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "x-ladle-user-id";

/// Caller identity injected by the gateway via `x-ladle-user-id`.
///
/// Returns 401 if the header is absent or cannot be parsed as a UUID.
/// Ownership checks (403) are done by handlers after extraction.
#[derive(Debug, Clone, Copy)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id })
        }
    }
}

/// Anonymous-tolerant variant of [`IdentityHeaders`] for read endpoints.
///
/// An absent header yields `OptionalIdentity(None)`; a header that is
/// present but unparsable is still rejected with 401 rather than being
/// silently downgraded to anonymous.
#[derive(Debug, Clone, Copy)]
pub struct OptionalIdentity(pub Option<Uuid>);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .map(|v| v.to_str().map(str::to_owned));

        async move {
            match header {
                None => Ok(Self(None)),
                Some(value) => {
                    let user_id = value
                        .ok()
                        .and_then(|s| s.parse::<Uuid>().ok())
                        .ok_or(StatusCode::UNAUTHORIZED)?;
                    Ok(Self(Some(user_id)))
                }
            }
        }
    }
}
