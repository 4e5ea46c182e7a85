//! Caller identity extractor.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use fintrack_core::{FintrackError, UserId};

/// Header carrying the id of the caller, set by the authenticating gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the authenticated caller.
///
/// Authentication happens upstream; this only reads the forwarded user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// The caller's user id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = UserId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError(FintrackError::unauthorized("Missing user identity")))?;

        let user_id = UserId::parse(header.trim())
            .map_err(|_| AppError(FintrackError::unauthorized("Invalid user identity")))?;

        Ok(AuthenticatedUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AuthenticatedUser, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        AuthenticatedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_user_id_header() {
        let user = UserId::new();
        let extracted = extract(Some(&user.to_string())).await.unwrap();
        assert_eq!(extracted.user_id(), user);
    }

    #[tokio::test]
    async fn test_missing_or_bad_header_is_unauthorized() {
        for header in [None, Some("not-a-uuid"), Some("")] {
            match extract(header).await {
                Err(AppError(FintrackError::Unauthorized(_))) => {}
                other => panic!("Expected Unauthorized, got {:?}", other.map(|u| u.0)),
            }
        }
    }
}
