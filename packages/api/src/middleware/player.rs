use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

pub const USERNAME_HEADER: &str = "x-username";

/// Caller identity taken from the `X-Username` header. There is no
/// authentication; the header is trusted as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub username: String,
}

impl<S> FromRequestParts<S> for Player
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(USERNAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::MissingUsername)?;

        Ok(Player {
            username: username.to_string(),
        })
    }
}
