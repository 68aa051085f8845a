//! `Authorization: Token <secret>` guard for the config routes

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;
use tracing::info;

pub const TOKEN_SCHEME: &str = "Token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid authorization header")]
    InvalidHeader,
    #[error("Invalid token scheme")]
    InvalidScheme,
    #[error("Missing authorization token")]
    MissingToken,
    #[error("Invalid token.")]
    InvalidToken,
}

impl AuthError {
    pub fn status(self) -> StatusCode {
        match self {
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidHeader | Self::InvalidScheme | Self::InvalidToken => StatusCode::FORBIDDEN,
        }
    }

    fn code(self) -> &'static str {
        match self {
            Self::InvalidHeader => "invalid_authorization_header",
            Self::InvalidScheme => "invalid_token_scheme",
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::new(err.status(), err.code(), err.to_string())
    }
}

/// Checks are ordered: header shape, scheme, presence, value.
///
/// A bare `Token` scheme counts as an empty token. An unset secret matches
/// nothing.
pub fn check_authorization(
    header: Option<&HeaderValue>,
    secret: Option<&str>,
) -> Result<(), AuthError> {
    let header = header.ok_or(AuthError::InvalidHeader)?;
    let value = header
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?
        .trim();

    let (scheme, token) = match value.split_once(' ') {
        Some((scheme, token)) => (scheme, token),
        None => (value, ""),
    };
    if token.contains(' ') {
        return Err(AuthError::InvalidHeader);
    }
    if scheme != TOKEN_SCHEME {
        return Err(AuthError::InvalidScheme);
    }
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    match secret {
        Some(secret) if token == secret => Ok(()),
        _ => Err(AuthError::InvalidToken),
    }
}

pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request.headers().get(AUTHORIZATION);
    if let Err(err) = check_authorization(header, state.config_secret.as_deref()) {
        info!(
            method = %request.method(),
            path = %request.uri().path(),
            "Config access denied: {}",
            err
        );
        return Err(err.into());
    }
    Ok(next.run(request).await)
}
