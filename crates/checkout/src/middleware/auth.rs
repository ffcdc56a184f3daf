//! Authentication extractor.
//!
//! The checkout endpoint consumes the identity the login flow stored in the
//! session; an absent identity is an authentication failure the handler maps
//! to 401, not an empty success.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentUser, keys};

/// Extractor yielding the session identity, if any.
///
/// Never rejects; the handler decides what an anonymous caller means.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
///     match user {
///         Some(user) => format!("Hello, {}!", user.email),
///         None => "Hello, stranger!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // The session is in extensions when the SessionManagerLayer is
        // installed; without it every caller is anonymous.
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        let user: Option<CurrentUser> = session.get(keys::CURRENT_USER).await.ok().flatten();

        Ok(Self(user))
    }
}

/// Store the authenticated identity in the session.
///
/// Called by the identity provider's login flow after a successful
/// authentication.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}
