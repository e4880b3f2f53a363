//! HTTP handlers for the Shelfdesk routes

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::{AppError, AppResult},
    models::user::User,
    AppState,
};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "shelfdesk_session";

/// Build the session cookie for a freshly issued token. Expiry lives on the
/// server-side session row, so this is a plain browser-session cookie.
pub(crate) fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Extractor for the signed-in user on protected routes.
///
/// The cookie token is resolved against the session store and the user row
/// is loaded by primary key on every request. Requests without a live
/// session are redirected to the login form.
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(AppError::Unauthenticated)?;

        let user = state
            .services
            .auth
            .current_user(&token)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        Ok(CurrentUser { user, token })
    }
}

/// Get-or-create a session so a flash message set on a public flow
/// (register, failed login) survives the redirect that follows. Returns
/// the jar with the cookie set and the token to flash against.
pub(crate) async fn flash_carrier(
    state: &AppState,
    jar: CookieJar,
) -> AppResult<(CookieJar, String)> {
    if let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        if state.services.auth.session(&token).await?.is_some() {
            return Ok((jar, token));
        }
    }

    let session = state.services.auth.anonymous_session().await?;
    let token = session.token.clone();
    Ok((jar.add(session_cookie(&token)), token))
}
