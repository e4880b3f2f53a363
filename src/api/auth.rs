//! Account endpoints: registration, login, logout

use axum::{
    extract::State,
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::session::Flash,
    models::user::{LoginForm, RegisterForm},
    AppState,
};

use super::{flash_carrier, session_cookie, CurrentUser, SESSION_COOKIE};

/// View model for the register and login forms
#[derive(Serialize, ToSchema)]
pub struct AuthView {
    /// Pending one-shot notification, cleared by this request
    pub flash: Option<Flash>,
}

async fn pending_flash(state: &AppState, jar: &CookieJar) -> AppResult<Option<Flash>> {
    match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.services.auth.take_flash(cookie.value()).await,
        None => Ok(None),
    }
}

/// Show the registration form
#[utoipa::path(
    get,
    path = "/register",
    tag = "accounts",
    responses(
        (status = 200, description = "Registration form view", body = AuthView)
    )
)]
pub async fn register_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<AuthView>> {
    let flash = pending_flash(&state, &jar).await?;
    Ok(Json(AuthView { flash }))
}

/// Create an account, then send the browser to the login form either way:
/// with a success flash, or with the duplicate-email flash.
#[utoipa::path(
    post,
    path = "/register",
    tag = "accounts",
    request_body = RegisterForm,
    responses(
        (status = 303, description = "Redirect to /login")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<(CookieJar, Redirect)> {
    let (jar, token) = flash_carrier(&state, jar).await?;

    match state.services.accounts.register(form).await {
        Ok(user) => {
            tracing::info!("Registered account {}", user.id);
            state
                .services
                .auth
                .set_flash(
                    &token,
                    Flash::success("Registration successful! You can now log in."),
                )
                .await?;
        }
        Err(AppError::DuplicateEmail) => {
            state
                .services
                .auth
                .set_flash(&token, Flash::error("Email already registered. Please log in."))
                .await?;
        }
        Err(e) => return Err(e),
    }

    Ok((jar, Redirect::to("/login")))
}

/// Show the login form
#[utoipa::path(
    get,
    path = "/login",
    tag = "accounts",
    responses(
        (status = 200, description = "Login form view", body = AuthView)
    )
)]
pub async fn login_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<AuthView>> {
    let flash = pending_flash(&state, &jar).await?;
    Ok(Json(AuthView { flash }))
}

/// Check credentials and open a session. The single "Invalid email or
/// password" flash covers both unknown email and wrong password.
#[utoipa::path(
    post,
    path = "/login",
    tag = "accounts",
    request_body = LoginForm,
    responses(
        (status = 303, description = "Redirect to /books on success, /login on failure")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<(CookieJar, Redirect)> {
    match state.services.accounts.authenticate(&form).await {
        Ok(user) => {
            // Rotate: whatever session the cookie pointed at is gone now.
            if let Some(old) = jar.get(SESSION_COOKIE) {
                state.services.auth.end_session(old.value()).await?;
            }

            let session = state.services.auth.start_session(user.id).await?;
            state
                .services
                .auth
                .set_flash(&session.token, Flash::success("Login successful!"))
                .await?;

            tracing::info!("User {} signed in", user.id);
            Ok((jar.add(session_cookie(&session.token)), Redirect::to("/books")))
        }
        Err(AppError::InvalidCredentials) => {
            let (jar, token) = flash_carrier(&state, jar).await?;
            state
                .services
                .auth
                .set_flash(&token, Flash::error("Invalid email or password"))
                .await?;
            Ok((jar, Redirect::to("/login")))
        }
        Err(e) => Err(e),
    }
}

/// Close the session and send the browser back to the login form
#[utoipa::path(
    get,
    path = "/logout",
    tag = "accounts",
    responses(
        (status = 303, description = "Redirect to /login")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    state.services.auth.end_session(&current.token).await?;

    // The goodbye flash needs a session to live on, so hand the browser a
    // fresh anonymous one.
    let session = state.services.auth.anonymous_session().await?;
    state
        .services
        .auth
        .set_flash(&session.token, Flash::info("Logged out successfully."))
        .await?;

    Ok((jar.add(session_cookie(&session.token)), Redirect::to("/login")))
}
