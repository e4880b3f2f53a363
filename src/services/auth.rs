//! Authentication service: password hashing and login sessions

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Duration;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::session::{Flash, Session},
    models::user::User,
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored argon2 hash
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn session_ttl(&self) -> Duration {
        Duration::hours(self.config.session_ttl_hours as i64)
    }

    /// Open a session bound to a user id
    pub async fn start_session(&self, user_id: i64) -> AppResult<Session> {
        self.repository
            .sessions
            .create(Some(user_id), self.session_ttl())
            .await
    }

    /// Open an anonymous session. Used so a flash message set on a public
    /// flow (register, failed login) survives the redirect that follows.
    pub async fn anonymous_session(&self) -> AppResult<Session> {
        self.repository.sessions.create(None, self.session_ttl()).await
    }

    /// Close a session. Unknown tokens are a no-op.
    pub async fn end_session(&self, token: &str) -> AppResult<()> {
        self.repository.sessions.delete(token).await
    }

    /// Resolve the session token to its live session row, if any
    pub async fn session(&self, token: &str) -> AppResult<Option<Session>> {
        self.repository.sessions.get(token).await
    }

    /// Resolve the session token to the signed-in user. The user row is
    /// fetched by primary key on every call; nothing is cached.
    pub async fn current_user(&self, token: &str) -> AppResult<Option<User>> {
        let session = match self.repository.sessions.get(token).await? {
            Some(s) => s,
            None => return Ok(None),
        };

        match session.user_id {
            Some(user_id) => self.repository.users.find_by_id(user_id).await,
            None => Ok(None),
        }
    }

    /// Attach a one-shot flash message to the session
    pub async fn set_flash(&self, token: &str, flash: Flash) -> AppResult<()> {
        self.repository.sessions.set_flash(token, &flash).await
    }

    /// Read and clear the pending flash message
    pub async fn take_flash(&self, token: &str) -> AppResult<Option<Flash>> {
        self.repository.sessions.take_flash(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::models::session::FlashKind;
    use crate::repository::test_repository;

    async fn service() -> AuthService {
        AuthService::new(test_repository().await, AuthConfig::default())
    }

    #[tokio::test]
    async fn password_roundtrip() {
        let auth = service().await;
        let hash = auth.hash_password("correct horse").unwrap();

        assert_ne!(hash, "correct horse");
        assert!(auth.verify_password("correct horse", &hash).unwrap());
        assert!(!auth.verify_password("battery staple", &hash).unwrap());
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let auth = service().await;
        let user = auth
            .repository
            .users
            .create("Ada", "ada@example.org", &auth.hash_password("pw").unwrap())
            .await
            .unwrap();

        let session = auth.start_session(user.id).await.unwrap();
        let resolved = auth.current_user(&session.token).await.unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(user.id));

        auth.end_session(&session.token).await.unwrap();
        assert!(auth.current_user(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_nobody() {
        let auth = service().await;
        assert!(auth.current_user("no-such-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn anonymous_session_has_no_user() {
        let auth = service().await;
        let session = auth.anonymous_session().await.unwrap();
        assert!(auth.current_user(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_behaves_like_missing() {
        let auth = AuthService::new(
            test_repository().await,
            AuthConfig {
                session_ttl_hours: 0,
            },
        );
        let user = auth
            .repository
            .users
            .create("Ada", "ada@example.org", &auth.hash_password("pw").unwrap())
            .await
            .unwrap();

        let session = auth.start_session(user.id).await.unwrap();
        assert!(auth.current_user(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn flash_is_one_shot() {
        let auth = service().await;
        let session = auth.anonymous_session().await.unwrap();

        auth.set_flash(&session.token, Flash::error("Invalid email or password"))
            .await
            .unwrap();

        let flash = auth.take_flash(&session.token).await.unwrap().unwrap();
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(flash.message, "Invalid email or password");

        assert!(auth.take_flash(&session.token).await.unwrap().is_none());
    }
}
