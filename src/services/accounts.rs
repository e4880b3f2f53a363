//! User account service: registration and credential checks

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginForm, RegisterForm, User},
    repository::Repository,
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    auth: AuthService,
}

impl AccountsService {
    pub fn new(repository: Repository, auth: AuthService) -> Self {
        Self { repository, auth }
    }

    /// Create an account. The email existence check runs first so the
    /// caller can flash "already registered"; the UNIQUE constraint catches
    /// the race between check and insert with the same outcome.
    pub async fn register(&self, form: RegisterForm) -> AppResult<User> {
        if self.repository.users.email_exists(&form.email).await? {
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.auth.hash_password(&form.password)?;
        self.repository
            .users
            .create(&form.name, &form.email, &password_hash)
            .await
    }

    /// Check credentials. Unknown email and wrong password collapse into
    /// the same error so the response never confirms which one it was.
    pub async fn authenticate(&self, form: &LoginForm) -> AppResult<User> {
        let user = self
            .repository
            .users
            .find_by_email(&form.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.auth.verify_password(&form.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::repository::test_repository;

    fn register_form(name: &str, email: &str, password: &str) -> RegisterForm {
        RegisterForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn service() -> AccountsService {
        let repository = test_repository().await;
        let auth = AuthService::new(repository.clone(), AuthConfig::default());
        AccountsService::new(repository, auth)
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let accounts = service().await;
        let user = accounts
            .register(register_form("Ada", "ada@example.org", "p1"))
            .await
            .unwrap();

        assert_eq!(user.email, "ada@example.org");
        assert_ne!(user.password_hash, "p1");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_a_second_row() {
        let accounts = service().await;
        accounts
            .register(register_form("Ada", "ada@example.org", "p1"))
            .await
            .unwrap();

        let err = accounts
            .register(register_form("Imposter", "ada@example.org", "p2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&accounts.repository.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn duplicate_email_check_ignores_case() {
        let accounts = service().await;
        accounts
            .register(register_form("Ada", "ada@example.org", "p1"))
            .await
            .unwrap();

        let err = accounts
            .register(register_form("Ada", "ADA@Example.org", "p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn authenticate_accepts_the_registered_password() {
        let accounts = service().await;
        accounts
            .register(register_form("Ada", "ada@example.org", "p1"))
            .await
            .unwrap();

        let user = accounts
            .authenticate(&login_form("ada@example.org", "p1"))
            .await
            .unwrap();
        assert_eq!(user.name, "Ada");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let accounts = service().await;
        accounts
            .register(register_form("Ada", "ada@example.org", "p1"))
            .await
            .unwrap();

        let wrong_password = accounts
            .authenticate(&login_form("ada@example.org", "nope"))
            .await
            .unwrap_err();
        let unknown_email = accounts
            .authenticate(&login_form("nobody@example.org", "p1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }
}
