use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::http::StatusCode;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    repositories::users::UserRepository,
    value_objects::users::{LoggedInModel, LoginModel, RegisterUserModel, RegisteredModel},
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

pub struct AuthUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
}

impl<U> AuthUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }

    /// Creates the user together with their personal team. The two inserts
    /// run in one transaction inside the repository.
    pub async fn register(&self, register_user_model: RegisterUserModel) -> AuthResult<RegisteredModel> {
        let email = register_user_model.email.clone();

        let existing = self
            .user_repository
            .find_by_email(email.clone())
            .await
            .map_err(|err| {
                error!(%email, db_error = ?err, "auth: failed to look up email");
                AuthError::Internal(err)
            })?;
        if existing.is_some() {
            warn!(%email, "auth: registration with taken email");
            return Err(AuthError::EmailTaken);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(register_user_model.password.as_bytes(), &salt)
            .map_err(|err| anyhow!("failed to hash password: {}", err))?
            .to_string();

        let (user_id, team_id) = self
            .user_repository
            .register_with_personal_team(register_user_model.to_entity(password_hash))
            .await
            .map_err(|err| {
                error!(%email, db_error = ?err, "auth: failed to register user");
                AuthError::Internal(err)
            })?;

        info!(%user_id, %team_id, "auth: user registered with personal team");
        Ok(RegisteredModel { team_id })
    }

    pub async fn login(&self, login_model: LoginModel) -> AuthResult<LoggedInModel> {
        let user = self
            .user_repository
            .find_by_email(login_model.email.clone())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "auth: failed to look up user for login");
                AuthError::Internal(err)
            })?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|err| anyhow!("stored password hash is malformed: {}", err))?;
        Argon2::default()
            .verify_password(login_model.password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        info!(user_id = %user.id, "auth: login succeeded");
        Ok(LoggedInModel { user_id: user.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::users::UserEntity, repositories::users::MockUserRepository,
    };
    use chrono::Utc;

    fn register_model(email: &str) -> RegisterUserModel {
        RegisterUserModel {
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
            name: "Mali".to_string(),
            locale: "en".to_string(),
            timezone: Some("Asia/Bangkok".to_string()),
        }
    }

    fn user_with_password(password: &str) -> UserEntity {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();

        UserEntity {
            id: 5,
            email: "mali@example.com".to_string(),
            name: "Mali".to_string(),
            password_hash,
            email_verified: true,
            is_admin: false,
            locale: "en".to_string(),
            timezone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn register_creates_user_and_personal_team() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_email()
            .returning(|_| Ok(None));
        user_repository
            .expect_register_with_personal_team()
            .withf(|entity| {
                entity.email == "mali@example.com"
                    && !entity.is_admin
                    && entity.password_hash != "hunter2hunter2"
            })
            .returning(|_| Ok((5, 9)));

        let registered = AuthUseCase::new(Arc::new(user_repository))
            .register(register_model("mali@example.com"))
            .await
            .unwrap();
        assert_eq!(registered.team_id, 9);
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_email()
            .returning(|_| Ok(Some(user_with_password("hunter2hunter2"))));

        let result = AuthUseCase::new(Arc::new(user_repository))
            .register(register_model("mali@example.com"))
            .await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn login_verifies_the_stored_hash() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_email()
            .returning(|_| Ok(Some(user_with_password("hunter2hunter2"))));

        let logged_in = AuthUseCase::new(Arc::new(user_repository))
            .login(LoginModel {
                email: "mali@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.user_id, 5);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_email()
            .returning(|_| Ok(Some(user_with_password("hunter2hunter2"))));

        let result = AuthUseCase::new(Arc::new(user_repository))
            .login(LoginModel {
                email: "mali@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_email()
            .returning(|_| Ok(None));

        let result = AuthUseCase::new(Arc::new(user_repository))
            .login(LoginModel {
                email: "ghost@example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
