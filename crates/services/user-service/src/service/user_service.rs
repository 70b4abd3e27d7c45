//! User service - account lifecycle use cases.
//!
//! The only place account rule violations are raised. Repository failures
//! of mutations are wrapped per action; their cause stays attached as the
//! error source and is logged, never shown to clients.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, UserAction};
use domain::{DomainError, Password, User, UserResponse};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users as projections, in repository order
    async fn get_users(&self) -> AppResult<Vec<UserResponse>>;

    /// Get a single user projection
    async fn get_user(&self, id: Uuid) -> AppResult<UserResponse>;

    /// Create a user after confirmation and uniqueness checks
    async fn create_user(
        &self,
        name: String,
        email: String,
        password: &str,
        password_confirm: &str,
    ) -> AppResult<()>;

    /// Replace name and email of an existing user
    async fn update_user(&self, id: Uuid, name: String, email: String) -> AppResult<()>;

    /// Permanently delete an existing user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Replace the password after verifying the current one
    async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn require_user(&self, id: Uuid) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::Domain(DomainError::NotFound))
    }
}

/// Translate a failed repository mutation.
///
/// A unique index violation means another request took the email between
/// the pre-check and the write.
fn store_failure(action: UserAction, err: AppError) -> AppError {
    if err.is_conflict() {
        tracing::warn!(%action, "Email taken concurrently");
        return DomainError::EmailAlreadyTaken.into();
    }
    tracing::error!(%action, error = %err, "Repository mutation failed");
    AppError::failed(action, err)
}

/// Hash a plaintext; hasher faults are internal, never a rule violation.
fn hash_password(plain: &str) -> AppResult<String> {
    Password::new(plain)
        .map(Password::into_string)
        .map_err(|e| AppError::internal(e.to_string()))
}

#[async_trait]
impl UserService for UserManager {
    async fn get_users(&self) -> AppResult<Vec<UserResponse>> {
        let users = self.repo.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<UserResponse> {
        self.require_user(id).await.map(UserResponse::from)
    }

    /// The email pre-check is not atomic with the insert (TOCTOU). Two
    /// concurrent requests can both pass it; the unique index on
    /// `users.email` rejects the second insert and that is reported as
    /// `EmailAlreadyTaken` as well.
    async fn create_user(
        &self,
        name: String,
        email: String,
        password: &str,
        password_confirm: &str,
    ) -> AppResult<()> {
        if password != password_confirm {
            tracing::warn!("User creation rejected: password confirmation differs");
            return Err(DomainError::InvalidPassword.into());
        }

        if self.repo.is_email_taken(&email).await? {
            tracing::warn!("User creation rejected: email already taken");
            return Err(DomainError::EmailAlreadyTaken.into());
        }

        let password_hash = hash_password(password)?;

        let user = self
            .repo
            .create(name, email, password_hash)
            .await
            .map_err(|e| store_failure(UserAction::Create, e))?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(())
    }

    async fn update_user(&self, id: Uuid, name: String, email: String) -> AppResult<()> {
        self.require_user(id).await?;

        let updated = self
            .repo
            .update(id, name, email)
            .await
            .map_err(|e| store_failure(UserAction::Update, e))?;

        // Deleted between the existence check and the write
        if !updated {
            return Err(DomainError::NotFound.into());
        }

        tracing::info!(user_id = %id, "User updated");
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.require_user(id).await?;

        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| store_failure(UserAction::Delete, e))?;

        if !deleted {
            return Err(DomainError::NotFound.into());
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// The new password is allowed to equal the old one.
    async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> AppResult<()> {
        if new_password != confirm_password {
            return Err(DomainError::PasswordMismatch.into());
        }

        let user = self.require_user(id).await?;

        if !Password::from_hash(user.password_hash).verify(old_password) {
            tracing::warn!(user_id = %id, "Password change rejected: old password incorrect");
            return Err(DomainError::IncorrectPassword.into());
        }

        let password_hash = hash_password(new_password)?;

        let updated = self
            .repo
            .update_password(id, password_hash)
            .await
            .map_err(|e| store_failure(UserAction::ChangePassword, e))?;

        if !updated {
            return Err(DomainError::NotFound.into());
        }

        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }
}
