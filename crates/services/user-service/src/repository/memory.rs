//! In-memory user repository for tests and local experiments.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::User;

use super::UserRepository;
use crate::infra::HealthCheck;

/// In-memory implementation of UserRepository.
///
/// Keeps insertion order and rejects duplicate emails the way the unique
/// index does.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Stored record including the hash, for assertions
    pub async fn snapshot(&self, id: Uuid) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.snapshot(id).await)
    }

    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == email) {
            return Err(AppError::conflict("Email"));
        }

        let user = User::new(Uuid::new_v4(), name, email, password_hash);
        users.push(user.clone());

        tracing::debug!(user_id = %user.id, "Stored user in memory");
        Ok(user)
    }

    async fn update(&self, id: Uuid, name: String, email: String) -> AppResult<bool> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.id != id && u.email == email) {
            return Err(AppError::conflict("Email"));
        }

        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.update_profile(name, email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<bool> {
        let mut users = self.users.write().await;

        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.update_password_hash(password_hash);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn is_email_taken(&self, email: &str) -> AppResult<bool> {
        Ok(self.users.read().await.iter().any(|u| u.email == email))
    }
}

#[async_trait]
impl HealthCheck for InMemoryUserStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
