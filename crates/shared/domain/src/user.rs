//! User domain entity and its client-facing projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a store-assigned id
    pub fn new(id: Uuid, name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace name and email, keeping the id
    pub fn update_profile(&mut self, name: String, email: String) {
        self.name = name;
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Replace the stored password hash
    pub fn update_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// User display name
    pub name: String,
    /// User email address
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            Uuid::new_v4(),
            "Ann".to_string(),
            "ann@x.io".to_string(),
            "$argon2id$v=19$secret".to_string(),
        )
    }

    #[test]
    fn test_projection_omits_password_hash() {
        let user = sample_user();
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["id"], user.id.to_string());
        assert_eq!(object["name"], "Ann");
        assert_eq!(object["email"], "ann@x.io");
    }

    #[test]
    fn test_entity_serialization_skips_hash() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_update_profile_keeps_id() {
        let mut user = sample_user();
        let id = user.id;

        user.update_profile("Bob".to_string(), "bob@x.io".to_string());

        assert_eq!(user.id, id);
        assert_eq!(user.name, "Bob");
        assert_eq!(user.email, "bob@x.io");
        assert!(user.updated_at >= user.created_at);
    }
}
