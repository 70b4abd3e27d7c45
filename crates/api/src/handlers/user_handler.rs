//! User handlers.

use std::borrow::Cow;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use common::{AppError, AppResult};
use domain::{
    DomainError, UserResponse, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_NAME_LENGTH,
    MIN_PASSWORD_LENGTH, PASSWORD_CHANGED_MESSAGE,
};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Dotted host name ending in an alphabetic TLD
static EMAIL_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
        .expect("email domain pattern compiles")
});

fn rejected(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}

/// Lengths are counted in UTF-16 code units.
fn utf16_len_within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.encode_utf16().count())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if utf16_len_within(name, MIN_NAME_LENGTH, MAX_NAME_LENGTH) {
        return Ok(());
    }
    Err(rejected(
        "length",
        format!(
            "Name must be between {} and {} characters",
            MIN_NAME_LENGTH, MAX_NAME_LENGTH
        ),
    ))
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if utf16_len_within(password, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH) {
        return Ok(());
    }
    Err(rejected(
        "length",
        format!(
            "Password must be between {} and {} characters",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        ),
    ))
}

fn validate_password_confirmation(password: &str) -> Result<(), ValidationError> {
    validate_password(password).map_err(|_| {
        rejected(
            "length",
            format!(
                "Password confirmation must be between {} and {} characters",
                MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
            ),
        )
    })
}

/// Single-label hosts such as `localhost` are refused.
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    match email.rsplit_once('@') {
        Some((_, domain)) if EMAIL_DOMAIN.is_match(domain) => Ok(()),
        _ => Err(rejected("email", "Invalid email address".to_string())),
    }
}

/// User creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Display name
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Ann")]
    pub name: String,
    /// Unique email address
    #[validate(
        email(message = "Invalid email address"),
        custom(function = "validate_email_domain")
    )]
    #[schema(example = "ann@x.io")]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "secret1")]
    pub password: String,
    /// Must repeat `password`
    #[validate(custom(function = "validate_password_confirmation"))]
    #[schema(example = "secret1")]
    pub password_confirm: String,
}

/// User update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Annie")]
    pub name: String,
    #[validate(
        email(message = "Invalid email address"),
        custom(function = "validate_email_domain")
    )]
    #[schema(example = "annie@x.io")]
    pub email: String,
}

/// Password change request (camelCase on the wire)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(custom(function = "validate_password"))]
    pub new_password: String,
    #[validate(custom(function = "validate_password_confirmation"))]
    pub confirm_password: String,
}

/// Body returned after a successful creation
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedUserResponse {
    pub name: String,
    pub email: String,
}

/// Id of the user a mutation applied to
#[derive(Debug, Serialize, ToSchema)]
pub struct UserIdResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/change-password", patch(change_password))
}

/// An id that does not parse cannot name a stored user.
fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::from(DomainError::NotFound))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "List of all users", body = Vec<UserResponse>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.get_users().await?;
    Ok(Json(users))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = CreatedUserResponse),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Passwords differ, email taken or store failure")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Json<CreatedUserResponse>> {
    let CreateUserRequest {
        name,
        email,
        password,
        password_confirm,
    } = payload;

    state
        .user_service
        .create_user(name.clone(), email.clone(), &password, &password_confirm)
        .await?;

    Ok(Json(CreatedUserResponse { name, email }))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 422, description = "Unknown user")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_user_id(&id)?;
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user))
}

/// Replace name and email
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserIdResponse),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Unknown user, email taken or store failure")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserIdResponse>> {
    let id = parse_user_id(&id)?;

    state
        .user_service
        .update_user(id, payload.name, payload.email)
        .await?;

    Ok(Json(UserIdResponse { id }))
}

/// Permanently delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = UserIdResponse),
        (status = 422, description = "Unknown user or store failure")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserIdResponse>> {
    let id = parse_user_id(&id)?;
    state.user_service.delete_user(id).await?;
    Ok(Json(UserIdResponse { id }))
}

/// Change password after verifying the current one
#[utoipa::path(
    patch,
    path = "/api/users/{id}/change-password",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Unknown user, confirmation mismatch or incorrect password")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_user_id(&id)?;

    state
        .user_service
        .change_password(
            id,
            &payload.old_password,
            &payload.new_password,
            &payload.confirm_password,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: PASSWORD_CHANGED_MESSAGE.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id_rejects_garbage_as_unknown_user() {
        let err = parse_user_id("not-a-uuid").unwrap_err();
        assert_eq!(err.domain(), Some(&DomainError::NotFound));
    }

    #[test]
    fn test_change_password_request_uses_camel_case() {
        let body = r#"{"oldPassword":"secret1","newPassword":"secret2","confirmPassword":"secret2"}"#;
        let req: ChangePasswordRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.old_password, "secret1");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_short_password() {
        let req = CreateUserRequest {
            name: "Ann".into(),
            email: "ann@x.io".into(),
            password: "abc".into(),
            password_confirm: "abc".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_email_requires_dotted_domain() {
        for email in ["ann@localhost", "a@b", "ann@x.", "ann@-x.io"] {
            let req = UpdateUserRequest {
                name: "Ann".into(),
                email: email.into(),
            };
            assert!(req.validate().is_err(), "accepted {}", email);
        }

        for email in ["ann@x.io", "ann.b@mail.example.co.uk"] {
            let req = UpdateUserRequest {
                name: "Ann".into(),
                email: email.into(),
            };
            assert!(req.validate().is_ok(), "rejected {}", email);
        }
    }

    #[test]
    fn test_lengths_count_utf16_units() {
        // each emoji is two UTF-16 units
        let too_long = "\u{1F600}".repeat(17);
        assert!(validate_password(&too_long).is_err());
        assert!(validate_password(&"\u{1F600}".repeat(16)).is_ok());
        assert!(validate_password(&"\u{1F600}".repeat(3)).is_ok());

        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn test_length_messages_name_the_bounds() {
        let err = validate_password_confirmation("abc").unwrap_err();
        assert_eq!(
            err.message.as_deref(),
            Some("Password confirmation must be between 6 and 32 characters")
        );
    }

    #[test]
    fn test_update_request_rejects_bad_email() {
        let req = UpdateUserRequest {
            name: "Ann".into(),
            email: "not-an-email".into(),
        };
        assert!(req.validate().is_err());
    }
}
