//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::handlers::user_handler::{
    ChangePasswordRequest, CreateUserRequest, CreatedUserResponse, MessageResponse,
    UpdateUserRequest, UserIdResponse,
};
use domain::UserResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::create_user,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
        crate::handlers::user_handler::change_password,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            ChangePasswordRequest,
            CreatedUserResponse,
            UserIdResponse,
            MessageResponse,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Users", description = "User account management"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_user_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/users"));
        assert!(paths.contains_key("/api/users/{id}"));
        assert!(paths.contains_key("/api/users/{id}/change-password"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn test_document_includes_user_projection_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("UserResponse"));
        assert!(schemas.contains_key("ChangePasswordRequest"));
    }
}
