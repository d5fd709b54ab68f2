//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API. Swagger UI serves the document in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Gender, Profile};
use crate::inbound::http::users::{ProfileUpdateRequest, RegisterRequest, UserResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "What-to-eat backend API",
        description = "User registration and health-profile endpoints backing the what-to-eat client."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        ProfileUpdateRequest,
        UserResponse,
        Profile,
        Gender,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Operations related to users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
