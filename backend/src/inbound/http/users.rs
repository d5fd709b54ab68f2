//! Users API handlers.
//!
//! ```text
//! POST /api/v1/users {"username":"alice","email":"alice@x.com","password":"Secret123"}
//! GET /api/v1/users/1
//! PUT /api/v1/users/1/profile {"height":180,"gender":"male"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Error, Profile, ProfileUpdate, Registration, User, UserId, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/users`.
///
/// Unknown fields are rejected outright; the payload schema is strict.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = UserValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: value.username.try_into()?,
            email: value.email.try_into()?,
            password: crate::domain::Password::new(value.password)?,
        })
    }
}

/// Partial profile patch for `PUT /api/v1/users/{id}/profile`.
///
/// Every field is independently optional; `age` is accepted as a JSON
/// number and checked for integrality during validation so the caller gets
/// a field-level error rather than a deserialisation failure.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<f64>,
    pub gender: Option<String>,
}

impl ProfileUpdateRequest {
    fn validate(self) -> Result<ProfileUpdate, Error> {
        ProfileUpdate::from_parts(self.height, self.weight, self.age, self.gender.as_deref())
            .map_err(|errors| {
                Error::invalid_request("profile validation failed")
                    .with_details(json!({ "errors": errors }))
            })
    }
}

/// User representation returned to clients.
///
/// Built from the domain [`User`]; the password hash is stripped by
/// construction and can never appear in a response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().as_i32(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            profile: user.profile().cloned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    let code = match err {
        UserValidationError::EmptyUsername => "empty_username",
        UserValidationError::UsernameTooLong { .. } => "username_too_long",
        UserValidationError::EmptyEmail => "empty_email",
        UserValidationError::EmailTooLong { .. } => "email_too_long",
        UserValidationError::EmptyPassword => "empty_password",
    };
    let field = err.field();
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": code }))
}

/// Register a new user account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_user_validation_error)?;
    let user = state.users.register(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Fetch a user account by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.get(UserId::new(path.into_inner())).await?;
    Ok(web::Json(user.into()))
}

/// Merge a partial profile patch into the user's stored profile.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/profile",
    params(("id" = i32, Path, description = "User identifier")),
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Validation failure", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUserProfile"
)]
#[put("/users/{id}/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let update = payload.into_inner().validate()?;
    let user = state
        .users
        .update_profile(UserId::new(path.into_inner()), update)
        .await?;
    Ok(web::Json(user.into()))
}
