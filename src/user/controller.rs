use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::middleware::auth::{TokenService, get_user_id_from_request};
use crate::user::model::{CreateUserRequest, LoginRequest};
use crate::user::service::UserService;
use crate::utils::error::CustomError;

/// Register a new user
/// POST /auth/register
pub async fn register_user(
    user_service: web::Data<UserService>,
    token_service: web::Data<TokenService>,
    user_info: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, CustomError> {
    let user = user_service.create_user(user_info.into_inner()).await?;
    let token = token_service.create_token(&user.id)?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "token": token,
        "user": user.profile()
    })))
}

/// Log in with username and password
/// POST /auth/login
pub async fn login_user(
    user_service: web::Data<UserService>,
    token_service: web::Data<TokenService>,
    login_info: web::Json<LoginRequest>,
) -> Result<HttpResponse, CustomError> {
    let user = user_service
        .authenticate_user(login_info.into_inner())
        .await?;
    let token = token_service.create_token(&user.id)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "token": token,
        "user": user.profile()
    })))
}

/// The authenticated user's profile
/// GET /auth/me
pub async fn current_user(
    req: HttpRequest,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, CustomError> {
    let user_id = get_user_id_from_request(&req)?;
    let user = user_service
        .find_user(&user_id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("User not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "user": user.profile() })))
}
