use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::{
    AdminLoginInput, CreateAdminInput, LoginInput, RegisterUserInput,
};
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterUserInput>,
) -> AppResult<HttpResponse> {
    let response = state.auth_service.register_user(input.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(response),
        "User registered successfully",
    )))
}

pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> AppResult<HttpResponse> {
    let response = state.auth_service.login_user(input.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(response),
        "Login successful",
    )))
}

pub async fn me(claims: Claims, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let profile = state.auth_service.me(&claims).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(profile)))
}

/// Open while no admin exists; afterwards requires an admin token.
pub async fn create_admin(
    claims: Option<Claims>,
    state: web::Data<AppState>,
    input: web::Json<CreateAdminInput>,
) -> AppResult<HttpResponse> {
    let admin = state
        .auth_service
        .create_admin(claims.as_ref(), input.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(admin),
        "Admin created successfully",
    )))
}

pub async fn admin_login(
    state: web::Data<AppState>,
    input: web::Json<AdminLoginInput>,
) -> AppResult<HttpResponse> {
    let response = state.auth_service.login_admin(input.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(response),
        "Login successful",
    )))
}

pub async fn list_admins(claims: Claims, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let admins = state.auth_service.list_admins(&claims).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(admins)))
}
