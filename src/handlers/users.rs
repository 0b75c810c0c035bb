use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{
    AdminUpdateUserInput, BlockUserInput, TatkalInput, TatkalQuery, UpdateProfileInput,
};
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn list_users(claims: Claims, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.directory_service.list_users(&claims).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

pub async fn set_user_blocked(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<BlockUserInput>,
) -> AppResult<HttpResponse> {
    let user = state
        .directory_service
        .set_user_blocked(&claims, path.into_inner(), input.is_blocked)
        .await?;

    let message = if user.is_blocked {
        "User blocked"
    } else {
        "User unblocked"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(user),
        message,
    )))
}

pub async fn update_my_profile(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<UpdateProfileInput>,
) -> AppResult<HttpResponse> {
    let user = state
        .auth_service
        .update_profile(&claims, input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(user),
        "Profile updated successfully",
    )))
}

pub async fn set_my_tatkal_status(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<TatkalInput>,
) -> AppResult<HttpResponse> {
    let user = state
        .auth_service
        .set_tatkal_status(&claims, input.into_inner())
        .await?;

    let message = if user.tatkal_enabled {
        "Tatkal enabled"
    } else {
        "Tatkal disabled"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(user),
        message,
    )))
}

pub async fn list_tatkal_users(
    state: web::Data<AppState>,
    query: web::Query<TatkalQuery>,
) -> AppResult<HttpResponse> {
    let users = state
        .directory_service
        .list_tatkal_providers(query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

pub async fn update_user(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<AdminUpdateUserInput>,
) -> AppResult<HttpResponse> {
    let user = state
        .auth_service
        .admin_update_user(&claims, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(user),
        "User updated successfully",
    )))
}

pub async fn delete_user(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state
        .directory_service
        .delete_user(&claims, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(user),
        "User deleted successfully",
    )))
}
