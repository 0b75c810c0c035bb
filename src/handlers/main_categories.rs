use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::MainCategoryInput;
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn create_main_category(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<MainCategoryInput>,
) -> AppResult<HttpResponse> {
    let main = state
        .directory_service
        .create_main_category(&claims, input.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(main),
        "Main category created successfully",
    )))
}

pub async fn list_main_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let mains = state.directory_service.list_main_categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(mains)))
}

pub async fn get_main_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let main = state
        .directory_service
        .get_main_category(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(main)))
}

pub async fn list_all_main_categories(
    claims: Claims,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let mains = state
        .directory_service
        .list_all_main_categories(&claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(mains)))
}

pub async fn get_main_category_admin(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let main = state
        .directory_service
        .get_main_category_admin(&claims, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(main)))
}

pub async fn update_main_category(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<MainCategoryInput>,
) -> AppResult<HttpResponse> {
    let main = state
        .directory_service
        .update_main_category(&claims, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(main),
        "Main category updated successfully",
    )))
}

/// Soft delete.
pub async fn deactivate_main_category(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let main = state
        .directory_service
        .deactivate_main_category(&claims, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(main),
        "Main category deactivated successfully",
    )))
}
