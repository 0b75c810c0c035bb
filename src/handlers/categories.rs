use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::CategoryInput;
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn create_category(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    let category = state
        .directory_service
        .create_category(&claims, input.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(category),
        "Service category created successfully",
    )))
}

pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.directory_service.list_categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(categories)))
}

pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state
        .directory_service
        .get_category(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(category)))
}

pub async fn update_category(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<CategoryInput>,
) -> AppResult<HttpResponse> {
    let category = state
        .directory_service
        .update_category(&claims, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(category),
        "Service category updated successfully",
    )))
}

pub async fn deactivate_category(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state
        .directory_service
        .deactivate_category(&claims, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(category),
        "Service category deactivated",
    )))
}
