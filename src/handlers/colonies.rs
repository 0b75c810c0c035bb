use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::ColonyInput;
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn create_colony(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<ColonyInput>,
) -> AppResult<HttpResponse> {
    let colony = state
        .directory_service
        .create_colony(&claims, input.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(colony),
        "Colony created successfully",
    )))
}

pub async fn list_colonies(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let colonies = state.directory_service.list_colonies().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(colonies)))
}

pub async fn get_colony(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let colony = state.directory_service.get_colony(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(colony)))
}

pub async fn update_colony(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<ColonyInput>,
) -> AppResult<HttpResponse> {
    let colony = state
        .directory_service
        .update_colony(&claims, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(colony),
        "Colony updated successfully",
    )))
}

pub async fn delete_colony(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let colony = state
        .directory_service
        .delete_colony(&claims, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(colony),
        "Colony deleted successfully",
    )))
}
