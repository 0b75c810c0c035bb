use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::AvailabilityInput;
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn add_my_availability(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<AvailabilityInput>,
) -> AppResult<HttpResponse> {
    let availability = state
        .availability_service
        .create(&claims, input.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(availability),
        "Availability added successfully",
    )))
}

pub async fn get_my_availability(
    claims: Claims,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let list = state
        .availability_service
        .list(Some(claims.user_id()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

pub async fn get_all_availability(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let list = state.availability_service.list(None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

pub async fn get_user_availability(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let list = state
        .availability_service
        .list(Some(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

pub async fn get_availability(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let availability = state.availability_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(availability)))
}

pub async fn update_availability(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<AvailabilityInput>,
) -> AppResult<HttpResponse> {
    let availability = state
        .availability_service
        .update(&claims, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(availability),
        "Availability updated successfully",
    )))
}

pub async fn delete_availability(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let availability = state
        .availability_service
        .delete(&claims, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(availability),
        "Availability deleted successfully",
    )))
}
