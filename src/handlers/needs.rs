use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{MatchingQuery, NeedFilter, NeedInput};
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn create_need(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<NeedInput>,
) -> AppResult<HttpResponse> {
    let need = state
        .need_service
        .create(&claims, input.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(need),
        "Need posted successfully",
    )))
}

pub async fn get_needs(
    state: web::Data<AppState>,
    query: web::Query<NeedFilter>,
) -> AppResult<HttpResponse> {
    let needs = state.need_service.list(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(needs)))
}

pub async fn get_user_needs(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let filter = NeedFilter {
        user_id: Some(path.into_inner()),
        ..Default::default()
    };
    let needs = state.need_service.list(&filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(needs)))
}

pub async fn get_need(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let need = state.need_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(need)))
}

pub async fn delete_need(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let need = state
        .need_service
        .delete(&claims, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(need),
        "Need deleted successfully",
    )))
}

/// Open needs in the colonies where the provider is available
pub async fn get_matching_needs(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<MatchingQuery>,
) -> AppResult<HttpResponse> {
    let result = state
        .need_service
        .matching(&claims, path.into_inner(), query.service_category.as_deref())
        .await?;

    let message = result.message.clone();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(Some(result), &message)))
}
