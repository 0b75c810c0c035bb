use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{LeaveQuery, LeaveRequestInput, LeaveStatusInput, OnLeaveQuery};
use crate::error::AppResult;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

/// Apply for leave, either a date range or a weekly pattern
pub async fn apply_leave(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<LeaveRequestInput>,
) -> AppResult<HttpResponse> {
    let leave = state
        .leave_service
        .apply(&claims, input.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        Some(leave),
        "Leave applied successfully",
    )))
}

pub async fn get_leaves(
    _claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<LeaveQuery>,
) -> AppResult<HttpResponse> {
    let leaves = state.leave_service.list(query.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leaves)))
}

pub async fn get_leave(
    _claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let leave = state.leave_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(leave)))
}

pub async fn check_on_leave(
    _claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<OnLeaveQuery>,
) -> AppResult<HttpResponse> {
    let check = state
        .leave_service
        .is_on_leave(path.into_inner(), query.date.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(check)))
}

pub async fn update_leave_status(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    input: web::Json<LeaveStatusInput>,
) -> AppResult<HttpResponse> {
    let leave = state
        .leave_service
        .update_status(&claims, path.into_inner(), input.status)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(leave),
        "Leave status updated",
    )))
}

/// Cancel a leave; responds with the removed record
pub async fn cancel_leave(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let leave = state
        .leave_service
        .cancel(&claims, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(leave),
        "Leave cancelled successfully",
    )))
}
