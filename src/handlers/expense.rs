use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::error::AppError;
use crate::middlewares::current_user_id;
use crate::models::{
    ApiResponse, CreateDriveRecordRequest, CreateFineRequest, CreateMaintenanceRequest,
    PaginationParams,
};
use crate::services::auth_service::has_access;
use crate::services::{AuthService, ExpenseService};
use chrono::Utc;

/// Expense endpoints sit behind the subscription gate: paid users or an
/// active trial only.
async fn require_access(auth_service: &AuthService, user_id: i64) -> Result<(), AppError> {
    let user = auth_service.get_user(user_id).await?;
    if !has_access(&user, Utc::now()) {
        return Err(AppError::Forbidden(
            "Subscription required: trial expired".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/records/drives",
    tag = "records",
    request_body = CreateDriveRecordRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Drive record created", body = crate::models::DriveRecordResponse),
        (status = 403, description = "No active subscription or trial")
    )
)]
pub async fn create_drive_record(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<CreateDriveRecordRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service
        .create_drive_record(user_id, request.into_inner())
        .await
    {
        Ok(record) => Ok(HttpResponse::Created().json(ApiResponse::success(record))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/records/drives",
    tag = "records",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Drive records, newest first"),
        (status = 403, description = "No active subscription or trial")
    )
)]
pub async fn list_drive_records(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service
        .list_drive_records(user_id, &query.into_inner())
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/records/drives/{id}",
    tag = "records",
    params(("id" = i64, Path, description = "Record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Record not found or owned by another user")
    )
)]
pub async fn delete_drive_record(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service
        .delete_drive_record(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Record deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/records/maintenance",
    tag = "records",
    request_body = CreateMaintenanceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Maintenance record created", body = crate::models::MaintenanceResponse),
        (status = 403, description = "No active subscription or trial")
    )
)]
pub async fn create_maintenance(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<CreateMaintenanceRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service
        .create_maintenance(user_id, request.into_inner())
        .await
    {
        Ok(record) => Ok(HttpResponse::Created().json(ApiResponse::success(record))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/records/maintenance",
    tag = "records",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Maintenance records, newest first"),
        (status = 403, description = "No active subscription or trial")
    )
)]
pub async fn list_maintenance(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service
        .list_maintenance(user_id, &query.into_inner())
        .await
    {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/records/maintenance/{id}",
    tag = "records",
    params(("id" = i64, Path, description = "Record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Record not found or owned by another user")
    )
)]
pub async fn delete_maintenance(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service
        .delete_maintenance(user_id, path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Record deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/records/fines",
    tag = "records",
    request_body = CreateFineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Fine recorded", body = crate::models::FineResponse),
        (status = 403, description = "No active subscription or trial")
    )
)]
pub async fn create_fine(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<CreateFineRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service.create_fine(user_id, request.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Created().json(ApiResponse::success(record))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/records/fines",
    tag = "records",
    params(
        ("page" = Option<i64>, Query, description = "Page number, 1-based"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Fines, newest first"),
        (status = 403, description = "No active subscription or trial")
    )
)]
pub async fn list_fines(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service.list_fines(user_id, &query.into_inner()).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/records/fines/{id}",
    tag = "records",
    params(("id" = i64, Path, description = "Record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Record not found or owned by another user")
    )
)]
pub async fn delete_fine(
    expense_service: web::Data<ExpenseService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    if let Err(e) = require_access(&auth_service, user_id).await {
        return Ok(e.error_response());
    }

    match expense_service.delete_fine(user_id, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Fine deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn expense_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/records")
            .route("/drives", web::post().to(create_drive_record))
            .route("/drives", web::get().to(list_drive_records))
            .route("/drives/{id}", web::delete().to(delete_drive_record))
            .route("/maintenance", web::post().to(create_maintenance))
            .route("/maintenance", web::get().to(list_maintenance))
            .route("/maintenance/{id}", web::delete().to(delete_maintenance))
            .route("/fines", web::post().to(create_fine))
            .route("/fines", web::get().to(list_fines))
            .route("/fines/{id}", web::delete().to(delete_fine)),
    );
}
