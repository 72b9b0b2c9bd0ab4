use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::middlewares::current_user_id;
use crate::models::ApiResponse;
use crate::services::{AuthService, SubscriptionService};

#[utoipa::path(
    post,
    path = "/subscription",
    tag = "subscription",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PIX charge created", body = crate::models::CreateSubscriptionResponse),
        (status = 409, description = "Subscription already active"),
        (status = 502, description = "Payment provider unavailable")
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match subscription_service.create_subscription(user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscription/status",
    tag = "subscription",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paid flag, trial window and access decision", body = crate::models::SubscriptionStatusResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn subscription_status(
    subscription_service: web::Data<SubscriptionService>,
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    let result = async {
        let user = auth_service.get_user(user_id).await?;
        Ok::<_, crate::error::AppError>(subscription_service.status(&user).await)
    }
    .await;

    match result {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscription")
            .route("", web::post().to(create_subscription))
            .route("/status", web::get().to(subscription_status)),
    );
}
