use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde::Deserialize;
use serde_json::json;

use crate::middlewares::current_user_id;
use crate::models::{ApiResponse, CustomLinkRequest, WithdrawalKeyRequest};
use crate::services::{AffiliateService, CommissionService, NetworkService};
use crate::services::network_service::DEFAULT_MAX_DEPTH;

#[derive(Debug, Deserialize)]
pub struct NetworkQuery {
    pub max_depth: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/affiliate/stats",
    tag = "affiliate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Referral counters, earnings and share links", body = crate::models::AffiliateStatsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_stats(
    affiliate_service: web::Data<AffiliateService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match affiliate_service.get_stats(user_id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/affiliate/progress",
    tag = "affiliate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Level, XP and badges recomputed from the ledger", body = crate::models::AffiliateProgress),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_progress(
    affiliate_service: web::Data<AffiliateService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    let result = async {
        let affiliate = affiliate_service.ensure_profile(user_id).await?;
        affiliate_service.compute_progress(affiliate.id).await
    }
    .await;

    match result {
        Ok(progress) => Ok(HttpResponse::Ok().json(ApiResponse::success(progress))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/affiliate/badges",
    tag = "affiliate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Full badge catalog with earned flags", body = crate::models::BadgeCatalogResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_badges(
    affiliate_service: web::Data<AffiliateService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match affiliate_service.badge_catalog(user_id).await {
        Ok(catalog) => Ok(HttpResponse::Ok().json(ApiResponse::success(catalog))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/affiliate/network",
    tag = "affiliate",
    params(
        ("max_depth" = Option<u32>, Query, description = "Depth bound, default 5, capped at 10")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Referral tree as nodes, edges and stats", body = crate::models::NetworkResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_network(
    affiliate_service: web::Data<AffiliateService>,
    network_service: web::Data<NetworkService>,
    req: HttpRequest,
    query: web::Query<NetworkQuery>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };
    let max_depth = query.max_depth.unwrap_or(DEFAULT_MAX_DEPTH).min(10);

    let result = async {
        let affiliate = affiliate_service.ensure_profile(user_id).await?;
        network_service
            .build_network(&affiliate.affiliate_code, max_depth)
            .await
    }
    .await;

    match result {
        Ok(network) => Ok(HttpResponse::Ok().json(ApiResponse::success(network))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/affiliate/commissions",
    tag = "affiliate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Commission history, newest first"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_commissions(
    affiliate_service: web::Data<AffiliateService>,
    commission_service: web::Data<CommissionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    let result = async {
        let affiliate = affiliate_service.ensure_profile(user_id).await?;
        commission_service.list_for_affiliate(affiliate.id).await
    }
    .await;

    match result {
        Ok(commissions) => Ok(
            HttpResponse::Ok().json(ApiResponse::success(json!({ "commissions": commissions })))
        ),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/affiliate/sharing-links",
    tag = "affiliate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Share links for messaging apps", body = crate::models::SharingLinksResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_sharing_links(
    affiliate_service: web::Data<AffiliateService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match affiliate_service.sharing_links(user_id).await {
        Ok(links) => Ok(HttpResponse::Ok().json(ApiResponse::success(links))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/affiliate/custom-link",
    tag = "affiliate",
    request_body = CustomLinkRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Slug claimed", body = crate::models::CustomLinkResponse),
        (status = 400, description = "Slug has invalid characters"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn set_custom_link(
    affiliate_service: web::Data<AffiliateService>,
    req: HttpRequest,
    request: web::Json<CustomLinkRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match affiliate_service
        .set_custom_slug(user_id, &request.custom_slug)
        .await
    {
        Ok(link) => Ok(HttpResponse::Ok().json(ApiResponse::success(link))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/affiliate/withdrawal-key",
    tag = "affiliate",
    request_body = WithdrawalKeyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "PIX key saved"),
        (status = 400, description = "Empty key")
    )
)]
pub async fn set_withdrawal_key(
    affiliate_service: web::Data<AffiliateService>,
    req: HttpRequest,
    request: web::Json<WithdrawalKeyRequest>,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match affiliate_service
        .set_withdrawal_key(user_id, &request.withdrawal_key)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Withdrawal key saved"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/affiliate/withdraw",
    tag = "affiliate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payout sent", body = crate::models::WithdrawResponse),
        (status = 400, description = "Below minimum or no withdrawal key"),
        (status = 502, description = "Payment provider rejected the cash-out")
    )
)]
pub async fn withdraw(
    affiliate_service: web::Data<AffiliateService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match current_user_id(&req) {
        Ok(id) => id,
        Err(e) => return Ok(e.error_response()),
    };

    match affiliate_service.withdraw(user_id).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn affiliate_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/affiliate")
            .route("/stats", web::get().to(get_stats))
            .route("/progress", web::get().to(get_progress))
            .route("/badges", web::get().to(get_badges))
            .route("/network", web::get().to(get_network))
            .route("/commissions", web::get().to(get_commissions))
            .route("/sharing-links", web::get().to(get_sharing_links))
            .route("/custom-link", web::post().to(set_custom_link))
            .route("/withdrawal-key", web::post().to(set_withdrawal_key))
            .route("/withdraw", web::post().to(withdraw)),
    );
}
