use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{CommissionStatus, FineStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::affiliate::get_stats,
        handlers::affiliate::get_progress,
        handlers::affiliate::get_badges,
        handlers::affiliate::get_network,
        handlers::affiliate::get_commissions,
        handlers::affiliate::get_sharing_links,
        handlers::affiliate::set_custom_link,
        handlers::affiliate::set_withdrawal_key,
        handlers::affiliate::withdraw,
        handlers::subscription::create_subscription,
        handlers::subscription::subscription_status,
        handlers::expense::create_drive_record,
        handlers::expense::list_drive_records,
        handlers::expense::delete_drive_record,
        handlers::expense::create_maintenance,
        handlers::expense::list_maintenance,
        handlers::expense::delete_maintenance,
        handlers::expense::create_fine,
        handlers::expense::list_fines,
        handlers::expense::delete_fine,
        handlers::webhook::pix_webhook,
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            handlers::auth::RefreshRequest,
            AuthResponse,
            UserResponse,
            TrialInfo,
            AffiliateProgress,
            AffiliateStatsResponse,
            BadgeInfo,
            BadgeCatalogResponse,
            WithdrawalKeyRequest,
            WithdrawResponse,
            CustomLinkRequest,
            CustomLinkResponse,
            SharingLinksResponse,
            NetworkNode,
            NetworkEdge,
            NetworkStats,
            NetworkResponse,
            CommissionResponse,
            CommissionStatus,
            FineStatus,
            PixWebhookPayload,
            SubscriptionStatusResponse,
            CreateSubscriptionResponse,
            CreateDriveRecordRequest,
            DriveRecordResponse,
            CreateMaintenanceRequest,
            MaintenanceResponse,
            CreateFineRequest,
            FineResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication API"),
        (name = "affiliate", description = "Affiliate program API"),
        (name = "subscription", description = "Subscription and payment API"),
        (name = "records", description = "Driver expense tracking API"),
        (name = "webhook", description = "Payment provider callbacks"),
    ),
    info(
        title = "FluxDrive Backend API",
        version = "1.0.0",
        description = "FluxDrive driver expense tracking and affiliate REST API",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
