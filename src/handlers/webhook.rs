use actix_web::{HttpResponse, Result, web};
use serde_json::json;

use crate::models::PixWebhookPayload;
use crate::services::SubscriptionService;

#[utoipa::path(
    post,
    path = "/webhook/pix",
    tag = "webhook",
    request_body = PixWebhookPayload,
    responses(
        (status = 200, description = "Acknowledged")
    )
)]
pub async fn pix_webhook(
    subscription_service: web::Data<SubscriptionService>,
    payload: web::Json<PixWebhookPayload>,
) -> Result<HttpResponse> {
    // Always acknowledge so the provider stops retrying; failures are logged
    // and the payment stays pending for the next delivery.
    if let Err(e) = subscription_service
        .handle_webhook(payload.into_inner())
        .await
    {
        log::error!("PIX webhook processing failed: {e}");
    }

    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhook").route("/pix", web::post().to(pix_webhook)));
}
