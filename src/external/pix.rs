use crate::config::PixConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct CashInRequest {
    value: i64,
    webhook_url: String,
    external_reference: String,
    description: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub struct CashInResponse {
    pub id: String,
    #[serde(default)]
    pub init_point: Option<String>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
struct CashOutRequest {
    value: i64,
    pix_key: String,
    description: String,
    external_reference: String,
}

#[derive(Debug, Deserialize)]
pub struct CashOutResponse {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Thin client for the PIX payment provider. Amounts are cents throughout.
#[derive(Clone)]
pub struct PixService {
    client: Client,
    config: PixConfig,
}

impl PixService {
    pub fn new(config: PixConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Creates a charge the subscriber pays; the provider calls webhook_url
    /// on settlement.
    pub async fn create_cash_in(
        &self,
        value: i64,
        webhook_url: &str,
        description: &str,
    ) -> AppResult<CashInResponse> {
        let url = format!("{}/api/pix/cashIn", self.config.base_url);
        let request = CashInRequest {
            value,
            webhook_url: webhook_url.to_string(),
            external_reference: format!("FLUX_{}", Uuid::new_v4().simple()),
            description: description.to_string(),
            expires_in: 3600,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApiError(format!(
                "PIX cash-in failed: {status} - {body}"
            )));
        }

        Ok(response.json::<CashInResponse>().await?)
    }

    /// Pays out accumulated commissions to an affiliate's PIX key.
    pub async fn create_cash_out(
        &self,
        value: i64,
        pix_key: &str,
        description: &str,
    ) -> AppResult<CashOutResponse> {
        let url = format!("{}/api/pix/cashOut", self.config.base_url);
        let request = CashOutRequest {
            value,
            pix_key: pix_key.to_string(),
            description: description.to_string(),
            external_reference: format!("WITHDRAW_{}", Uuid::new_v4().simple()),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApiError(format!(
                "PIX cash-out failed: {status} - {body}"
            )));
        }

        Ok(response.json::<CashOutResponse>().await?)
    }
}
