use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{
    drive_record_entity as drive_records, fine_entity as fines,
    maintenance_record_entity as maintenance_records, FineStatus,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateDriveRecordRequest {
    pub date: Option<DateTime<Utc>>,
    /// Hundredths of a kilometer.
    pub km: i64,
    /// Hundredths of an hour.
    pub hours_worked: i64,
    #[serde(default)]
    pub gross: i64,
    #[serde(default)]
    pub uber_earnings: i64,
    #[serde(default)]
    pub tips: i64,
    #[serde(default)]
    pub fuel: i64,
    #[serde(default)]
    pub food: i64,
    #[serde(default)]
    pub insurance: i64,
    #[serde(default)]
    pub other: i64,
    #[serde(default)]
    pub net: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DriveRecordResponse {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub km: i64,
    pub hours_worked: i64,
    pub gross: i64,
    pub uber_earnings: i64,
    pub tips: i64,
    pub fuel: i64,
    pub food: i64,
    pub insurance: i64,
    pub other: i64,
    pub net: i64,
}

impl From<drive_records::Model> for DriveRecordResponse {
    fn from(m: drive_records::Model) -> Self {
        Self {
            id: m.id,
            date: m.date,
            km: m.km,
            hours_worked: m.hours_worked,
            gross: m.gross,
            uber_earnings: m.uber_earnings,
            tips: m.tips,
            fuel: m.fuel,
            food: m.food,
            insurance: m.insurance,
            other: m.other,
            net: m.net,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMaintenanceRequest {
    #[schema(example = "oil_change")]
    pub maintenance_type: String,
    pub cost: i64,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MaintenanceResponse {
    pub id: i64,
    pub maintenance_type: String,
    pub cost: i64,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
}

impl From<maintenance_records::Model> for MaintenanceResponse {
    fn from(m: maintenance_records::Model) -> Self {
        Self {
            id: m.id,
            maintenance_type: m.maintenance_type,
            cost: m.cost,
            notes: m.notes,
            date: m.date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateFineRequest {
    #[schema(example = "speeding")]
    pub fine_type: String,
    pub amount: i64,
    pub location: Option<String>,
    pub status: Option<FineStatus>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FineResponse {
    pub id: i64,
    pub fine_type: String,
    pub amount: i64,
    pub location: Option<String>,
    pub status: FineStatus,
    pub date: DateTime<Utc>,
}

impl From<fines::Model> for FineResponse {
    fn from(m: fines::Model) -> Self {
        Self {
            id: m.id,
            fine_type: m.fine_type,
            amount: m.amount,
            location: m.location,
            status: m.status,
            date: m.date,
        }
    }
}
