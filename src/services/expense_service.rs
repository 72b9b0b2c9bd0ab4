use crate::entities::{
    FineStatus, drive_record_entity as drive_records, fine_entity as fines,
    maintenance_record_entity as maintenance_records,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateDriveRecordRequest, CreateFineRequest, CreateMaintenanceRequest, DriveRecordResponse,
    FineResponse, MaintenanceResponse, PaginatedResponse, PaginationParams,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Per-user expense tracking: drive shifts, maintenance and fines. Every
/// query is scoped to the owning user; a record id from another account reads
/// as not found.
#[derive(Clone)]
pub struct ExpenseService {
    pool: DatabaseConnection,
}

impl ExpenseService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_drive_record(
        &self,
        user_id: i64,
        request: CreateDriveRecordRequest,
    ) -> AppResult<DriveRecordResponse> {
        if request.km < 0 || request.hours_worked < 0 {
            return Err(AppError::ValidationError(
                "km and hours_worked must not be negative".to_string(),
            ));
        }

        let record = drive_records::ActiveModel {
            user_id: Set(user_id),
            date: Set(request.date.unwrap_or_else(Utc::now)),
            km: Set(request.km),
            hours_worked: Set(request.hours_worked),
            gross: Set(request.gross),
            uber_earnings: Set(request.uber_earnings),
            tips: Set(request.tips),
            fuel: Set(request.fuel),
            food: Set(request.food),
            insurance: Set(request.insurance),
            other: Set(request.other),
            net: Set(request.net),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(DriveRecordResponse::from(record))
    }

    pub async fn list_drive_records(
        &self,
        user_id: i64,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<DriveRecordResponse>> {
        let query = drive_records::Entity::find()
            .filter(drive_records::Column::UserId.eq(user_id));

        let total = query.clone().count(&self.pool).await? as i64;
        let rows = query
            .order_by_desc(drive_records::Column::Date)
            .offset(pagination.get_offset() as u64)
            .limit(pagination.get_limit() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(DriveRecordResponse::from).collect(),
            pagination.page.unwrap_or(1),
            pagination.get_limit(),
            total,
        ))
    }

    pub async fn delete_drive_record(&self, user_id: i64, record_id: i64) -> AppResult<()> {
        let record = drive_records::Entity::find_by_id(record_id)
            .filter(drive_records::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Drive record not found".to_string()))?;

        record.delete(&self.pool).await?;
        Ok(())
    }

    pub async fn create_maintenance(
        &self,
        user_id: i64,
        request: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceResponse> {
        if request.maintenance_type.trim().is_empty() {
            return Err(AppError::ValidationError(
                "maintenance_type is required".to_string(),
            ));
        }
        if request.cost < 0 {
            return Err(AppError::ValidationError(
                "cost must not be negative".to_string(),
            ));
        }

        let record = maintenance_records::ActiveModel {
            user_id: Set(user_id),
            maintenance_type: Set(request.maintenance_type.trim().to_string()),
            cost: Set(request.cost),
            notes: Set(request.notes),
            date: Set(request.date.unwrap_or_else(Utc::now)),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(MaintenanceResponse::from(record))
    }

    pub async fn list_maintenance(
        &self,
        user_id: i64,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<MaintenanceResponse>> {
        let query = maintenance_records::Entity::find()
            .filter(maintenance_records::Column::UserId.eq(user_id));

        let total = query.clone().count(&self.pool).await? as i64;
        let rows = query
            .order_by_desc(maintenance_records::Column::Date)
            .offset(pagination.get_offset() as u64)
            .limit(pagination.get_limit() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(MaintenanceResponse::from).collect(),
            pagination.page.unwrap_or(1),
            pagination.get_limit(),
            total,
        ))
    }

    pub async fn delete_maintenance(&self, user_id: i64, record_id: i64) -> AppResult<()> {
        let record = maintenance_records::Entity::find_by_id(record_id)
            .filter(maintenance_records::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance record not found".to_string()))?;

        record.delete(&self.pool).await?;
        Ok(())
    }

    pub async fn create_fine(
        &self,
        user_id: i64,
        request: CreateFineRequest,
    ) -> AppResult<FineResponse> {
        if request.fine_type.trim().is_empty() {
            return Err(AppError::ValidationError("fine_type is required".to_string()));
        }
        if request.amount < 0 {
            return Err(AppError::ValidationError(
                "amount must not be negative".to_string(),
            ));
        }

        let record = fines::ActiveModel {
            user_id: Set(user_id),
            fine_type: Set(request.fine_type.trim().to_string()),
            amount: Set(request.amount),
            location: Set(request.location),
            status: Set(request.status.unwrap_or(FineStatus::Pending)),
            date: Set(request.date.unwrap_or_else(Utc::now)),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(FineResponse::from(record))
    }

    pub async fn list_fines(
        &self,
        user_id: i64,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<FineResponse>> {
        let query = fines::Entity::find().filter(fines::Column::UserId.eq(user_id));

        let total = query.clone().count(&self.pool).await? as i64;
        let rows = query
            .order_by_desc(fines::Column::Date)
            .offset(pagination.get_offset() as u64)
            .limit(pagination.get_limit() as u64)
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            rows.into_iter().map(FineResponse::from).collect(),
            pagination.page.unwrap_or(1),
            pagination.get_limit(),
            total,
        ))
    }

    pub async fn delete_fine(&self, user_id: i64, record_id: i64) -> AppResult<()> {
        let record = fines::Entity::find_by_id(record_id)
            .filter(fines::Column::UserId.eq(user_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Fine not found".to_string()))?;

        record.delete(&self.pool).await?;
        Ok(())
    }
}
