pub mod affiliates;
pub mod commissions;
pub mod drive_records;
pub mod fines;
pub mod maintenance_records;
pub mod users;

pub use affiliates as affiliate_entity;
pub use commissions as commission_entity;
pub use drive_records as drive_record_entity;
pub use fines as fine_entity;
pub use maintenance_records as maintenance_record_entity;
pub use users as user_entity;

pub use commissions::CommissionStatus;
pub use fines::FineStatus;
