pub mod affiliate;
pub mod auth;
pub mod expense;
pub mod health;
pub mod subscription;
pub mod webhook;

pub use affiliate::affiliate_config;
pub use auth::auth_config;
pub use expense::expense_config;
pub use health::health_config;
pub use subscription::subscription_config;
pub use webhook::webhook_config;
