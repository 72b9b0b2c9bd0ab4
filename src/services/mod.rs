pub mod affiliate_service;
pub mod auth_service;
pub mod commission_service;
pub mod expense_service;
pub mod network_service;
pub mod subscription_service;

pub use affiliate_service::AffiliateService;
pub use auth_service::AuthService;
pub use commission_service::CommissionService;
pub use expense_service::ExpenseService;
pub use network_service::NetworkService;
pub use subscription_service::SubscriptionService;
