pub mod affiliate_code;
pub mod jwt;
pub mod password;

pub use affiliate_code::generate_affiliate_code;
pub use jwt::*;
pub use password::*;
