pub mod affiliate;
pub mod commission;
pub mod common;
pub mod expense;
pub mod network;
pub mod pagination;
pub mod user;

pub use affiliate::*;
pub use commission::*;
pub use common::*;
pub use expense::*;
pub use network::*;
pub use pagination::*;
pub use user::*;
