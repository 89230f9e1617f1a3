// Authentication and request identity

pub mod password;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;
pub mod errors;

pub use password::*;
pub use jwt::*;
pub use middleware::*;
pub use models::*;
pub use service::*;
pub use errors::*;
