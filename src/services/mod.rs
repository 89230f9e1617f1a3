// Business logic services

pub mod errors;
pub mod class_ledger;
pub mod activity_service;
pub mod user_service;
pub mod class_service;
pub mod booking_service;
pub mod plan_service;
pub mod weight_log_service;
pub mod dashboard_service;

pub use errors::GymError;
pub use class_ledger::{Admission, ClassLedger};
pub use activity_service::ActivityService;
pub use user_service::UserService;
pub use class_service::ClassService;
pub use booking_service::BookingService;
pub use plan_service::PlanService;
pub use weight_log_service::WeightLogService;
pub use dashboard_service::DashboardService;
