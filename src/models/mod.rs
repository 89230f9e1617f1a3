// Persistent entities and request/response shapes

pub mod user;
pub mod gym_class;
pub mod booking;
pub mod workout_plan;
pub mod weight_log;
pub mod activity_log;
pub mod dashboard;

pub use user::*;
pub use gym_class::*;
pub use booking::*;
pub use workout_plan::*;
pub use weight_log::*;
pub use activity_log::*;
pub use dashboard::*;
