use chrono::NaiveDate;
use serde::Serialize;

use super::{
    ActivityView, BookingDetails, ClassOverview, RosterEntry, UserResponse, WaitlistEntry,
    WeightLog, WorkoutPlan,
};

#[derive(Debug, Serialize)]
pub struct MemberDashboard {
    pub user: UserResponse,
    pub bookings: Vec<BookingDetails>,
    pub waitlist: Vec<WaitlistEntry>,
    pub attended_dates: Vec<NaiveDate>,
    pub workout_plans: Vec<WorkoutPlan>,
    pub weight_history: Vec<WeightLog>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainerStats {
    pub active_clients: i64,
    pub upcoming_classes: i64,
    pub training_plans: i64,
}

#[derive(Debug, Serialize)]
pub struct TrainerDashboard {
    pub trainer: UserResponse,
    pub stats: TrainerStats,
    pub clients: Vec<RosterEntry>,
    pub activities: Vec<ActivityView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_members: i64,
    pub active_classes: i64,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub admin: UserResponse,
    pub stats: AdminStats,
    pub activities: Vec<ActivityView>,
    pub users: Vec<UserResponse>,
    pub classes: Vec<ClassOverview>,
}

/// Member detail page for a trainer (own roster) or an admin.
#[derive(Debug, Serialize)]
pub struct ClientDetail {
    pub client: UserResponse,
    pub weight_history: Vec<WeightLog>,
    pub attended_dates: Vec<NaiveDate>,
    pub bookings: Vec<BookingDetails>,
    pub todays_bookings: Vec<BookingDetails>,
    pub workout_plans: Vec<WorkoutPlan>,
}
