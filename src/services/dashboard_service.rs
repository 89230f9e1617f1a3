use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{
    AdminDashboard, AdminStats, ClientDetail, MemberDashboard, RosterEntry, TrainerDashboard,
    TrainerStats, User, UserResponse, UserRole,
};
use crate::services::activity_service::{self, ActivityService};
use crate::services::errors::GymError;
use crate::services::{BookingService, ClassService, PlanService, UserService, WeightLogService};

const FEED_LIMIT: i64 = 5;

/// Read-side aggregation for the member, trainer and admin dashboards.
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
    users: UserService,
    classes: ClassService,
    bookings: BookingService,
    plans: PlanService,
    weights: WeightLogService,
    activity: ActivityService,
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self {
            users: UserService::new(db.clone()),
            classes: ClassService::new(db.clone()),
            bookings: BookingService::new(db.clone()),
            plans: PlanService::new(db.clone()),
            weights: WeightLogService::new(db.clone()),
            activity: ActivityService::new(db.clone()),
            db,
        }
    }

    pub async fn member_dashboard(&self, actor: &Actor) -> Result<MemberDashboard, GymError> {
        if actor.role != UserRole::Member {
            return Err(GymError::Unauthorized);
        }
        let user = self.require_user(actor.user_id).await?;

        Ok(MemberDashboard {
            bookings: self.bookings.bookings_for_user(user.id).await?,
            waitlist: self.bookings.waitlist_for_user(user.id).await?,
            attended_dates: self.bookings.attended_dates(user.id).await?,
            workout_plans: self.plans.plans_for_member(user.id).await?,
            weight_history: self.weights.history(user.id).await?,
            user: user.into(),
        })
    }

    /// Roster, headline stats and recent client activity for a trainer.
    pub async fn trainer_dashboard(&self, actor: &Actor) -> Result<TrainerDashboard, GymError> {
        if actor.role != UserRole::Trainer {
            return Err(GymError::Unauthorized);
        }
        let trainer = self.require_user(actor.user_id).await?;

        let clients = self.users.clients_of(trainer.id).await?;
        let client_ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
        let client_names: Vec<String> = clients.iter().map(|c| c.name.clone()).collect();

        let upcoming_classes: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT class_id) FROM bookings
             WHERE user_id = ANY($1) AND booking_date::date >= CURRENT_DATE",
        )
        .bind(&client_ids)
        .fetch_one(&self.db)
        .await?;

        let stats = TrainerStats {
            active_clients: clients.len() as i64,
            upcoming_classes,
            training_plans: self.plans.count_for_members(&client_ids).await?,
        };

        let last_bookings: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(
            "SELECT user_id, MAX(booking_date) FROM bookings
             WHERE user_id = ANY($1) GROUP BY user_id",
        )
        .bind(&client_ids)
        .fetch_all(&self.db)
        .await?;

        let now = Utc::now();
        let activities = activity_service::to_views(
            self.activity.recent_for(&client_names, FEED_LIMIT).await?,
            now,
        );

        Ok(TrainerDashboard {
            trainer: trainer.into(),
            stats,
            clients: build_roster(clients, &last_bookings.into_iter().collect(), now),
            activities,
        })
    }

    pub async fn admin_dashboard(&self, actor: &Actor) -> Result<AdminDashboard, GymError> {
        if actor.role != UserRole::Admin {
            return Err(GymError::Unauthorized);
        }
        let admin = self.require_user(actor.user_id).await?;

        let stats = AdminStats {
            total_members: self.users.count_members().await?,
            active_classes: self.classes.count_classes().await?,
        };

        Ok(AdminDashboard {
            admin: admin.into(),
            stats,
            activities: activity_service::to_views(
                self.activity.recent(FEED_LIMIT).await?,
                Utc::now(),
            ),
            users: self
                .users
                .list_users()
                .await?
                .into_iter()
                .map(UserResponse::from)
                .collect(),
            classes: self.classes.list_classes().await?,
        })
    }

    /// Detail view of one member. Trainers may only see their own clients;
    /// admins may see anyone.
    pub async fn client_detail(&self, actor: &Actor, client_id: Uuid) -> Result<ClientDetail, GymError> {
        match actor.role {
            UserRole::Admin => {}
            UserRole::Trainer => {
                if !self.users.is_client_of(actor.user_id, client_id).await? {
                    return Err(GymError::Unauthorized);
                }
            }
            UserRole::Member => return Err(GymError::Unauthorized),
        }

        let client = self.require_user(client_id).await?;

        Ok(ClientDetail {
            weight_history: self.weights.history(client.id).await?,
            attended_dates: self.bookings.attended_dates(client.id).await?,
            bookings: self.bookings.bookings_for_user(client.id).await?,
            todays_bookings: self.bookings.todays_bookings(client.id).await?,
            workout_plans: self.plans.plans_for_member(client.id).await?,
            client: client.into(),
        })
    }

    async fn require_user(&self, user_id: Uuid) -> Result<User, GymError> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or(GymError::NotFound("User"))
    }
}

/// Pair each client with how long ago they last booked a class.
pub fn build_roster(
    clients: Vec<User>,
    last_bookings: &HashMap<Uuid, DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Vec<RosterEntry> {
    clients
        .into_iter()
        .map(|client| {
            let last_active = match last_bookings.get(&client.id) {
                Some(at) => activity_service::time_ago(Some(*at), now),
                None => "No activity".to_string(),
            };
            RosterEntry {
                client: client.into(),
                last_active,
            }
        })
        .collect()
}
