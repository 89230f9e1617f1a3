use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{BookingStatus, CreateClass, CreateUser, UserRole};
use crate::services::*;

struct SeedClass {
    name: &'static str,
    description: &'static str,
    day: &'static str,
    time: &'static str,
    duration: &'static str,
    image_url: &'static str,
}

const SEED_CLASSES: [SeedClass; 6] = [
    SeedClass {
        name: "Yoga",
        description: "Find balance & peace of mind in this gentle yoga.",
        day: "Mon",
        time: "6:00 am",
        duration: "60 min",
        image_url: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?auto=format&fit=crop&w=400",
    },
    SeedClass {
        name: "Spinning",
        description: "Join our high-energy spinning class to improve your cardiovascular fitness.",
        day: "Tue",
        time: "7:00 am",
        duration: "45 min",
        image_url: "https://images.unsplash.com/photo-1599447462855-40c94868978a?auto=format&fit=crop&w=400",
    },
    SeedClass {
        name: "Kickboxing",
        description: "Engage in an intense workout that combines martial arts.",
        day: "Wed",
        time: "7:00 am",
        duration: "50 min",
        image_url: "https://images.unsplash.com/photo-1517438322306-4a8134a6424a?auto=format&fit=crop&w=400",
    },
    SeedClass {
        name: "Pilates",
        description: "Strengthen your core and improve flexibility with our Pilates sessions.",
        day: "Thu",
        time: "9:00 am",
        duration: "50 min",
        image_url: "https://images.unsplash.com/photo-1598422856984-a28d5a1458e6?auto=format&fit=crop&w=400",
    },
    SeedClass {
        name: "Zumba",
        description: "Dance to great music, with great people, and burn a ton of calories.",
        day: "Fri",
        time: "6:00 pm",
        duration: "55 min",
        image_url: "https://images.unsplash.com/photo-1593121924236-4695180a61e3?auto=format&fit=crop&w=400",
    },
    SeedClass {
        name: "HIIT",
        description: "High-Intensity Interval Training for maximum calorie burn in a short time.",
        day: "Sat",
        time: "8:00 am",
        duration: "30 min",
        image_url: "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?auto=format&fit=crop&w=400",
    },
];

const SEED_MEMBERS: [(&str, &str, &str); 4] = [
    ("John Doe", "john@example.com", "Weight Loss"),
    ("Mara Pinto", "mara@example.com", "General Fitness"),
    ("Raj Kumar", "raj@example.com", "Weight Loss"),
    ("Anita Singh", "anita@example.com", "Bodybuilding"),
];

/// Wipes the gym tables and loads a small demo data set.
pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn reset_and_seed(&self) -> Result<()> {
        tracing::info!("Resetting database...");
        self.reset().await?;

        tracing::info!("Starting database seeding...");
        self.seed_users().await?;
        self.seed_classes().await?;
        self.seed_history().await?;

        tracing::info!("Database initialized successfully with sample data.");
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        sqlx::query(
            "TRUNCATE activity_logs, weight_logs, workout_plans, waitlist, bookings,
                      trainer_clients, classes, users",
        )
        .execute(&self.pool)
        .await
        .context("failed to clear tables")?;
        Ok(())
    }

    async fn seed_users(&self) -> Result<()> {
        let user_service = UserService::new(self.pool.clone());

        // Trainer first: registration rosters members to the first trainer.
        let staff = [
            ("Admin User", "admin@gym.com", "admin", UserRole::Admin),
            ("Sara Holmes", "sara@example.com", "trainer", UserRole::Trainer),
        ];
        for (name, email, password, role) in staff {
            user_service
                .register(CreateUser {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role,
                    goal: None,
                })
                .await
                .with_context(|| format!("failed to create {email}"))?;
        }

        for (name, email, goal) in SEED_MEMBERS {
            user_service
                .register(CreateUser {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: "member".to_string(),
                    role: UserRole::Member,
                    goal: Some(goal.to_string()),
                })
                .await
                .with_context(|| format!("failed to create {email}"))?;
        }

        tracing::info!("Created demo users");
        Ok(())
    }

    async fn seed_classes(&self) -> Result<()> {
        let class_service = ClassService::new(self.pool.clone());

        for class in &SEED_CLASSES {
            class_service
                .create_class(CreateClass {
                    name: class.name.to_string(),
                    description: class.description.to_string(),
                    day: class.day.to_string(),
                    time: class.time.to_string(),
                    duration: class.duration.to_string(),
                    image_url: class.image_url.to_string(),
                    capacity: None,
                })
                .await?;
        }

        tracing::info!(count = SEED_CLASSES.len(), "Created demo classes");
        Ok(())
    }

    async fn seed_history(&self) -> Result<()> {
        let user_service = UserService::new(self.pool.clone());
        let class_service = ClassService::new(self.pool.clone());
        let weight_service = WeightLogService::new(self.pool.clone());
        let plan_service = PlanService::new(self.pool.clone());

        let john = user_service.get_user_by_email("john@example.com").await?;
        let mara = user_service.get_user_by_email("mara@example.com").await?;
        let yoga = class_service.get_class_by_name("Yoga").await?;
        let spinning = class_service.get_class_by_name("Spinning").await?;

        if let (Some(john), Some(yoga)) = (john, yoga) {
            self.insert_booking(
                john.id,
                yoga.id,
                BookingStatus::Attended,
                Utc::now() - Duration::days(2),
            )
            .await?;

            let today = Utc::now().date_naive();
            weight_service
                .add_entry(john.id, &john.name, today - Duration::days(10), 182.0)
                .await?;
            weight_service
                .add_entry(john.id, &john.name, today - Duration::days(5), 178.0)
                .await?;
        }

        if let (Some(mara), Some(spinning)) = (mara, spinning) {
            self.insert_booking(mara.id, spinning.id, BookingStatus::Booked, Utc::now())
                .await?;
            plan_service
                .assign_plan(
                    mara.id,
                    "Sara Holmes",
                    "Beginner Cardio Plan",
                    "Start with 20 mins of treadmill, 3 times a week.",
                )
                .await?;
            ActivityService::new(self.pool.clone())
                .record_now(&mara.name, "booked Spinning")
                .await?;
        }

        tracing::info!("Created demo bookings, weights and plans");
        Ok(())
    }

    /// Historical bookings carry their own date and status, so they bypass
    /// the booking service.
    async fn insert_booking(
        &self,
        user_id: Uuid,
        class_id: Uuid,
        status: BookingStatus,
        booking_date: chrono::DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO bookings (id, user_id, class_id, booking_date, status)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(class_id)
        .bind(booking_date)
        .bind(status)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
