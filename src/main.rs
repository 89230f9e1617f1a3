use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use smart_gym::api::routes::create_routes;
use smart_gym::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};

#[derive(Parser)]
#[command(name = "smart-gym")]
#[command(about = "Gym class booking and trainer management server", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Database connection string
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run migrations and start the HTTP server (default)
    Serve,

    /// Apply pending migrations and exit
    Migrate,

    /// Wipe all tables and load the demo data set
    InitDb,
}

impl Cli {
    async fn execute(self, config: AppConfig) -> Result<()> {
        let mut db_config = DatabaseConfig::from_env()?;
        if let Some(url) = self.database_url {
            db_config.database_url = url;
        }

        let pool = db_config
            .create_pool()
            .await
            .context("failed to connect to the database")?;

        run_migrations(&pool).await.context("failed to run migrations")?;

        match self.command.unwrap_or(Commands::Serve) {
            Commands::Migrate => {
                tracing::info!("Migrations applied");
                Ok(())
            }
            Commands::InitDb => DatabaseSeeder::new(pool).reset_and_seed().await,
            Commands::Serve => {
                let app = create_routes(pool, &config.jwt_secret);

                let address = config.server_address();
                let listener = TcpListener::bind(&address)
                    .await
                    .with_context(|| format!("failed to bind {address}"))?;
                tracing::info!(environment = %config.environment, "Smart Gym server starting on http://{address}");
                tracing::info!("Health check available at http://{address}/health");

                axum::serve(listener, app).await?;
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    Cli::parse().execute(config).await
}
