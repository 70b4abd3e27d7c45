//! User accounts binary - HTTP API and database maintenance commands.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_lib::AppState;
use common::{DatabaseConfig, ServiceConfig};
use user_service_lib::infra::Database;

#[derive(Parser)]
#[command(name = "user-accounts")]
#[command(about = "User account CRUD service with password management")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (applies pending migrations first)
    Serve {
        /// Overrides HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

impl From<MigrateAction> for user_service_lib::MigrateAction {
    fn from(action: MigrateAction) -> Self {
        match action {
            MigrateAction::Up => Self::Up,
            MigrateAction::Down => Self::Down,
            MigrateAction::Status => Self::Status,
            MigrateAction::Fresh => Self::Fresh,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env();
    let db_config = DatabaseConfig::from_env();

    // RUST_LOG wins over LOG_LEVEL
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=debug", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);
            info!(service = %config.service_name, "Starting on http://{}:{}", host, port);

            let db = Database::connect(&db_config).await?;
            let user_service = user_service_lib::build_user_service(db.get_connection());
            let state = AppState::new(user_service, Arc::new(db));

            api_lib::serve(&host, port, state).await?;
        }
        Commands::Migrate { action } => {
            user_service_lib::run_migrations(&db_config, action.into()).await?;
        }
    }

    Ok(())
}
