//! Operator commands for a Bazaar store database.
//!
//! ```bash
//! # Insert the demo catalog into an empty database
//! cargo run -p bazaar-store-cli -- seed
//!
//! # Create an admin account, or promote an existing one
//! cargo run -p bazaar-store-cli -- create-admin --email ops@example.com --name Ops --password s3cret!
//! ```
//!
//! Both commands read `DATABASE_URL` from the environment (a `.env` file is honoured).

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use sea_orm::{Database, DatabaseConnection};

use bazaar_store::infra::db::DbUserRepository;
use bazaar_store::infra::password::Argon2Hasher;
use bazaar_store::usecase::account::{AdminBootstrap, BootstrapAdminInput, BootstrapAdminUseCase};

mod seed;

#[derive(Parser)]
#[command(about = "Bazaar store operator commands")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert the demo categories and products. Skipped when any category exists.
    Seed,
    /// Create an admin account, or promote the account that already owns the email.
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "Admin")]
        name: String,
        /// Ignored when the account already exists.
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    bazaar_core::tracing::init_tracing();

    let args = Args::parse();
    let db = connect().await?;

    match args.command {
        Command::Seed => seed::run(&db).await,
        Command::CreateAdmin {
            email,
            name,
            password,
        } => create_admin(db, email, name, password).await,
    }
}

async fn connect() -> Result<DatabaseConnection> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    Database::connect(&url)
        .await
        .context("failed to connect to database")
}

async fn create_admin(
    db: DatabaseConnection,
    email: String,
    name: String,
    password: String,
) -> Result<()> {
    let usecase = BootstrapAdminUseCase {
        users: DbUserRepository { db },
        hasher: Argon2Hasher,
    };
    let outcome = usecase
        .execute(BootstrapAdminInput {
            name,
            email,
            password,
        })
        .await
        .context("create admin")?;

    match outcome {
        AdminBootstrap::Created(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "admin created");
        }
        AdminBootstrap::Promoted(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "existing user promoted to admin");
        }
    }
    Ok(())
}
