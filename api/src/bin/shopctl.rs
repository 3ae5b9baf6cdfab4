//! Operator tooling for the shop API database.
//!
//! ```bash
//! shopctl migrate
//! shopctl create-user -e admin@domain.tld -p s3cret -r admin
//! ```
//!
//! Reads the same environment as the server (`DATABASE_URL`,
//! `DATABASE_MAX_CONNECTIONS`), including a `.env` file when present.

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde_json::json;

use shop_api::application::use_cases::auth::AuthError;
use shop_api::application::use_cases::auth::register::{Register, RegisterRequest};
use shop_api::application::validation::schemas;
use shop_api::bootstrap::config::Config;
use shop_api::domain::users::user::Role;
use shop_api::infrastructure::db;
use shop_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(author, version, about = "Shop API database tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create a user with a password, e.g. the first admin
    CreateUser {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "SHOPCTL_PASSWORD")]
        password: String,

        /// `customer` or `admin`
        #[arg(short, long, default_value = "customer")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Command failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = Config::from_env()?;
    let pool = db::connect_pool(&cfg.database_url, cfg.database_max_connections).await?;
    match cli.command {
        Commands::Migrate => {
            db::migrate(&pool).await?;
            tracing::info!("migrations applied");
        }
        Commands::CreateUser {
            email,
            password,
            role,
        } => {
            let input = schemas::register_input(&json!({
                "email": email,
                "password": password,
                "role": role,
            }))
            .map_err(|e| anyhow::anyhow!("invalid input: {}", describe(&e)))?;
            let role = input
                .role
                .as_deref()
                .and_then(Role::parse)
                .unwrap_or(Role::Customer);
            let repo = SqlxUserRepository::new(pool);
            let uc = Register { repo: &repo };
            let req = RegisterRequest {
                email: input.email,
                password: input.password,
                role,
            };
            match uc.execute(&req).await {
                Ok(user) => println!("created user {} ({})", user.id, user.role.as_str()),
                Err(AuthError::Validation(e)) => anyhow::bail!("{}", describe(&e)),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

fn describe(errors: &shop_api::application::validation::ValidationErrors) -> String {
    errors
        .0
        .iter()
        .map(|e| format!("{}: {}", e.field.as_deref().unwrap_or("-"), e.message))
        .collect::<Vec<_>>()
        .join(", ")
}
