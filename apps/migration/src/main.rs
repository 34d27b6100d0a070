//! Schema CLI for the `postgres` backend.
//!
//! `migration up`, `migration down`, `migration status` and the other SeaORM
//! subcommands run against `DATABASE_URL` (read from `.env` when present).

use sea_orm_migration::cli;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    cli::run_cli(migration::Migrator).await;
}
