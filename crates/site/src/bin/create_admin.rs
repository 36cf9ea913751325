//! Provision an admin account from environment variables.
//!
//! Usage:
//!
//! ```text
//! CLINIC_ADMIN_EMAIL=admin@example.com \
//! CLINIC_ADMIN_NAME="Clinic Admin" \
//! CLINIC_ADMIN_PASSWORD=... \
//! cargo run -p maplewood-site --bin create_admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use maplewood_site::config::SiteConfig;
use maplewood_site::db;
use maplewood_site::services::auth::AuthService;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = SiteConfig::from_env().expect("Failed to load configuration");

    let email = std::env::var("CLINIC_ADMIN_EMAIL").expect("CLINIC_ADMIN_EMAIL is required");
    let name = std::env::var("CLINIC_ADMIN_NAME").expect("CLINIC_ADMIN_NAME is required");
    let password = std::env::var("CLINIC_ADMIN_PASSWORD").expect("CLINIC_ADMIN_PASSWORD is required");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let admin = AuthService::new(&pool)
        .create_admin(&email, &name, &password)
        .await
        .expect("Failed to create admin account");

    tracing::info!(admin_id = %admin.id, email = %admin.email, "Admin account created");
}
