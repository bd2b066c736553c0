#[macro_use]
extern crate rocket;

mod api;
mod cors;
mod db;
mod env;
mod error;
mod models;
mod telemetry;
#[cfg(test)]
mod test;
mod validation;

use std::sync::Mutex;

use api::{
    api_assign_plan, api_create_plan_option, api_create_site, api_get_assigned_plans,
    api_get_plan_options, api_get_sites, bad_request, health, internal_error, not_found,
    unprocessable_entity,
};
use cors::{CorsFairing, preflight};
use db::{connect, run_migrations};
use env::{AppConfig, EnvFileStatus, load_environment};
use error::AppError;
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket};
use sqlx::{Pool, Sqlite};
use telemetry::{OtelGuard, TelemetryFairing, init_tracing, shutdown_telemetry};
use thiserror::Error;
use tracing::info;

pub static TELEMETRY_GUARD: Mutex<Option<OtelGuard>> = Mutex::new(None);

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Anyhow(anyhow::Error),
    #[error("{0}")]
    Figment(rocket::figment::Error),
    #[error("Application error: {0}")]
    App(#[from] AppError),
    #[error("Launch error: {0}")]
    Launch(Box<rocket::Error>),
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error::Anyhow(value)
    }
}

impl From<rocket::figment::Error> for Error {
    fn from(value: rocket::figment::Error) -> Self {
        Error::Figment(value)
    }
}

impl From<rocket::Error> for Error {
    fn from(value: rocket::Error) -> Self {
        Error::Launch(Box::new(value))
    }
}

#[rocket::main]
async fn main() -> Result<(), Error> {
    let env_files =
        load_environment().map_err(|e| anyhow::anyhow!("Failed to load environment: {}", e))?;

    let config = AppConfig::from_env()?;
    init_tracing(&config)?;
    env_files.iter().for_each(EnvFileStatus::log);

    let pool = connect(&config).await?;
    run_migrations(&pool).await?;
    info!("Migrations completed successfully");

    let _ = init_rocket(pool, &config).launch().await?;

    Ok(())
}

pub fn init_rocket(pool: Pool<Sqlite>, config: &AppConfig) -> Rocket<Build> {
    info!("Starting holiday plans service");

    rocket::build()
        .manage(pool)
        .mount(
            "/api",
            routes![
                api_get_sites,
                api_create_site,
                api_get_plan_options,
                api_create_plan_option,
                api_assign_plan,
                api_get_assigned_plans,
                health,
                preflight,
            ],
        )
        .register(
            "/",
            catchers![bad_request, not_found, unprocessable_entity, internal_error],
        )
        .attach(TelemetryFairing)
        .attach(CorsFairing::new(config.cors_allow_origin.clone()))
        .attach(AdHoc::on_shutdown("Telemetry shutdown", |_| {
            Box::pin(async {
                shutdown_telemetry();
            })
        }))
}
