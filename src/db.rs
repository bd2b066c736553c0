use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::env::AppConfig;
use crate::error::AppError;
use crate::models::{Assignment, NewAssignment, NewPlanOption, NewSite, PlanOption, Site};

#[instrument(skip(config), fields(database_url = %config.database_url))]
pub async fn connect(config: &AppConfig) -> Result<Pool<Sqlite>, AppError> {
    info!("Connecting to SQLite database");
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

#[instrument(skip(pool))]
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[instrument(skip(pool))]
pub async fn get_all_sites(pool: &Pool<Sqlite>) -> Result<Vec<Site>, AppError> {
    info!("Getting all sites");
    let sites = sqlx::query_as::<_, Site>(
        "SELECT id, organisation_id, location, sublocation, subsublocation
         FROM sites
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(sites)
}

#[instrument(skip(pool))]
pub async fn get_site(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Site>, AppError> {
    info!("Fetching site by ID");
    let site = sqlx::query_as::<_, Site>(
        "SELECT id, organisation_id, location, sublocation, subsublocation
         FROM sites
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(site)
}

#[instrument(skip(pool))]
pub async fn create_site(pool: &Pool<Sqlite>, site: NewSite) -> Result<Site, AppError> {
    info!("Creating site");
    let res = sqlx::query(
        "INSERT INTO sites (organisation_id, location, sublocation, subsublocation)
         VALUES (?, ?, ?, ?)",
    )
    .bind(&site.organisation_id)
    .bind(&site.location)
    .bind(&site.sublocation)
    .bind(&site.subsublocation)
    .execute(pool)
    .await?;

    Ok(site.into_site(res.last_insert_rowid()))
}

#[instrument(skip(pool))]
pub async fn get_plan_options(
    pool: &Pool<Sqlite>,
    option: Option<&str>,
) -> Result<Vec<PlanOption>, AppError> {
    info!("Getting plan options");
    let plans = match option {
        Some(option) => {
            sqlx::query_as::<_, PlanOption>(
                "SELECT serial_number, date, day_of_week, name, details, option
                 FROM plan_options
                 WHERE option = ?
                 ORDER BY serial_number",
            )
            .bind(option)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, PlanOption>(
                "SELECT serial_number, date, day_of_week, name, details, option
                 FROM plan_options
                 ORDER BY serial_number",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(plans)
}

#[instrument(skip(pool))]
pub async fn create_plan_option(
    pool: &Pool<Sqlite>,
    plan: NewPlanOption,
) -> Result<PlanOption, AppError> {
    info!("Creating plan option");
    let res = sqlx::query(
        "INSERT INTO plan_options (date, day_of_week, name, details, option)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(plan.date)
    .bind(plan.day_of_week())
    .bind(&plan.name)
    .bind(&plan.details)
    .bind(&plan.option)
    .execute(pool)
    .await?;

    Ok(plan.into_plan_option(res.last_insert_rowid()))
}

#[instrument(skip(pool))]
pub async fn create_assignment(
    pool: &Pool<Sqlite>,
    assignment: &NewAssignment,
) -> Result<i64, AppError> {
    info!("Assigning plan option to site");
    let res = sqlx::query("INSERT INTO assignments (site_id, option) VALUES (?, ?)")
        .bind(assignment.site_id)
        .bind(&assignment.option)
        .execute(pool)
        .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool))]
pub async fn get_assignments_for_site(
    pool: &Pool<Sqlite>,
    site_id: i64,
) -> Result<Vec<Assignment>, AppError> {
    info!("Getting assignments for site");
    // No error when the site has no assignments or does not exist
    let rows = sqlx::query_as::<_, Assignment>(
        "SELECT id, site_id, option FROM assignments
         WHERE site_id = ?
         ORDER BY id",
    )
    .bind(site_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
