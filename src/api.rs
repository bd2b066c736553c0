use rocket::Request;
use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::{Deserialize, Serialize, json::Json};
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::db::{
    create_assignment, create_plan_option, create_site, get_all_sites, get_assignments_for_site,
    get_plan_options, get_site,
};
use crate::error::{AppError, ErrorResponse};
use crate::models::{NewAssignment, NewPlanOption, NewSite, PlanOption, Site};
use crate::validation::{
    AssignPlanRequest, CreatePlanOptionRequest, CreateSiteRequest, JsonValidateExt,
    option_filter, require_holiday_id,
};

pub const ASSIGNMENT_CONFIRMATION: &str = "Holiday plan assigned successfully!";
pub const SITE_NOT_FOUND: &str = "Holiday not found";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct AssignmentResponse {
    pub message: String,
    pub organisation_id: String,
    pub location: String,
    pub sublocation: Option<String>,
    pub subsublocation: Option<String>,
}

impl AssignmentResponse {
    fn confirm(site: Site) -> Self {
        Self {
            message: ASSIGNMENT_CONFIRMATION.to_string(),
            organisation_id: site.organisation_id,
            location: site.location,
            sublocation: site.sublocation,
            subsublocation: site.subsublocation,
        }
    }
}

#[get("/holidays")]
pub async fn api_get_sites(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Site>>, AppError> {
    let sites = get_all_sites(db).await?;
    Ok(Json(sites))
}

#[post("/holidays", data = "<payload>")]
pub async fn api_create_site(
    payload: Json<CreateSiteRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<Site>>, AppError> {
    let new_site: NewSite = payload.validated()?;

    let site = create_site(db, new_site).await?;

    Ok(Custom(Status::Created, Json(site)))
}

#[get("/holidayplans?<option>")]
pub async fn api_get_plan_options(
    option: Option<String>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<PlanOption>>, AppError> {
    let plans = get_plan_options(db, option_filter(option.as_deref())).await?;
    Ok(Json(plans))
}

#[post("/holidayplans", data = "<payload>")]
pub async fn api_create_plan_option(
    payload: Json<CreatePlanOptionRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<PlanOption>>, AppError> {
    let new_plan: NewPlanOption = payload.validated()?;

    let plan = create_plan_option(db, new_plan).await?;

    Ok(Custom(Status::Created, Json(plan)))
}

/// Links a site to a plan option. The site must exist before anything is
/// written, so an unknown `holidayId` never leaves an orphaned assignment.
#[post("/holidayplan", data = "<payload>")]
pub async fn api_assign_plan(
    payload: Json<AssignPlanRequest>,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<AssignmentResponse>>, AppError> {
    let assignment: NewAssignment = payload.validated()?;

    let site = get_site(db, assignment.site_id)
        .await?
        .ok_or_else(|| AppError::NotFound(SITE_NOT_FOUND.to_string()))?;

    let assignment_id = create_assignment(db, &assignment).await?;
    info!(assignment_id, site_id = site.id, option = %assignment.option, "Plan option assigned");

    Ok(Custom(
        Status::Created,
        Json(AssignmentResponse::confirm(site)),
    ))
}

#[get("/assigned_plans?<holiday_id>")]
pub async fn api_get_assigned_plans(
    holiday_id: Option<i64>,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<String>>, AppError> {
    let site_id = require_holiday_id(holiday_id)?;

    let options = get_assignments_for_site(db, site_id)
        .await?
        .into_iter()
        .map(|assignment| assignment.option)
        .collect();

    Ok(Json(options))
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Bad request"))
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Resource not found"))
}

#[catch(422)]
pub fn unprocessable_entity(_req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Malformed request body"))
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error"))
}
