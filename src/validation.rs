use chrono::{Datelike, NaiveDate, Weekday};
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};
use validator::{Validate, ValidationErrors};

use crate::error::AppError;
use crate::models::{NewAssignment, NewPlanOption, NewSite};

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
pub const FIELD_TOO_LONG: &str = "Field exceeds maximum length";
pub const INVALID_DATE_FORMAT: &str = "Invalid date format";
pub const MISSING_HOLIDAY_ID: &str = "Missing holiday ID";

const PLAN_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize, Validate, Debug, Default)]
pub struct CreateSiteRequest {
    #[validate(required, length(max = 50))]
    pub organisation_id: Option<String>,
    #[validate(required, length(max = 100))]
    pub location: Option<String>,
    #[validate(length(max = 100))]
    pub sublocation: Option<String>,
    #[validate(length(max = 100))]
    pub subsublocation: Option<String>,
}

/// Inbound plan option. The weekday is not part of this contract; a `day`
/// key sent by a client is dropped during deserialization.
///
/// `date` accepts any JSON value so a non-string date is reported as an
/// invalid date rather than a malformed body.
#[derive(Deserialize, Validate, Debug, Default)]
pub struct CreatePlanOptionRequest {
    #[validate(required)]
    pub date: Option<Value>,
    #[validate(required, length(max = 100))]
    pub name: Option<String>,
    #[validate(required, length(max = 255))]
    pub details: Option<String>,
    #[validate(required, length(max = 50))]
    pub option: Option<String>,
}

/// `options` holds a single label despite the plural name.
#[derive(Deserialize, Validate, Debug, Default)]
pub struct AssignPlanRequest {
    #[serde(rename = "holidayId")]
    #[validate(required)]
    pub holiday_id: Option<i64>,
    #[validate(required, length(max = 50))]
    pub options: Option<String>,
}

impl TryFrom<CreateSiteRequest> for NewSite {
    type Error = AppError;

    fn try_from(request: CreateSiteRequest) -> Result<Self, Self::Error> {
        Ok(NewSite {
            organisation_id: required(request.organisation_id)?,
            location: required(request.location)?,
            sublocation: request.sublocation,
            subsublocation: request.subsublocation,
        })
    }
}

impl TryFrom<CreatePlanOptionRequest> for NewPlanOption {
    type Error = AppError;

    fn try_from(request: CreatePlanOptionRequest) -> Result<Self, Self::Error> {
        let name = required(request.name)?;
        let details = required(request.details)?;
        let option = required(request.option)?;
        let date = match required(request.date)? {
            Value::String(date) => parse_plan_date(&date)?,
            _ => return Err(AppError::InvalidDate(INVALID_DATE_FORMAT.to_string())),
        };

        Ok(NewPlanOption {
            date,
            name,
            details,
            option,
        })
    }
}

impl TryFrom<AssignPlanRequest> for NewAssignment {
    type Error = AppError;

    fn try_from(request: AssignPlanRequest) -> Result<Self, Self::Error> {
        Ok(NewAssignment {
            site_id: required(request.holiday_id)?,
            option: required(request.options)?,
        })
    }
}

fn required<T>(value: Option<T>) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()))
}

/// Runs the payload's field rules, then converts it into its typed form.
#[instrument(skip(payload))]
pub fn validate_payload<T, U>(payload: T) -> Result<U, AppError>
where
    T: Validate,
    U: TryFrom<T, Error = AppError>,
{
    payload.validate().map_err(|errors| validation_failure(&errors))?;
    U::try_from(payload)
}

fn validation_failure(errors: &ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();

    let mut missing: Vec<&str> = field_errors
        .iter()
        .filter(|(_, errs)| errs.iter().any(|e| e.code == "required"))
        .map(|(field, _)| &**field)
        .collect();
    missing.sort_unstable();

    if !missing.is_empty() {
        warn!(fields = ?missing, "Payload is missing required fields");
        return AppError::Validation(MISSING_REQUIRED_FIELDS.to_string());
    }

    let mut invalid: Vec<&str> = field_errors.keys().map(|field| &**field).collect();
    invalid.sort_unstable();
    warn!(fields = ?invalid, "Payload fields exceed their maximum length");
    AppError::Validation(FIELD_TOO_LONG.to_string())
}

pub trait JsonValidateExt<T> {
    fn validated<U>(self) -> Result<U, AppError>
    where
        U: TryFrom<T, Error = AppError>;
}

impl<T: Validate> JsonValidateExt<T> for Json<T> {
    fn validated<U>(self) -> Result<U, AppError>
    where
        U: TryFrom<T, Error = AppError>,
    {
        validate_payload(self.into_inner())
    }
}

pub fn parse_plan_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, PLAN_DATE_FORMAT)
        .map_err(|_| AppError::InvalidDate(INVALID_DATE_FORMAT.to_string()))
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// An empty `option` query parameter lists every plan option.
pub fn option_filter(option: Option<&str>) -> Option<&str> {
    option.filter(|value| !value.is_empty())
}

pub fn require_holiday_id(holiday_id: Option<i64>) -> Result<i64, AppError> {
    holiday_id.ok_or_else(|| AppError::Validation(MISSING_HOLIDAY_ID.to_string()))
}
