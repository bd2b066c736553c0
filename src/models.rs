use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::weekday_name;

/// An organisational location. Clients know this record as a "holiday".
#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Site {
    pub id: i64,
    pub organisation_id: String,
    pub location: String,
    pub sublocation: Option<String>,
    pub subsublocation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSite {
    pub organisation_id: String,
    pub location: String,
    pub sublocation: Option<String>,
    pub subsublocation: Option<String>,
}

impl NewSite {
    pub fn into_site(self, id: i64) -> Site {
        Site {
            id,
            organisation_id: self.organisation_id,
            location: self.location,
            sublocation: self.sublocation,
            subsublocation: self.subsublocation,
        }
    }
}

/// One dated holiday inside a named plan option.
#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct PlanOption {
    #[serde(rename = "sr_no")]
    pub serial_number: i64,
    pub date: NaiveDate,
    #[serde(rename = "day")]
    pub day_of_week: String,
    pub name: String,
    pub details: Option<String>,
    pub option: String,
}

/// A validated plan option awaiting insertion.
///
/// Carries no weekday; [`NewPlanOption::day_of_week`] derives it from `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlanOption {
    pub date: NaiveDate,
    pub name: String,
    pub details: String,
    pub option: String,
}

impl NewPlanOption {
    pub fn day_of_week(&self) -> &'static str {
        weekday_name(self.date)
    }

    pub fn into_plan_option(self, serial_number: i64) -> PlanOption {
        let day_of_week = self.day_of_week().to_string();
        PlanOption {
            serial_number,
            date: self.date,
            day_of_week,
            name: self.name,
            details: Some(self.details),
            option: self.option,
        }
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Assignment {
    pub id: i64,
    pub site_id: i64,
    pub option: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub site_id: i64,
    pub option: String,
}
