#[cfg(test)]
pub mod test_utils {
    use crate::db::{create_assignment, create_plan_option, create_site, run_migrations};
    use crate::env::AppConfig;
    use crate::error::AppError;
    use crate::init_rocket;
    use crate::models::{NewAssignment, NewPlanOption, NewSite};
    use crate::validation::parse_plan_date;
    use log::LevelFilter;
    use rocket::local::asynchronous::Client;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::{Pool, Sqlite};
    use std::collections::HashMap;
    use std::str::FromStr;
    use std::sync::Once;

    static INIT: Once = Once::new();

    #[derive(Default)]
    pub struct TestDbBuilder {
        sites: Vec<NewSite>,
        plan_options: Vec<TestPlanOption>,
        assignments: Vec<TestAssignment>,
    }

    pub struct TestPlanOption {
        pub date: String,
        pub name: String,
        pub details: String,
        pub option: String,
    }

    pub struct TestAssignment {
        pub location: String,
        pub option: String,
    }

    impl TestDbBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn site(mut self, organisation_id: &str, location: &str) -> Self {
            self.sites.push(NewSite {
                organisation_id: organisation_id.to_string(),
                location: location.to_string(),
                sublocation: None,
                subsublocation: None,
            });
            self
        }

        pub fn site_with_sublocations(
            mut self,
            organisation_id: &str,
            location: &str,
            sublocation: Option<&str>,
            subsublocation: Option<&str>,
        ) -> Self {
            self.sites.push(NewSite {
                organisation_id: organisation_id.to_string(),
                location: location.to_string(),
                sublocation: sublocation.map(String::from),
                subsublocation: subsublocation.map(String::from),
            });
            self
        }

        pub fn plan_option(mut self, date: &str, name: &str, details: &str, option: &str) -> Self {
            self.plan_options.push(TestPlanOption {
                date: date.to_string(),
                name: name.to_string(),
                details: details.to_string(),
                option: option.to_string(),
            });
            self
        }

        /// Assigns `option` to the site seeded with `location`.
        pub fn assign(mut self, location: &str, option: &str) -> Self {
            self.assignments.push(TestAssignment {
                location: location.to_string(),
                option: option.to_string(),
            });
            self
        }

        pub async fn build(self) -> Result<TestDb, AppError> {
            INIT.call_once(|| {
                let _ = env_logger::builder()
                    .filter_level(LevelFilter::Debug)
                    .is_test(true)
                    .try_init();
            });

            // One connection, kept open, so every query sees the same in-memory database
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true))
                .await?;

            run_migrations(&pool).await?;

            let mut site_id_map: HashMap<String, i64> = HashMap::new();

            for site in self.sites {
                let location = site.location.clone();
                let created = create_site(&pool, site).await?;
                site_id_map.insert(location, created.id);
            }

            for plan in self.plan_options {
                create_plan_option(
                    &pool,
                    NewPlanOption {
                        date: parse_plan_date(&plan.date)?,
                        name: plan.name,
                        details: plan.details,
                        option: plan.option,
                    },
                )
                .await?;
            }

            for assignment in self.assignments {
                let site_id = site_id_map.get(&assignment.location).copied().ok_or_else(|| {
                    AppError::Internal(format!("No seeded site at {}", assignment.location))
                })?;

                create_assignment(
                    &pool,
                    &NewAssignment {
                        site_id,
                        option: assignment.option,
                    },
                )
                .await?;
            }

            Ok(TestDb { pool, site_id_map })
        }
    }

    pub struct TestDb {
        pub pool: Pool<Sqlite>,
        pub site_id_map: HashMap<String, i64>,
    }

    impl TestDb {
        pub fn site_id(&self, location: &str) -> Option<i64> {
            self.site_id_map.get(location).copied()
        }

        pub async fn assignment_count(&self) -> Result<i64, sqlx::Error> {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assignments")
                .fetch_one(&self.pool)
                .await
        }

        pub async fn plan_option_count(&self) -> Result<i64, sqlx::Error> {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM plan_options")
                .fetch_one(&self.pool)
                .await
        }
    }

    pub async fn create_standard_test_db() -> TestDb {
        TestDbBuilder::new()
            .site("org1", "HQ")
            .site_with_sublocations("org1", "Warehouse", Some("North"), Some("Dock 3"))
            .plan_option("2024-01-01", "New Year", "Public holiday", "standard")
            .plan_option("2024-12-25", "Christmas", "Public holiday", "standard")
            .plan_option("2024-08-15", "Independence Day", "National holiday", "regional")
            .build()
            .await
            .expect("Failed to build test database")
    }

    pub async fn setup_test_client(test_db: TestDb) -> (Client, TestDb) {
        let config = AppConfig::default();
        let rocket = init_rocket(test_db.pool.clone(), &config);
        let client = Client::tracked(rocket)
            .await
            .expect("valid rocket instance");

        (client, test_db)
    }
}
