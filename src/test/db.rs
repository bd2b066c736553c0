#[cfg(test)]
mod tests {
    use crate::db::{
        create_assignment, create_plan_option, create_site, get_all_sites,
        get_assignments_for_site, get_plan_options, get_site,
    };
    use crate::error::AppError;
    use crate::models::{NewAssignment, NewPlanOption, NewSite};
    use crate::test::test_utils::{TestDbBuilder, create_standard_test_db};
    use chrono::NaiveDate;

    #[rocket::async_test]
    async fn test_create_and_get_site() {
        let test_db = TestDbBuilder::new()
            .build()
            .await
            .expect("Failed to build test database");

        let created = create_site(
            &test_db.pool,
            NewSite {
                organisation_id: "org1".to_string(),
                location: "HQ".to_string(),
                sublocation: Some("Floor 1".to_string()),
                subsublocation: None,
            },
        )
        .await
        .expect("Failed to create site");

        let fetched = get_site(&test_db.pool, created.id)
            .await
            .expect("Failed to get site")
            .expect("Site should exist");

        assert_eq!(fetched, created);
        assert_eq!(fetched.sublocation.as_deref(), Some("Floor 1"));
        assert_eq!(fetched.subsublocation, None);

        let missing = get_site(&test_db.pool, created.id + 100)
            .await
            .expect("Failed to query site");
        assert!(missing.is_none());
    }

    #[rocket::async_test]
    async fn test_site_ids_are_unique() {
        let test_db = TestDbBuilder::new()
            .site("org1", "HQ")
            .site("org1", "HQ Annex")
            .site("org2", "Remote")
            .build()
            .await
            .expect("Failed to build test database");

        let sites = get_all_sites(&test_db.pool)
            .await
            .expect("Failed to get sites");

        assert_eq!(sites.len(), 3);
        let mut ids: Vec<i64> = sites.iter().map(|s| s.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[rocket::async_test]
    async fn test_plan_option_stores_derived_weekday() {
        let test_db = TestDbBuilder::new()
            .build()
            .await
            .expect("Failed to build test database");

        let plan = create_plan_option(
            &test_db.pool,
            NewPlanOption {
                date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                name: "Leap Day".to_string(),
                details: "Company holiday".to_string(),
                option: "option1".to_string(),
            },
        )
        .await
        .expect("Failed to create plan option");

        assert_eq!(plan.day_of_week, "Thursday");

        let stored = get_plan_options(&test_db.pool, None)
            .await
            .expect("Failed to get plan options");

        assert_eq!(stored, vec![plan]);
    }

    #[rocket::async_test]
    async fn test_get_plan_options_filters_exactly() {
        let test_db = create_standard_test_db().await;

        let all = get_plan_options(&test_db.pool, None)
            .await
            .expect("Failed to get plan options");
        let standard = get_plan_options(&test_db.pool, Some("standard"))
            .await
            .expect("Failed to get plan options");

        let expected: Vec<_> = all
            .iter()
            .filter(|p| p.option == "standard")
            .cloned()
            .collect();

        assert_eq!(all.len(), 3);
        assert_eq!(standard, expected);

        let none = get_plan_options(&test_db.pool, Some("stand"))
            .await
            .expect("Failed to get plan options");
        assert!(none.is_empty());
    }

    #[rocket::async_test]
    async fn test_assignments_for_site() {
        let test_db = TestDbBuilder::new()
            .site("org1", "HQ")
            .site("org1", "Branch")
            .assign("HQ", "option1")
            .assign("Branch", "option2")
            .assign("HQ", "option3")
            .build()
            .await
            .expect("Failed to build test database");

        let hq = test_db.site_id("HQ").expect("Site not found");

        let assignments = get_assignments_for_site(&test_db.pool, hq)
            .await
            .expect("Failed to get assignments");

        let options: Vec<&str> = assignments.iter().map(|a| a.option.as_str()).collect();
        assert_eq!(options, vec!["option1", "option3"]);
        assert!(assignments.iter().all(|a| a.site_id == hq));

        let unknown = get_assignments_for_site(&test_db.pool, 12345)
            .await
            .expect("Failed to get assignments");
        assert!(unknown.is_empty());
    }

    #[rocket::async_test]
    async fn test_assignment_requires_existing_site() {
        let test_db = TestDbBuilder::new()
            .build()
            .await
            .expect("Failed to build test database");

        let result = create_assignment(
            &test_db.pool,
            &NewAssignment {
                site_id: 42,
                option: "option1".to_string(),
            },
        )
        .await;

        match result {
            Err(AppError::Database(_)) => {}
            other => panic!("Expected foreign key violation, got {:?}", other),
        }

        assert_eq!(test_db.assignment_count().await.unwrap(), 0);
    }
}
