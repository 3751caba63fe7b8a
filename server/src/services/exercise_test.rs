use super::*;

#[test]
fn clean_def_trims_fields() {
    let def = clean_def(&ExerciseDef::new("  Zercher Squat ", " Legs", "Quads  ")).expect("valid");
    assert_eq!(def, ExerciseDef::new("Zercher Squat", "Legs", "Quads"));
}

#[test]
fn clean_def_rejects_blank_fields() {
    assert!(matches!(clean_def(&ExerciseDef::new("   ", "Legs", "Quads")), Err(ExerciseError::MissingField)));
    assert!(matches!(clean_def(&ExerciseDef::new("Squat", "", "Quads")), Err(ExerciseError::MissingField)));
    assert!(matches!(clean_def(&ExerciseDef::new("Squat", "Legs", "\t")), Err(ExerciseError::MissingField)));
}

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;

    async fn pool_and_user() -> (PgPool, Uuid) {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL required");
        let pool = crate::db::init_pool(&url, 2).await.expect("pool");
        let email = format!("exercises-{}@example.com", Uuid::new_v4());
        let user = crate::services::credentials::register(&pool, &email, "password1")
            .await
            .expect("register");
        (pool, user.id)
    }

    #[tokio::test]
    async fn create_list_delete() {
        let (pool, user_id) = pool_and_user().await;
        let created = create_exercise(&pool, user_id, &ExerciseDef::new("Sled Push", "Full Body", "Legs"))
            .await
            .expect("create");
        assert_eq!(list_exercises(&pool, user_id).await.expect("list"), vec![created.clone()]);

        delete_exercise(&pool, user_id, created.id).await.expect("delete");
        assert!(list_exercises(&pool, user_id).await.expect("list").is_empty());
        assert!(matches!(delete_exercise(&pool, user_id, created.id).await, Err(ExerciseError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected_case_insensitively() {
        let (pool, user_id) = pool_and_user().await;
        create_exercise(&pool, user_id, &ExerciseDef::new("Sled Push", "Full Body", "Legs"))
            .await
            .expect("create");
        let dup = create_exercise(&pool, user_id, &ExerciseDef::new("sled push", "Legs", "Legs")).await;
        assert!(matches!(dup, Err(ExerciseError::Duplicate(_))));
    }
}
