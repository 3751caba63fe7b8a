use super::*;
use crate::services::storage::MemoryObjectStore;

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[test]
fn picture_url_includes_key_and_tag() {
    assert_eq!(
        picture_url("https://lift.example", "abc.png", "0123456789ab"),
        "https://lift.example/uploads/abc.png?v=0123456789ab"
    );
}

#[test]
fn clean_name_trims_and_bounds_length() {
    assert_eq!(clean_name("  Coach Carter ").expect("valid"), "Coach Carter");
    assert!(matches!(clean_name("   "), Err(AccountError::InvalidName)));
    assert!(matches!(clean_name(&"x".repeat(MAX_NAME_LEN + 1)), Err(AccountError::InvalidName)));
    assert!(clean_name(&"x".repeat(MAX_NAME_LEN)).is_ok());
}

#[tokio::test]
async fn set_picture_rejects_bad_upload_before_touching_storage() {
    let state = crate::state::test_helpers::test_app_state();
    let store = MemoryObjectStore::default();
    let result = set_picture(&state.pool, &store, "http://x", 1024, Uuid::new_v4(), b"plain text").await;
    assert!(matches!(result, Err(AccountError::Storage(StorageError::UnsupportedType))));
    assert!(store.objects.lock().await.is_empty());
}

#[tokio::test]
async fn set_picture_rejects_oversized_upload() {
    let state = crate::state::test_helpers::test_app_state();
    let store = MemoryObjectStore::default();
    let mut bytes = PNG_HEADER.to_vec();
    bytes.resize(64, 0);
    let result = set_picture(&state.pool, &store, "http://x", 32, Uuid::new_v4(), &bytes).await;
    assert!(matches!(result, Err(AccountError::Storage(StorageError::TooLarge { size: 64, max: 32 }))));
}

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::services::{credentials, exercise, template, workout};
    use records::{ExerciseDef, NewWorkout, TemplateInput};

    async fn pool() -> PgPool {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL required");
        crate::db::init_pool(&url, 2).await.expect("pool")
    }

    async fn seeded_user(pool: &PgPool) -> Uuid {
        let email = format!("account-{}@example.com", Uuid::new_v4());
        let user = credentials::register(pool, &email, "password1").await.expect("register");
        for _ in 0..2 {
            let new = NewWorkout { id: Uuid::new_v4(), duration: "00:10:00".into(), exercises: vec![] };
            workout::create_workout(pool, user.id, new).await.expect("workout");
        }
        exercise::create_exercise(pool, user.id, &ExerciseDef::new("Sled Push", "Full Body", "Legs"))
            .await
            .expect("exercise");
        let input = TemplateInput { name: "A".into(), exercises: vec![ExerciseDef::new("Squat", "Legs", "Legs")] };
        template::create_template(pool, user.id, &input).await.expect("template");
        user.id
    }

    #[tokio::test]
    async fn delete_removes_every_document_and_the_identity() {
        let pool = pool().await;
        let store = MemoryObjectStore::default();
        let user_id = seeded_user(&pool).await;
        let token = session::create_session(&pool, user_id, 1).await.expect("session");
        let ticket = session::create_ticket(&pool, TicketKind::Reauth, user_id).await.expect("ticket");

        let counts = delete_account(&pool, &store, user_id, &ticket).await.expect("delete");
        assert_eq!(counts, DeletedCounts { workouts: 2, exercises: 1, templates: 1 });
        assert!(session::validate_session(&pool, &token).await.expect("validate").is_none());
        let left: i64 = sqlx::query_scalar("SELECT count(*) FROM workouts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn bad_ticket_deletes_nothing() {
        let pool = pool().await;
        let store = MemoryObjectStore::default();
        let user_id = seeded_user(&pool).await;

        let result = delete_account(&pool, &store, user_id, "not-a-ticket").await;
        assert!(matches!(result, Err(AccountError::ReauthRequired)));
        let page = workout::list_workouts(&pool, user_id, workout::WorkoutPage::default()).await.expect("list");
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn ticket_of_another_user_is_rejected() {
        let pool = pool().await;
        let store = MemoryObjectStore::default();
        let victim = seeded_user(&pool).await;
        let attacker = seeded_user(&pool).await;
        let ticket = session::create_ticket(&pool, TicketKind::Reauth, attacker).await.expect("ticket");
        assert!(matches!(delete_account(&pool, &store, victim, &ticket).await, Err(AccountError::ReauthRequired)));
    }
}
