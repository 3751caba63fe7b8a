use super::*;

#[tokio::test]
async fn new_state_has_no_live_subscribers() {
    let state = test_helpers::test_app_state();
    assert_eq!(state.live.subscriber_count(uuid::Uuid::new_v4()).await, 0);
}

#[tokio::test]
async fn cloned_state_shares_live_hub() {
    let state = test_helpers::test_app_state();
    let clone = state.clone();
    let user_id = uuid::Uuid::new_v4();
    let (_id, _rx) = state.live.subscribe(user_id).await;
    assert_eq!(clone.live.subscriber_count(user_id).await, 1);
}

#[tokio::test]
async fn github_disabled_without_config() {
    let state = test_helpers::test_app_state();
    assert!(state.github.is_none());
}

#[tokio::test]
async fn cloned_state_shares_auth_limiter() {
    let state = test_helpers::test_app_state();
    let clone = state.clone();
    for _ in 0..10 {
        assert!(state.auth_limiter.check_and_record("login:shared@example.com").is_ok());
    }
    assert!(clone.auth_limiter.check_and_record("login:shared@example.com").is_err());
}
