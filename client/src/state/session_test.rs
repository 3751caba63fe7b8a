use super::*;
use crate::storage::MemoryStore;
use uuid::Uuid;

fn session() -> Session {
    Session {
        user: User {
            id: Uuid::new_v4(),
            email: Some("lifter@example.com".into()),
            name: "lifter".into(),
            avatar_url: None,
            auth_method: "password".into(),
        },
        token: "tok".into(),
    }
}

#[test]
fn sign_in_persists_and_reloads() {
    let mut store = MemoryStore::new();
    let mut state = SessionState::load(&store);
    assert!(state.current().is_none());

    state.sign_in(&mut store, session()).expect("sign in");
    let reloaded = SessionState::load(&store);
    assert_eq!(reloaded.token(), Some("tok"));
    assert_eq!(reloaded.user().map(|u| u.name.as_str()), Some("lifter"));
}

#[test]
fn update_user_keeps_token() {
    let mut store = MemoryStore::new();
    let mut state = SessionState::default();
    let s = session();
    state.sign_in(&mut store, s.clone()).expect("sign in");

    let renamed = User { name: "Coach".into(), ..s.user };
    state.update_user(&mut store, renamed).expect("update");
    let reloaded = SessionState::load(&store);
    assert_eq!(reloaded.token(), Some("tok"));
    assert_eq!(reloaded.user().map(|u| u.name.as_str()), Some("Coach"));
}

#[test]
fn sign_out_removes_persisted_session() {
    let mut store = MemoryStore::new();
    let mut state = SessionState::default();
    state.sign_in(&mut store, session()).expect("sign in");
    state.sign_out(&mut store).expect("sign out");
    assert!(state.current().is_none());
    assert!(!store.contains(SESSION_KEY));
}
