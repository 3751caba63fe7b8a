use super::*;

// =============================================================================
// GitHubProvider::from_env: env manipulation requires unsafe in edition 2024.
// These tests share the GITHUB_* variables, so each one fully resets them.
// =============================================================================

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_github_env() {
    unsafe {
        std::env::remove_var("GITHUB_CLIENT_ID");
        std::env::remove_var("GITHUB_CLIENT_SECRET");
        std::env::remove_var("GITHUB_REDIRECT_URI");
    }
}

#[test]
fn from_env_requires_all_three_variables() {
    unsafe {
        clear_github_env();
        std::env::set_var("GITHUB_CLIENT_ID", "id123");
        std::env::set_var("GITHUB_REDIRECT_URI", "http://localhost/callback");
        std::env::set_var("GITHUB_CLIENT_SECRET", "  ");
    }
    assert!(GitHubProvider::from_env().is_none());

    unsafe { std::env::set_var("GITHUB_CLIENT_SECRET", "secret456") };
    let provider = GitHubProvider::from_env().expect("all set");
    assert_eq!(provider.client_id, "id123");
    assert_eq!(provider.client_secret, "secret456");
    assert_eq!(provider.redirect_uri, "http://localhost/callback");
    unsafe { clear_github_env() };
}

// =============================================================================
// authorize_url
// =============================================================================

fn provider() -> GitHubProvider {
    GitHubProvider::new("my_client".into(), "s".into(), "http://localhost:3000/auth/github/callback".into())
}

#[test]
fn authorize_url_carries_client_id_scope_and_state() {
    let url = provider().authorize_url("abc123").expect("url");
    assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
    assert!(url.contains("client_id=my_client"));
    assert!(url.contains("scope=read%3Auser"));
    assert!(url.contains("state=abc123"));
}

#[test]
fn authorize_url_encodes_redirect_uri() {
    let url = provider().authorize_url("s").expect("url");
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fgithub%2Fcallback"));
}

// =============================================================================
// token response
// =============================================================================

fn token_response(json: &str) -> TokenResponse {
    serde_json::from_str(json).expect("parse")
}

#[test]
fn token_response_yields_access_token() {
    let token = token_response(r#"{"access_token": "gho_abc", "token_type": "bearer"}"#).into_token();
    assert_eq!(token.expect("token"), "gho_abc");
}

#[test]
fn token_response_error_field_is_reported() {
    let err = token_response(r#"{"error": "bad_verification_code", "error_description": "expired"}"#)
        .into_token()
        .expect_err("error");
    assert_eq!(err.to_string(), "github token exchange failed: bad_verification_code: expired");
}

#[test]
fn token_response_without_token_is_rejected() {
    assert!(matches!(token_response("{}").into_token(), Err(AuthError::TokenExchange(_))));
    assert!(matches!(token_response(r#"{"access_token": ""}"#).into_token(), Err(AuthError::TokenExchange(_))));
}

// =============================================================================
// GitHubUser
// =============================================================================

#[test]
fn github_user_deserializes_with_optional_fields_missing() {
    let user: GitHubUser = serde_json::from_str(r#"{"id": 7, "login": "octo"}"#).expect("parse");
    assert_eq!(user.id, 7);
    assert_eq!(user.login, "octo");
    assert!(user.avatar_url.is_none());
}
