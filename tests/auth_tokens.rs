mod common;

use bookshare_api::{
    error::AppError,
    middleware::auth::{auth_user_from_header, decode_access_token, ensure_admin},
    models::Role,
    services::auth_service::{hash_password, issue_access_token, verify_password},
};

use common::test_config;

#[test]
fn issued_token_carries_id_and_role() {
    let config = test_config("postgres://unused");
    let token = issue_access_token(&config, "users-abc", Role::Admin).unwrap();

    let claims = decode_access_token(&config, &token).unwrap();
    assert_eq!(claims.id, "users-abc");
    assert_eq!(claims.role, "admin");
    assert_eq!(claims.exp - claims.iat, 3600);

    let header = format!("Bearer {token}");
    let user = auth_user_from_header(&config, Some(&header)).unwrap();
    assert_eq!(user.id, "users-abc");
    assert!(user.is_admin());
}

#[test]
fn token_signed_with_another_key_is_rejected() {
    let config = test_config("postgres://unused");
    let mut other = config.clone();
    other.access_token_key = "different-secret".to_string();
    let token = issue_access_token(&other, "users-abc", Role::User).unwrap();

    assert!(matches!(
        decode_access_token(&config, &token),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn missing_or_malformed_header_is_unauthorized() {
    let config = test_config("postgres://unused");
    assert!(matches!(
        auth_user_from_header(&config, None),
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        auth_user_from_header(&config, Some("Basic abc")),
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        auth_user_from_header(&config, Some("Bearer not-a-jwt")),
        Err(AppError::Unauthorized(_))
    ));
}

#[test]
fn regular_user_is_not_admin() {
    let config = test_config("postgres://unused");
    let token = issue_access_token(&config, "users-xyz", Role::User).unwrap();
    let user = auth_user_from_header(&config, Some(&format!("Bearer {token}"))).unwrap();
    assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden(_))));
}

#[test]
fn password_hash_verifies_only_the_original() {
    let hash = hash_password("rahasia123").unwrap();
    assert_ne!(hash, "rahasia123");
    assert!(verify_password("rahasia123", &hash).unwrap());
    assert!(!verify_password("salah", &hash).unwrap());
}
