use super::*;
use axum::http::header::SET_COOKIE;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";

#[test]
fn test_sign_verify_roundtrip() {
    let verifier = TokenVerifier::new(SECRET);
    let token = verifier.sign(42).expect("signing should succeed");

    let claims = verifier.verify(&token).expect("valid token should pass");
    assert_eq!(claims.user_id, 42);
}

#[test]
fn test_verify_expired_token() {
    let my_claims = Claims {
        user_id: 42,
        exp: 1, // past
    };

    let token = encode(
        &Header::default(),
        &my_claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let result = TokenVerifier::new(SECRET).verify(&token);
    assert!(result.is_err());
}

#[test]
fn test_verify_wrong_secret() {
    let token = TokenVerifier::new("wrongsecret").sign(42).unwrap();

    let result = TokenVerifier::new(SECRET).verify(&token);
    assert!(result.is_err());
}

#[test]
fn test_verify_garbage_token() {
    let result = TokenVerifier::new(SECRET).verify("not-a-jwt");
    assert!(result.is_err());
}

#[test]
fn test_invalid_token_rejection_clears_session() {
    let response = AuthRejection::invalid_token().into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cleared: Vec<_> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect();
    assert!(
        cleared
            .iter()
            .any(|c| c.starts_with(&format!("{}=", ACCESS_TOKEN_COOKIE)) && c.contains("Max-Age=0"))
    );
    assert!(
        cleared
            .iter()
            .any(|c| c.starts_with(&format!("{}=", REFRESH_TOKEN_COOKIE)) && c.contains("Max-Age=0"))
    );
}

#[test]
fn test_insufficient_rejection_keeps_session() {
    let response = AuthRejection::insufficient().into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
}
