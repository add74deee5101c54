//! Login, refresh, logout, and `me` over the real routing table.

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::TimeDelta;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{
    SEED_EMAIL, api_app, login_request, seed_user, session_cookie, test_state,
};

#[rstest]
#[actix_web::test]
async fn login_returns_the_user_and_sets_a_cookie() {
    let (state, _clock) = test_state();
    let user = seed_user(&state).await;
    let app = api_app!(state.clone());

    let res = test::call_service(&app, login_request().to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(session_cookie(&res).is_some());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["email"], SEED_EMAIL);
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("passwordHash").is_none());
}

#[rstest]
#[case("ada@example.com", "wrong password")]
#[case("nobody@example.com", "correct horse")]
#[actix_web::test]
async fn bad_credentials_are_indistinguishable(#[case] email: &str, #[case] password: &str) {
    let (state, _clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&res).is_none());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[case(json!({ "email": "not-an-email", "password": "pw" }), "email")]
#[case(json!({ "email": "ada@example.com", "password": "" }), "password")]
#[actix_web::test]
async fn malformed_login_reports_the_field(#[case] payload: Value, #[case] field: &str) {
    let (state, _clock) = test_state();
    let app = api_app!(state.clone());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn unparseable_json_is_a_bad_request_envelope() {
    let (state, _clock) = test_state();
    let app = api_app!(state.clone());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
}

#[rstest]
#[actix_web::test]
async fn me_requires_a_session() {
    let (state, _clock) = test_state();
    let app = api_app!(state.clone());

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/auth/me").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Authentication required");
}

#[rstest]
#[actix_web::test]
async fn me_returns_the_signed_in_user() {
    let (state, _clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());
    let login = test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Current user");
    assert_eq!(body["data"]["email"], SEED_EMAIL);
}

#[rstest]
#[actix_web::test]
async fn refresh_reopens_an_expired_access_window() {
    let (state, clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());
    let login = test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    clock.advance(TimeDelta::minutes(20));
    let expired = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);

    let refreshed = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/refresh")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(refreshed.status(), StatusCode::OK);
    let renewed = session_cookie(&refreshed).expect("renewed cookie");
    let body: Value = test::read_body_json(refreshed).await;
    assert_eq!(body["message"], "Session refreshed");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(renewed)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn refresh_after_the_refresh_window_clears_the_session() {
    let (state, clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());
    let login = test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    clock.advance(TimeDelta::days(8));
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/refresh")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let removal = session_cookie(&res).expect("removal cookie");
    assert_eq!(removal.value(), "");
}

#[rstest]
#[actix_web::test]
async fn refresh_without_a_session_is_unauthorised() {
    let (state, _clock) = test_state();
    let app = api_app!(state.clone());

    let res = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/refresh").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn logout_acknowledges_and_expires_the_cookie() {
    let (state, _clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());
    let login = test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(session_cookie(&res).map(|c| c.value().to_owned()), Some(String::new()));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "success": true, "message": "Logged out", "data": null }));
}
