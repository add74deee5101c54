//! Users routes over in-memory repositories.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{
    api_app, login_request, seed_user, session_cookie, test_state,
};

#[rstest]
fn list_params_fall_back_to_defaults() {
    let query = UserListQuery::try_from(UserListParams {
        page: Some("-3".to_owned()),
        limit: Some("abc".to_owned()),
        role: Some(" ".to_owned()),
        q: Some("  ".to_owned()),
    })
    .expect("lenient params");

    assert_eq!(query, UserListQuery::default());
}

#[rstest]
fn unknown_role_filter_is_rejected() {
    let error = UserListQuery::try_from(UserListParams {
        role: Some("owner".to_owned()),
        ..UserListParams::default()
    })
    .expect_err("unknown role");

    assert_eq!(error.field_errors()[0].field.as_deref(), Some("role"));
}

#[rstest]
fn create_body_reports_every_invalid_field() {
    let error = NewUser::try_from(CreateUserRequest {
        email: "nope".to_owned(),
        name: String::new(),
        password: "short".to_owned(),
        role: Some("root".to_owned()),
        avatar: None,
    })
    .expect_err("invalid body");

    let fields: Vec<_> = error
        .field_errors()
        .iter()
        .filter_map(|e| e.field.as_deref())
        .collect();
    assert_eq!(fields, ["email", "name", "password", "role"]);
}

#[rstest]
fn user_dto_serialises_camel_case_without_secrets() {
    let user = User {
        id: crate::domain::UserId::random(),
        email: Email::new("ada@example.com").expect("email"),
        name: UserName::new("Ada").expect("name"),
        role: UserRole::Editor,
        avatar: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };

    let json = serde_json::to_value(UserDto::from(user)).expect("serialise");

    assert_eq!(json["role"], "editor");
    assert!(json.get("createdAt").is_some());
    assert!(json.get("password").is_none());
}

#[rstest]
#[case(actix_test::TestRequest::get().uri("/api/users"))]
#[case(actix_test::TestRequest::post().uri("/api/users").set_json(json!({})))]
#[case(actix_test::TestRequest::delete().uri("/api/users/3fa85f64-5717-4562-b3fc-2c963f66afa6"))]
#[actix_web::test]
async fn every_route_requires_a_session(#[case] request: actix_test::TestRequest) {
    let (state, _clock) = test_state();
    let app = api_app!(state.clone());

    let res = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn crud_round_trip() {
    let (state, _clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());
    let login = actix_test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let created = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie.clone())
            .set_json(json!({
                "email": "grace@example.com",
                "name": "Grace Hopper",
                "password": "cobol-forever",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(created).await;
    assert_eq!(body["data"]["role"], "user");
    let id = body["data"]["id"].as_str().expect("id").to_owned();

    let updated = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/users/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "role": "editor" }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(updated).await;
    assert_eq!(body["data"]["role"], "editor");
    assert_eq!(body["data"]["name"], "Grace Hopper");

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users?role=editor")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(listed).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], id.as_str());

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/users/{id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(deleted).await;
    assert_eq!(body["message"], "User deleted");

    let gone = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/users/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(gone).await;
    assert_eq!(body["message"], "User not found");
}

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_conflict_on_the_email_field() {
    let (state, _clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());
    let login = actix_test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .cookie(cookie)
            .set_json(json!({
                "email": "ada@example.com",
                "name": "Someone Else",
                "password": "long enough",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Email already exists");
    assert_eq!(body["errors"][0]["field"], "email");
}

#[rstest]
#[actix_web::test]
async fn malformed_id_is_a_bad_request() {
    let (state, _clock) = test_state();
    seed_user(&state).await;
    let app = api_app!(state.clone());
    let login = actix_test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/not-a-uuid")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["field"], "id");
}

#[rstest]
#[actix_web::test]
async fn list_is_paginated_with_defaults() {
    let (state, _clock) = test_state();
    seed_user(&state).await;
    for n in 0..11 {
        let new_user = crate::domain::test_support::new_user(&format!("u{n}@example.com"), "User");
        state.users.create(&new_user).await.expect("seed");
    }
    let app = api_app!(state.clone());
    let login = actix_test::call_service(&app, login_request().to_request()).await;
    let cookie = session_cookie(&login).expect("session cookie");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users?page=2")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body["meta"],
        json!({ "page": 2, "limit": 10, "total": 12, "totalPages": 2 })
    );
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
}
