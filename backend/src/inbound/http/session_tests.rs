//! Cookie round-trips for [`SessionContext`].

use super::*;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test, web};
use chrono::TimeDelta;
use rstest::rstest;

use crate::domain::SessionPolicy;
use crate::inbound::http::test_utils::{fixed_now, test_session_middleware};

const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn user_id() -> UserId {
    UserId::new(USER).expect("fixture id")
}

async fn set_grant(session: SessionContext) -> Result<HttpResponse, Error> {
    let grant = SessionPolicy::default().issue(user_id(), fixed_now());
    session.persist_grant(&grant)?;
    Ok(HttpResponse::Ok().finish())
}

async fn require_at(
    session: SessionContext,
    offset: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let now = fixed_now() + TimeDelta::seconds(offset.into_inner());
    let id = session.require_user(now)?;
    Ok(HttpResponse::Ok().body(id.to_string()))
}

async fn purge(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().finish()
}

macro_rules! session_app {
    () => {
        test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/set", web::get().to(set_grant))
                .route("/require/{offset}", web::get().to(require_at))
                .route("/purge", web::get().to(purge))
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session.insert(USER_ID_KEY, "not-a-uuid").expect("user id");
                        session.insert(ACCESS_EXP_KEY, i64::MAX).expect("access");
                        session.insert(REFRESH_EXP_KEY, i64::MAX).expect("refresh");
                        HttpResponse::Ok().finish()
                    }),
                ),
        )
        .await
    };
}

fn session_cookie(res: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

#[rstest]
#[actix_web::test]
async fn round_trips_the_grant() {
    let app = session_app!();

    let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
    assert_eq!(set.status(), StatusCode::OK);
    let cookie = session_cookie(&set);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/require/60")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, USER);
}

#[rstest]
#[actix_web::test]
async fn missing_session_is_unauthorised() {
    let app = session_app!();

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/require/0").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["message"], AUTH_REQUIRED);
}

#[rstest]
#[actix_web::test]
async fn expired_access_window_is_unauthorised() {
    let app = session_app!();
    let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
    let cookie = session_cookie(&set);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/require/900")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["message"], ACCESS_EXPIRED);
}

#[rstest]
#[actix_web::test]
async fn tampered_user_id_is_unauthorised() {
    let app = session_app!();
    let set = test::call_service(
        &app,
        test::TestRequest::get().uri("/set-invalid").to_request(),
    )
    .await;
    let cookie = session_cookie(&set);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/require/0")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn purge_expires_the_cookie() {
    let app = session_app!();
    let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
    let cookie = session_cookie(&set);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/purge")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let removal = session_cookie(&res);
    assert_eq!(removal.value(), "");
}
