//! Sign-in/sign-out over the identity port, plus the read-only pages:
//! homepage hero defaults and the interview feed's derived video fields.

use std::sync::Arc;

use actix_web::{test, App};
use integration_tests::{app_state, memory_store, test_user};
use mg_api::AppState;
use mg_core::traits::DocumentStore;
use mg_core::traits::{IdentityProvider, MockIdentityProvider};
use serde_json::{json, Value};

#[actix_web::test]
async fn sign_in_flow_publishes_the_user() {
    let store = memory_store();
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_sign_in()
        .withf(|code| code == "oauth-code-1")
        .returning(|_| Ok(test_user("discord:42")));
    identity.expect_sign_out().returning(|| Ok(()));
    let identity: Arc<dyn IdentityProvider> = Arc::new(identity);
    let state = actix_web::web::Data::new(AppState::new(store.clone(), identity));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    // Nobody home yet.
    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"], Value::Null);

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({"code": "oauth-code-1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["id"], "discord:42");
    assert_eq!(body["user"]["displayName"], "Evan");

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["id"], "discord:42");

    let req = test::TestRequest::post().uri("/api/auth/signout").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"], Value::Null);
}

#[actix_web::test]
async fn failed_sign_in_is_unauthorized_not_fatal() {
    let store = memory_store();
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_sign_in()
        .returning(|_| Err(anyhow::anyhow!("provider rejected the code")));
    let identity: Arc<dyn IdentityProvider> = Arc::new(identity);
    let state = actix_web::web::Data::new(AppState::new(store.clone(), identity));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({"code": "bad-code"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn home_serves_featured_defaults() {
    let store = memory_store();
    store
        .insert("featured", json!({"name": "DESTIN LAUREL", "album": "MERCY"}))
        .await
        .unwrap();
    let state = app_state(store.clone());

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/home").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["featured"]["name"], "DESTIN LAUREL");
    assert_eq!(body["featured"]["album"], "MERCY");
    // Absent fields arrive substituted, not missing.
    assert_eq!(body["featured"]["year"], "2024");
    assert_eq!(body["featured"]["bio"], "Artist biography");
}

#[actix_web::test]
async fn empty_home_is_null_not_an_error() {
    let store = memory_store();
    let state = app_state(store.clone());
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/home").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["featured"], Value::Null);
}

#[actix_web::test]
async fn interviews_sort_newest_first_with_video_urls() {
    let store = memory_store();
    for (title, date, link) in [
        ("older", "November 2024", "https://youtu.be/h1ptnbNO64k"),
        (
            "newer",
            "December 2024",
            "https://www.youtube.com/watch?v=xsP7EURF1-c",
        ),
        ("unlinked", "October 2024", "not a url"),
    ] {
        store
            .insert(
                "interviews",
                json!({"title": title, "date": date, "link": link, "tags": ["Hip-Hop"]}),
            )
            .await
            .unwrap();
    }
    let state = app_state(store.clone());
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/interviews").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let interviews = body["interviews"].as_array().unwrap();
    let titles: Vec<&str> = interviews
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["newer", "older", "unlinked"]);
    assert_eq!(
        interviews[0]["embedUrl"],
        "https://www.youtube.com/embed/xsP7EURF1-c"
    );
    // The degraded record falls back to its document id.
    assert_eq!(interviews[2]["videoId"], interviews[2]["id"]);
}
