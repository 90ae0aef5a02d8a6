//! End-to-end fan-ranking scenario: an anonymous visitor cannot submit, a
//! signed-in user with no prior ranking can, and one successful submission
//! closes the door again without a page reload.

use actix_web::{test, App};
use integration_tests::{app_state, memory_store, seed_nominees, test_user};
use mg_core::traits::DocumentStore;
use serde_json::{json, Value};

#[actix_web::test]
async fn ranking_flow_end_to_end() {
    let store = memory_store();
    let nominee_ids = seed_nominees(store.as_ref()).await;
    let state = app_state(store.clone());

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    // Anonymous visitor: the page loads, but submitting is off the table.
    let req = test::TestRequest::get().uri("/api/fan-ranking").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["canSubmit"], false);
    assert_eq!(page["user"], Value::Null);
    assert_eq!(page["nominees"].as_array().unwrap().len(), 5);

    let submission = json!({ "selections": nominee_ids });
    let req = test::TestRequest::post()
        .uri("/api/fan-ranking")
        .set_json(&submission)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // The identity-provider callback supplies a user with no prior records.
    state.auth.set(test_user("discord:42"));

    let req = test::TestRequest::get().uri("/api/fan-ranking").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["canSubmit"], true);
    assert_eq!(page["month"].as_str().unwrap().is_empty(), false);

    // Submit: five picks in preference order.
    let req = test::TestRequest::post()
        .uri("/api/fan-ranking")
        .set_json(&submission)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["canSubmit"], false);

    // The merged entry is pending, first in the feed, and carries exactly
    // five distinct ranks 1..=5 in selection order.
    let merged = &body["rankings"][0];
    assert_eq!(merged["provenance"], "pending");
    assert_eq!(merged["userId"], "discord:42");
    let rankings = merged["rankings"].as_array().unwrap();
    assert_eq!(rankings.len(), 5);
    let ranks: Vec<i64> = rankings.iter().map(|r| r["rank"].as_i64().unwrap()).collect();
    assert_eq!(ranks, [1, 2, 3, 4, 5]);
    assert_eq!(rankings[0]["name"], "Lelo");

    // A second attempt is rejected as a duplicate, not an error page.
    let req = test::TestRequest::post()
        .uri("/api/fan-ranking")
        .set_json(&submission)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // A fresh page read confirms the entry from the store and still says no.
    let req = test::TestRequest::get().uri("/api/fan-ranking").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["canSubmit"], false);
    assert_eq!(page["rankings"][0]["provenance"], "fetched");
}

#[actix_web::test]
async fn incomplete_selection_is_rejected() {
    let store = memory_store();
    let nominee_ids = seed_nominees(store.as_ref()).await;
    let state = app_state(store.clone());
    state.auth.set(test_user("discord:7"));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/fan-ranking")
        .set_json(json!({ "selections": &nominee_ids[..3] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);

    let req = test::TestRequest::post()
        .uri("/api/fan-ranking")
        .set_json(json!({ "selections": ["missing-nominee", "x", "y", "z", "w"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);
}

#[actix_web::test]
async fn duplicate_guard_spans_months() {
    let store = memory_store();
    let nominee_ids = seed_nominees(store.as_ref()).await;

    // A ranking from a long-gone month, same user.
    store
        .insert(
            "fanrankings",
            json!({
                "userId": "discord:42",
                "userName": "Evan",
                "rankings": [],
                "month": "January 2023",
                "createdAt": "2023-01-15T00:00:00+00:00",
                "likes": 0
            }),
        )
        .await
        .unwrap();

    let state = app_state(store.clone());
    state.auth.set(test_user("discord:42"));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(mg_api::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/fan-ranking").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["canSubmit"], false);

    let req = test::TestRequest::post()
        .uri("/api/fan-ranking")
        .set_json(json!({ "selections": nominee_ids }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}
