// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end data flows through the API over the in-memory store.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use speech_planning::models::UserRole;

mod common;

fn ids(body: &Value, field: &str) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item[field].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_district_congregation_speaker_flow() {
    let (app, state, _) = common::create_test_app();
    let admin = common::seed_user(&state, "admin", UserRole::Admin, true).await;
    let token = Some(admin.as_str());

    let (status, _) = common::send(
        &app,
        Method::PUT,
        "/api/districts/D1",
        token,
        Some(json!({"name": "Kreis Eins"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, congregation) = common::send(
        &app,
        Method::POST,
        "/api/districts/D1/congregations",
        token,
        Some(json!({"name": "Mitte", "meetingTime": "So 10:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(congregation["districtId"], "D1");
    assert_eq!(congregation["active"], true);
    let c1 = congregation["id"].as_str().unwrap().to_string();

    let (status, speaker) = common::send(
        &app,
        Method::POST,
        &format!("/api/districts/D1/congregations/{c1}/speakers"),
        token,
        Some(json!({"firstName": "Max", "lastName": "Muster", "speechNumberIds": ["12"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let s1 = speaker["id"].as_str().unwrap().to_string();

    // Move to another district's congregation
    let (status, moved) = common::send(
        &app,
        Method::POST,
        &format!("/api/districts/D1/congregations/{c1}/speakers/{s1}/move"),
        token,
        Some(json!({"districtId": "D2", "congregationId": "C9"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["id"], s1.as_str());
    assert_eq!(moved["speechNumberIds"], json!(["12"]));

    let (status, _) = common::send(
        &app,
        Method::GET,
        &format!("/api/districts/D1/congregations/{c1}/speakers/{s1}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = common::send(&app, Method::GET, "/api/speakers", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["congregationId"], "C9");
    assert_eq!(body[0]["districtId"], "D2");

    let (status, _) = common::send(
        &app,
        Method::DELETE,
        &format!("/api/districts/D2/congregations/C9/speakers/{s1}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = common::send(&app, Method::GET, "/api/speakers", token, None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let (app, state, store) = common::create_test_app();
    let admin = common::seed_user(&state, "admin", UserRole::Admin, true).await;
    let before = store.operation_count();

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/api/districts",
        Some(&admin),
        Some(json!({"name": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/districts/D1/congregations/C1/speakers",
        Some(&admin),
        Some(json!({"firstName": "Ohne Nachname"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Only the auth middleware's user lookups touched the store
    assert_eq!(store.operation_count() - before, 2);
}

#[tokio::test]
async fn test_speeches_sorted_and_non_numeric_fails() {
    let (app, state, _) = common::create_test_app();
    let planner = common::seed_user(&state, "planner", UserRole::SpeakingPlaner, true).await;
    let token = Some(planner.as_str());

    for number in ["100", "9", "25"] {
        let (status, _) = common::send(
            &app,
            Method::POST,
            "/api/speeches",
            token,
            Some(json!({"number": number, "subject": format!("Thema {number}")})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = common::send(&app, Method::GET, "/api/speeches", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body, "number"), vec!["9", "25", "100"]);

    let (status, _) = common::send(
        &app,
        Method::PUT,
        "/api/speeches/9",
        token,
        Some(json!({"number": "10", "subject": "Umnummeriert"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(
        &app,
        Method::POST,
        "/api/speeches",
        token,
        Some(json!({"number": "12a", "subject": "Kaputt"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::send(&app, Method::GET, "/api/speeches", token, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_data");

    let (status, _) = common::send(&app, Method::DELETE, "/api/speeches/12a", token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = common::send(&app, Method::GET, "/api/speeches", token, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_events_sorted_by_date() {
    let (app, state, _) = common::create_test_app();
    let planner = common::seed_user(&state, "planner", UserRole::SpeakingPlaner, true).await;
    let token = Some(planner.as_str());
    let base = "/api/districts/D1/congregations/C1/events";

    for date in ["2026-06-07", "2026-01-11"] {
        let (status, body) = common::send(
            &app,
            Method::POST,
            base,
            token,
            Some(json!({
                "dateString": date,
                "eventType": "SPECIAL_LECTURE",
                "speechNumber": "12",
                "speakerName": "Max Muster"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["congregationId"], "C1");
    }

    let (status, body) = common::send(
        &app,
        Method::POST,
        base,
        token,
        Some(json!({"dateString": "2024-13-45", "eventType": "MEMORIAL"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = common::send(&app, Method::GET, base, token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body, "dateString"), vec!["2026-01-11", "2026-06-07"]);

    let first = body[0]["id"].as_str().unwrap().to_string();
    let (status, event) =
        common::send(&app, Method::GET, &format!("{base}/{first}"), token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["eventType"], "SPECIAL_LECTURE");

    let (status, body) = common::send(&app, Method::GET, "/api/events", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_store_outage_is_database_error() {
    let (app, state, store) = common::create_test_app();
    let planner = common::seed_user(&state, "planner", UserRole::SpeakingPlaner, true).await;
    store.fail_with("offline");

    let (status, body) =
        common::send(&app, Method::GET, "/api/speeches", Some(&planner), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "database_error");
}
