//! Camera, film stock and film roll CRUD, ownership scoping and population.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, create_stock, delete, get, id_of, post, put, signup};
use serde_json::json;

#[tokio::test]
async fn camera_round_trip() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;

    let (status, created) = post(
        &app,
        "/api/cameras",
        &token,
        json!({ "make": "Nikon", "name": "F3", "format": "35mm", "notes": "  HP finder " }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["make"], "Nikon");
    assert_eq!(created["notes"], "HP finder");
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());

    let id = id_of(&created);
    let (status, fetched) = get(&app, &format!("/api/cameras/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, again) = get(&app, &format!("/api/cameras/{id}"), &token).await;
    assert_eq!(again, fetched);
}

#[tokio::test]
async fn cameras_are_listed_by_make_and_name() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;

    for (make, name) in [("Pentax", "67"), ("Leica", "M6"), ("Leica", "M3")] {
        let (status, _) = post(&app, "/api/cameras", &token, json!({ "make": make, "name": name })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = get(&app, "/api/cameras", &token).await;
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| format!("{} {}", c["make"].as_str().unwrap(), c["name"].as_str().unwrap()))
        .collect();
    assert_eq!(names, vec!["Leica M3", "Leica M6", "Pentax 67"]);
}

#[tokio::test]
async fn enumerations_outside_the_set_are_rejected() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;

    let (status, body) = post(
        &app,
        "/api/cameras",
        &token,
        json!({ "make": "Mamiya", "name": "7", "format": "6x7" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("format"));

    let (status, body) = post(
        &app,
        "/api/film-stocks",
        &token,
        json!({ "make": "Kodak", "name": "Ektar", "type": "colour" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("type"));
}

#[tokio::test]
async fn update_and_delete_film_stock() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;
    let id = create_stock(&app, &token).await;

    let (status, updated) = put(
        &app,
        &format!("/api/film-stocks/{id}"),
        &token,
        json!({ "make": "Kodak", "name": "Portra 800", "iso": 800 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Portra 800");
    assert_eq!(updated["iso"], 800);
    assert!(updated["format"].is_null());

    let (status, body) = delete(&app, &format!("/api/film-stocks/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Film stock deleted");

    let (status, body) = get(&app, &format!("/api/film-stocks/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Film stock not found");
}

#[tokio::test]
async fn records_are_invisible_to_other_identities() {
    let app = build_test_app();
    let alice = signup(&app, "alice@x.com").await;
    let bob = signup(&app, "bob@x.com").await;

    let (_, camera) = post(&app, "/api/cameras", &alice, json!({ "make": "Nikon", "name": "FM2" })).await;
    let id = id_of(&camera);
    let uri = format!("/api/cameras/{id}");

    let (_, list) = get(&app, "/api/cameras", &bob).await;
    assert_eq!(list, json!([]));

    let (status, _) = get(&app, &uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = put(&app, &uri, &bob, json!({ "make": "Canon", "name": "F-1" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete(&app, &uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Same answer as for an id that never existed.
    let (status, body) = get(&app, "/api/cameras/not-even-a-uuid", &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Camera not found");

    let (status, still_there) = get(&app, &uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there["name"], "FM2");
}

#[tokio::test]
async fn roll_embeds_its_film_stock() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;
    let stock_id = create_stock(&app, &token).await;

    let (status, roll) = post(
        &app,
        "/api/film-rolls",
        &token,
        json!({ "filmStock": stock_id, "frameCount": 36 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(roll["filmStock"]["_id"], stock_id.as_str());
    assert_eq!(roll["filmStock"]["name"], "Portra 400");
    assert_eq!(roll["filmStock"]["iso"], 400);
    assert!(roll["camera"].is_null());
    assert!(roll["chemicalBatch"].is_null());
    assert_eq!(roll["status"], "loaded");
    assert_eq!(roll["frameCount"], 36);

    let (_, listed) = get(&app, "/api/film-rolls", &token).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["filmStock"]["make"], "Kodak");
}

#[tokio::test]
async fn roll_with_zero_frames_is_rejected() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;
    let stock_id = create_stock(&app, &token).await;

    let (status, body) = post(
        &app,
        "/api/film-rolls",
        &token,
        json!({ "filmStock": stock_id, "frameCount": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("frameCount"));
}

#[tokio::test]
async fn roll_references_must_be_owned() {
    let app = build_test_app();
    let alice = signup(&app, "alice@x.com").await;
    let bob = signup(&app, "bob@x.com").await;
    let alices_stock = create_stock(&app, &alice).await;

    let (status, body) = post(&app, "/api/film-rolls", &bob, json!({ "filmStock": alices_stock })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("filmStock"));

    let bobs_stock = create_stock(&app, &bob).await;
    let (_, camera) = post(&app, "/api/cameras", &alice, json!({ "make": "Nikon", "name": "F" })).await;
    let (status, body) = post(
        &app,
        "/api/film-rolls",
        &bob,
        json!({ "filmStock": bobs_stock, "camera": id_of(&camera) }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("camera"));
}

#[tokio::test]
async fn rolls_filter_by_status_and_update() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;
    let stock_id = create_stock(&app, &token).await;
    let (_, camera) = post(&app, "/api/cameras", &token, json!({ "make": "Nikon", "name": "F2" })).await;

    let (_, roll) = post(&app, "/api/film-rolls", &token, json!({ "filmStock": stock_id })).await;
    post(&app, "/api/film-rolls", &token, json!({ "filmStock": stock_id, "status": "shot" })).await;

    let (status, updated) = put(
        &app,
        &format!("/api/film-rolls/{}", id_of(&roll)),
        &token,
        json!({
            "filmStock": stock_id,
            "camera": id_of(&camera),
            "status": "developed",
            "frameCount": 24,
            "dateLoaded": "2024-05-01",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["camera"]["name"], "F2");
    assert_eq!(updated["frameCount"], 24);
    assert!(updated["dateLoaded"].as_str().unwrap().starts_with("2024-05-01T00:00:00"));

    let (_, developed) = get(&app, "/api/film-rolls?status=developed", &token).await;
    assert_eq!(developed.as_array().unwrap().len(), 1);
    assert_eq!(developed[0]["_id"], id_of(&roll).as_str());

    let (_, all) = get(&app, "/api/film-rolls", &token).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    // Newest first.
    assert_eq!(all[0]["status"], "shot");

    let (status, _) = get(&app, "/api/film-rolls?status=lost", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_stock_leaves_rolls_dangling() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;
    let stock_id = create_stock(&app, &token).await;
    let (_, roll) = post(&app, "/api/film-rolls", &token, json!({ "filmStock": stock_id })).await;

    let (status, _) = delete(&app, &format!("/api/film-stocks/{stock_id}"), &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = get(&app, &format!("/api/film-rolls/{}", id_of(&roll)), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fetched["filmStock"].is_null());

    let (status, body) = delete(&app, &format!("/api/film-rolls/{}", id_of(&roll)), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Film roll deleted");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;

    let (status, body) = post(&app, "/api/film-stocks", &token, json!({ "make": "Kodak", "name": "Gold", "iso": "fast" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn rolls_are_invisible_to_other_identities() {
    let app = build_test_app();
    let alice = signup(&app, "alice@x.com").await;
    let bob = signup(&app, "bob@x.com").await;
    let alices_stock = create_stock(&app, &alice).await;
    let bobs_stock = create_stock(&app, &bob).await;

    let (_, roll) = post(&app, "/api/film-rolls", &alice, json!({ "filmStock": alices_stock })).await;
    let uri = format!("/api/film-rolls/{}", id_of(&roll));

    let (status, body) = get(&app, &uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Film roll not found");

    let (status, _) = put(&app, &uri, &bob, json!({ "filmStock": bobs_stock, "status": "shot" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete(&app, &uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = get(&app, "/api/film-rolls", &bob).await;
    assert_eq!(list, json!([]));

    let (status, untouched) = get(&app, &uri, &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(untouched["status"], "loaded");
    assert_eq!(untouched["filmStock"]["_id"], alices_stock.as_str());
}

#[tokio::test]
async fn oversized_frame_count_is_reported_as_too_large() {
    let app = build_test_app();
    let token = signup(&app, "a@x.com").await;
    let stock_id = create_stock(&app, &token).await;

    let (status, body) = post(
        &app,
        "/api/film-rolls",
        &token,
        json!({ "filmStock": stock_id, "frameCount": 5_000_000_000_i64 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("frameCount: must be at most"), "{message}");
    assert!(!message.contains("at least 1"));
}
