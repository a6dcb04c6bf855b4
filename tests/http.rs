mod common;

use axum::{body::Bytes, http::StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use seat_reservation::app;

fn server() -> TestServer {
    TestServer::new(app(common::offline_state())).unwrap()
}

fn assert_validation_error(body: &Value, message: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["type"], "ValidationError");
    assert_eq!(body["error"]["message"], message);
}

#[tokio::test]
async fn health_reports_liveness() {
    let response = server().get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "seat-reservation-api");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn reserve_rejects_non_positive_event_id() {
    let server = server();

    for event_id in [0, -5] {
        let response = server
            .post("/api/bookings/reserve")
            .json(&json!({ "event_id": event_id, "user_id": "john.doe@example.com" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_validation_error(
            &response.json(),
            "Invalid input: Event ID must be a positive integer",
        );
    }
}

#[tokio::test]
async fn reserve_rejects_user_id_outside_bounds() {
    let server = server();

    for (user_id, message) in [
        (String::new(), "Invalid input: User ID is required"),
        ("u".repeat(256), "Invalid input: User ID too long"),
    ] {
        let response = server
            .post("/api/bookings/reserve")
            .json(&json!({ "event_id": 1, "user_id": user_id }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_validation_error(&response.json(), message);
    }
}

#[tokio::test]
async fn reserve_rejects_missing_fields_and_wrong_types() {
    let server = server();

    for payload in [
        json!({ "user_id": "john.doe@example.com" }),
        json!({ "event_id": "1", "user_id": "john.doe@example.com" }),
        json!({ "event_id": 1.5, "user_id": "john.doe@example.com" }),
        json!({ "event_id": 1, "user_id": 42 }),
    ] {
        let response = server.post("/api/bookings/reserve").json(&payload).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["type"], "ValidationError");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid input: "));
    }
}

#[tokio::test]
async fn reserve_rejects_malformed_json() {
    let response = server()
        .post("/api/bookings/reserve")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{\"event_id\": 1,"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["type"], "ValidationError");
}

#[tokio::test]
async fn reserve_rejects_non_json_body() {
    let response = server()
        .post("/api/bookings/reserve")
        .text("event_id=1&user_id=john")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn event_path_id_must_be_positive_integer() {
    let server = server();

    for path in ["/api/events/abc", "/api/events/0", "/api/events/-2", "/api/events/1.5"] {
        let response = server.get(path).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_validation_error(&response.json(), "Invalid event ID");
    }
}

#[tokio::test]
async fn user_history_rejects_overlong_user_id() {
    let path = format!("/api/users/{}/bookings", "u".repeat(256));
    let response = server().get(&path).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_validation_error(&response.json(), "Invalid user ID");
}

#[tokio::test]
async fn create_event_validates_body() {
    let response = server()
        .post("/api/events")
        .json(&json!({ "name": "Tech Conference 2024", "total_seats": 0 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_validation_error(
        &response.json(),
        "Invalid input: Total seats must be a positive integer",
    );
}

#[tokio::test]
async fn create_event_rejects_blank_name() {
    let response = server()
        .post("/api/events")
        .json(&json!({ "name": "   ", "total_seats": 3 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_validation_error(&response.json(), "Invalid input: Event name is required");
}

#[tokio::test]
async fn unknown_routes_use_the_error_envelope() {
    let response = server().get("/api/nowhere").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["type"], "NotFoundError");
}
