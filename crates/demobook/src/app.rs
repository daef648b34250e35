use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        admin::{delete_booking, get_settings, list_bookings, login, put_settings},
        availability::get_availability,
        bookings::book_demo,
        health::livez,
        not_found,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    // Every response, errors included, carries the CORS headers.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let admin_routes = Router::new()
        .route("/login", post(login))
        .route("/auth", post(login))
        .route("/bookings", get(list_bookings))
        .route("/bookings/{date}/{time}", delete(delete_booking))
        .route("/settings", get(get_settings).put(put_settings));

    let api_routes = Router::new()
        .route("/availability", get(get_availability))
        .route("/book-demo", post(book_demo))
        .nest("/admin", admin_routes);

    Router::new()
        .route("/livez", get(livez))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::mail::{FailingMailer, OutboxMailer};

    const MONTH: &str = "2099-12";

    fn test_app() -> (Router, OutboxMailer) {
        let outbox = OutboxMailer::new();
        let state = AppState::for_tests(Arc::new(outbox.clone()));
        (create_app(state), outbox)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn admin_token(app: &Router) -> String {
        let (status, body) = send(
            app,
            json_req("POST", "/api/admin/login", None, json!({"password": "letmein"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    /// Configures the test month with default settings.
    async fn configure_month(app: &Router, token: &str) {
        let (status, _) = send(
            app,
            json_req(
                "PUT",
                &format!("/api/admin/settings?month={MONTH}"),
                Some(token),
                json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    fn booking(name: &str, start_time: &str) -> Request<Body> {
        json_req(
            "POST",
            "/api/book-demo",
            None,
            json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "start_time": start_time,
            }),
        )
    }

    // ------------------------------------------------------------------------
    // Process surface
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_livez() {
        let (app, _) = test_app();
        let (status, _) = send(&app, get_req("/livez", None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (app, _) = test_app();
        let (status, body) = send(&app, get_req("/api/nope", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found: GET /api/nope");
    }

    #[tokio::test]
    async fn test_cors_headers_on_responses() {
        let (app, _) = test_app();
        let request = Request::builder()
            .uri(format!("/api/availability?month={MONTH}"))
            .header("origin", "https://demobook.dev")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let (app, _) = test_app();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/book-demo")
            .header("origin", "https://demobook.dev")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let methods = response
            .headers()
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
    }

    // ------------------------------------------------------------------------
    // Availability
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_availability_unconfigured_month() {
        let (app, _) = test_app();
        let (status, body) = send(&app, get_req("/api/availability?month=2099-11", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["month"], "2099-11");
        assert_eq!(body["configured"], false);
        assert_eq!(body["days"], json!([]));
    }

    #[tokio::test]
    async fn test_availability_requires_valid_month() {
        let (app, _) = test_app();

        let (status, body) = send(&app, get_req("/api/availability", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "month is required");

        let (status, _) = send(&app, get_req("/api/availability?month=2099-13", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_availability_configured_month() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;

        let (status, body) =
            send(&app, get_req(&format!("/api/availability?month={MONTH}"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configured"], true);

        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 31);

        // 2099-12-10 is a Thursday; 2099-12-12 a Saturday.
        let thursday = &days[9];
        assert_eq!(thursday["date"], "2099-12-10");
        assert_eq!(thursday["day_of_week"], 4);
        let slots = thursday["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 12);
        assert_eq!(slots[0]["time"], "10:00");
        assert_eq!(slots[0]["datetime"], "2099-12-10T10:00:00");
        assert_eq!(slots[4]["time"], "14:00");
        assert!(slots.iter().all(|s| s["available"] == true));

        assert_eq!(days[11]["slots"], json!([]));
    }

    #[tokio::test]
    async fn test_availability_marks_booked_slots() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;

        let (status, _) = send(&app, booking("Test", "2099-12-10T14:00:00")).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) =
            send(&app, get_req(&format!("/api/availability?month={MONTH}"), None)).await;
        let slots = body["days"][9]["slots"].as_array().unwrap();
        let booked: Vec<_> = slots
            .iter()
            .filter(|s| s["available"] == false)
            .map(|s| s["time"].as_str().unwrap())
            .collect();
        assert_eq!(booked, vec!["14:00"]);
    }

    // ------------------------------------------------------------------------
    // Booking
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_book_then_book_again_is_taken() {
        let (app, outbox) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;

        let (status, body) = send(&app, booking("Test", "2099-12-10T14:00:00")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["date"], "2099-12-10");
        assert_eq!(body["time"], "14:00");
        assert!(body["booking_id"].as_str().is_some());

        // Owner notification and client confirmation.
        let sent = outbox.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, vec!["owner@demobook.dev".to_string()]);
        assert_eq!(sent[1].to, vec!["test@example.com".to_string()]);

        let (status, body) = send(&app, booking("Other", "2099-12-10T14:00:00")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "This slot is already booked: 2099-12-10#14:00");
    }

    #[tokio::test]
    async fn test_concurrent_bookings_of_one_slot() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;

        let mut handles = Vec::new();
        for i in 0..10 {
            let app = app.clone();
            handles.push(tokio::spawn(async move {
                send(&app, booking(&format!("Racer{i}"), "2099-12-10T15:30:00"))
                    .await
                    .0
            }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                StatusCode::CREATED => created += 1,
                StatusCode::CONFLICT => conflicts += 1,
                other => panic!("unexpected status {other}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 9);
    }

    #[tokio::test]
    async fn test_booking_unoffered_slot_is_unavailable() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;

        // Lunch break, weekend, and an unconfigured month.
        for start in [
            "2099-12-10T12:30:00",
            "2099-12-12T10:00:00",
            "2099-11-10T10:00:00",
        ] {
            let (status, body) = send(&app, booking("Test", start)).await;
            assert_eq!(status, StatusCode::CONFLICT, "{start}");
            assert!(body["error"]
                .as_str()
                .unwrap()
                .starts_with("This slot is not available"));
        }
    }

    #[tokio::test]
    async fn test_booking_in_the_past_is_unavailable() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        let (status, _) = send(
            &app,
            json_req(
                "PUT",
                "/api/admin/settings?month=2020-01",
                Some(&token),
                json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, booking("Test", "2020-01-06T10:00:00")).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_booking_validation_errors() {
        let (app, _) = test_app();

        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/book-demo",
                None,
                json!({"email": "a@b.co", "start_time": "2099-12-10T14:00:00"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "name is required");

        let (status, _) = send(&app, booking("Test", "next tuesday")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method("POST")
            .uri("/api/book-demo")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_email_failure_does_not_fail_booking() {
        let state = AppState::for_tests(Arc::new(FailingMailer));
        let app = create_app(state);
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;

        let (status, body) = send(&app, booking("Test", "2099-12-10T14:00:00")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);

        let (_, body) = send(
            &app,
            get_req(&format!("/api/admin/bookings?month={MONTH}"), Some(&token)),
        )
        .await;
        assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
    }

    // ------------------------------------------------------------------------
    // Admin auth
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            json_req("POST", "/api/admin/login", None, json!({"password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid password");
    }

    #[tokio::test]
    async fn test_login_alias_route() {
        let (app, _) = test_app();
        let (status, body) = send(
            &app,
            json_req("POST", "/api/admin/auth", None, json!({"password": "letmein"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["expires_at"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_admin_routes_reject_bad_tokens() {
        let (app, _) = test_app();
        let uri = format!("/api/admin/bookings?month={MONTH}");

        let (status, body) = send(&app, get_req(&uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing bearer token");

        let (status, _) = send(&app, get_req(&uri, Some("not-a-token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let expired = crate::auth::AdminAuth::new(
            Some("letmein".to_string()),
            "test-secret",
            chrono::Duration::hours(1),
        )
        .login("letmein", chrono::Utc::now() - chrono::Duration::hours(3))
        .unwrap();
        let (status, body) = send(&app, get_req(&uri, Some(&expired.token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Token expired");

        let (status, _) = send(
            &app,
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/bookings/2099-12-10/14:00")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // ------------------------------------------------------------------------
    // Admin bookings
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_list_bookings_in_time_order() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;

        for (name, start) in [
            ("Late", "2099-12-10T17:00:00"),
            ("Early", "2099-12-01T10:00:00"),
            ("Middle", "2099-12-10T10:30:00"),
        ] {
            let (status, _) = send(&app, booking(name, start)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(
            &app,
            get_req(&format!("/api/admin/bookings?month={MONTH}"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["month"], MONTH);
        let names: Vec<_> = body["bookings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Early", "Middle", "Late"]);
    }

    #[tokio::test]
    async fn test_delete_booking_is_idempotent() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;
        send(&app, booking("Test", "2099-12-10T14:00:00")).await;

        let delete = || {
            Request::builder()
                .method("DELETE")
                .uri("/api/admin/bookings/2099-12-10/14:00")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap()
        };

        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        // The slot is bookable again.
        let (status, _) = send(&app, booking("Again", "2099-12-10T14:00:00")).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_delete_booking_malformed_slot() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/admin/bookings/2099-13-40/25:00")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_booking_with_seconds_is_rejected() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;
        configure_month(&app, &token).await;
        send(&app, booking("Test", "2099-12-10T14:00:00")).await;

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/admin/bookings/2099-12-10/14:00:30")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(
            &app,
            get_req(&format!("/api/admin/bookings?month={MONTH}"), Some(&token)),
        )
        .await;
        assert_eq!(body["bookings"].as_array().unwrap().len(), 1);
    }

    // ------------------------------------------------------------------------
    // Admin settings
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_settings_read_unconfigured() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        let (status, body) = send(
            &app,
            get_req(&format!("/api/admin/settings?month={MONTH}"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configured"], false);
        assert_eq!(body["settings"], Value::Null);
    }

    #[tokio::test]
    async fn test_settings_update_then_read() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        let (status, body) = send(
            &app,
            json_req(
                "PUT",
                &format!("/api/admin/settings?month={MONTH}"),
                Some(&token),
                json!({
                    "working_hours": {
                        "start": 9, "end": 12, "break_start": 12, "break_end": 12, "slot_duration": 60
                    },
                    "working_days": [4, 4, 1],
                    "blocked_days": ["2099-12-24"],
                    "custom_slots": {"2099-12-10": {"blocked": ["09:00"], "added": ["18:30"]}}
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["settings"]["working_days"], json!([1, 4]));

        let (_, body) = send(
            &app,
            get_req(&format!("/api/admin/settings?month={MONTH}"), Some(&token)),
        )
        .await;
        assert_eq!(body["configured"], true);
        assert_eq!(body["settings"]["working_hours"]["start"], 9);
        assert_eq!(body["settings"]["blocked_days"], json!(["2099-12-24"]));

        let (_, body) =
            send(&app, get_req(&format!("/api/availability?month={MONTH}"), None)).await;
        let times: Vec<_> = body["days"][9]["slots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["time"].as_str().unwrap())
            .collect();
        assert_eq!(times, vec!["10:00", "11:00", "18:30"]);
    }

    #[tokio::test]
    async fn test_settings_month_from_body_and_mismatch() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        let (status, body) = send(
            &app,
            json_req(
                "PUT",
                "/api/admin/settings",
                Some(&token),
                json!({"month": MONTH}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["settings"]["month"], MONTH);

        let (status, _) = send(
            &app,
            json_req(
                "PUT",
                "/api/admin/settings?month=2099-11",
                Some(&token),
                json!({"month": MONTH}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_settings_rejects_invalid_hours() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        let (status, body) = send(
            &app,
            json_req(
                "PUT",
                &format!("/api/admin/settings?month={MONTH}"),
                Some(&token),
                json!({
                    "working_hours": {
                        "start": 18, "end": 10, "break_start": 12, "break_end": 14, "slot_duration": 30
                    }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid settings"));
    }

    #[tokio::test]
    async fn test_settings_rejects_custom_slot_with_seconds() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        let (status, _) = send(
            &app,
            json_req(
                "PUT",
                &format!("/api/admin/settings?month={MONTH}"),
                Some(&token),
                json!({"custom_slots": {"2099-12-10": {"added": ["18:30:15"]}}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(
            &app,
            get_req(&format!("/api/admin/settings?month={MONTH}"), Some(&token)),
        )
        .await;
        assert_eq!(body["configured"], false);
    }

    #[tokio::test]
    async fn test_book_added_slot_on_weekend() {
        let (app, _) = test_app();
        let token = admin_token(&app).await;

        // 2099-12-12 is a Saturday, outside the default working days.
        let (status, _) = send(
            &app,
            json_req(
                "PUT",
                &format!("/api/admin/settings?month={MONTH}"),
                Some(&token),
                json!({"custom_slots": {"2099-12-12": {"added": ["11:00"]}}}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) =
            send(&app, get_req(&format!("/api/availability?month={MONTH}"), None)).await;
        let saturday = &body["days"][11];
        assert_eq!(saturday["date"], "2099-12-12");
        assert_eq!(saturday["slots"].as_array().unwrap().len(), 1);
        assert_eq!(saturday["slots"][0]["datetime"], "2099-12-12T11:00:00");

        let (status, body) = send(&app, booking("Weekend", "2099-12-12T11:00:00")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["time"], "11:00");

        let (status, _) = send(&app, booking("Other", "2099-12-12T10:00:00")).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) =
            send(&app, get_req(&format!("/api/availability?month={MONTH}"), None)).await;
        assert_eq!(body["days"][11]["slots"][0]["available"], false);
    }
}
