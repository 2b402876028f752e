//! End-to-end API flows against an in-memory server state

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use canteen_server::auth::{MemoryMailer, OtpPurpose};
use canteen_server::slots::{SlotConfig, SlotSeed};
use canteen_server::{Config, ErrorCode, ServerState, api::build_app};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const MANAGER_EMAIL: &str = "canteen@iiitkottayam.ac.in";
const MANAGER_PASSWORD: &str = "Canteen@Admin1";
const STUDENT_EMAIL: &str = "asha@iiitkottayam.ac.in";
const STUDENT_PASSWORD: &str = "Masala#Dosa42";

struct TestApp {
    app: Router,
    mailer: MemoryMailer,
}

fn test_app() -> TestApp {
    let config = Config {
        manager_email: Some(MANAGER_EMAIL.to_string()),
        manager_password: Some(MANAGER_PASSWORD.to_string()),
        seed_sample_menu: true,
        // One-minute slots up to midnight so there is always a slot left today
        slots: SlotConfig {
            lead_minutes: 0,
            step_minutes: 1,
            close_hour: 24,
            capacity: 20,
            seed: SlotSeed::Zero,
        },
        ..Config::for_tests()
    };
    let mailer = MemoryMailer::new();
    let state = ServerState::in_memory(config, Arc::new(mailer.clone())).unwrap();
    TestApp {
        app: build_app(state),
        mailer,
    }
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn student_token(test: &TestApp) -> String {
    let (status, body) = call(
        &test.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Asha",
            "email": STUDENT_EMAIL,
            "password": STUDENT_PASSWORD,
            "student_id": "2021BCS0001"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");

    let code = test
        .mailer
        .last_code(STUDENT_EMAIL, OtpPurpose::EmailVerification)
        .unwrap();
    let (status, body) = call(
        &test.app,
        "POST",
        "/api/auth/verify-otp",
        None,
        Some(json!({ "email": STUDENT_EMAIL, "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_verified"], true);

    login(&test.app, STUDENT_EMAIL, STUDENT_PASSWORD).await
}

/// First two menu items by name, with their prices
async fn two_dishes(app: &Router) -> Vec<(String, f64)> {
    let (status, body) = call(app, "GET", "/api/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .take(2)
        .map(|item| {
            (
                item["id"].as_str().unwrap().to_string(),
                item["price"].as_f64().unwrap(),
            )
        })
        .collect()
}

async fn last_slot(app: &Router, token: &str) -> String {
    let (status, body) = call(app, "GET", "/api/slots", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    let slots = body["data"].as_array().unwrap();
    assert!(!slots.is_empty());
    slots.last().unwrap()["time"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_and_menu_are_public() {
    let test = test_app();

    let (status, body) = call(&test.app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&test.app, "GET", "/api/menu", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["data"].as_array().unwrap().is_empty());

    let (status, body) = call(&test.app, "GET", "/api/menu/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0], "All");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let test = test_app();

    let (status, body) = call(&test.app, "GET", "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());

    let (status, _) = call(&test.app, "GET", "/api/cart", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Menu writes are not public even though reads are
    let (status, _) = call(
        &test.app,
        "POST",
        "/api/menu",
        None,
        Some(json!({ "name": "Tea", "price": 10.0, "category": "Beverages", "preparation_time": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_cannot_use_manager_routes() {
    let test = test_app();
    let token = student_token(&test).await;

    for uri in ["/api/orders", "/api/orders/counts", "/api/analytics", "/api/analytics/dashboard"] {
        let (status, body) = call(&test.app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["code"], ErrorCode::ManagerRequired.code());
    }
}

#[tokio::test]
async fn test_checkout_and_order_lifecycle() {
    let test = test_app();
    let student = student_token(&test).await;
    let manager = login(&test.app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
    let dishes = two_dishes(&test.app).await;

    // Cart: 2 x first dish, 1 x second dish
    for (id, quantity) in [(&dishes[0].0, 2), (&dishes[1].0, 1)] {
        let (status, _) = call(
            &test.app,
            "POST",
            "/api/cart/items",
            Some(&student),
            Some(json!({ "menu_item_id": id, "quantity": quantity })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let expected_total = dishes[0].1 * 2.0 + dishes[1].1;
    let (_, cart) = call(&test.app, "GET", "/api/cart", Some(&student), None).await;
    assert_eq!(cart["data"]["subtotal"].as_f64().unwrap(), expected_total);

    // Checkout
    let slot = last_slot(&test.app, &student).await;
    let (status, body) = call(
        &test.app,
        "POST",
        "/api/orders",
        Some(&student),
        Some(json!({ "scheduled_time": slot, "special_instructions": "Less spicy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "checkout failed: {body}");
    let order = &body["data"];
    let order_id = order["id"].as_str().unwrap().to_string();
    let token = order["token"].as_str().unwrap();
    assert_eq!(token.len(), 12);
    assert!(token.ends_with("-001"));
    assert_eq!(order["status"], "ordered");
    assert_eq!(order["total_amount"].as_f64().unwrap(), expected_total);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);

    // Cart was cleared
    let (_, cart) = call(&test.app, "GET", "/api/cart", Some(&student), None).await;
    assert!(cart["data"]["items"].as_array().unwrap().is_empty());

    // Kitchen moves it along; skipping a step is rejected
    let (status, body) = call(
        &test.app,
        "PUT",
        &format!("/api/orders/{order_id}/status"),
        Some(&manager),
        Some(json!({ "status": "served" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], ErrorCode::InvalidStatusTransition.code());

    for next in ["preparing", "ready", "served"] {
        let (status, body) = call(
            &test.app,
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            Some(&manager),
            Some(json!({ "status": next })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], next);
    }

    // Student sees it as completed, with one notification per event
    let (_, mine) = call(&test.app, "GET", "/api/orders/mine", Some(&student), None).await;
    assert!(mine["data"]["active"].as_array().unwrap().is_empty());
    assert_eq!(mine["data"]["completed"][0]["id"], order_id.as_str());

    let (_, notifications) = call(&test.app, "GET", "/api/notifications", Some(&student), None).await;
    let notifications = notifications["data"].as_array().unwrap();
    assert_eq!(notifications.len(), 4);
    assert!(notifications.iter().any(|n| n["title"] == "Order Placed Successfully"));

    let (_, unread) = call(&test.app, "GET", "/api/notifications/unread-count", Some(&student), None).await;
    assert_eq!(unread["data"]["unread"], 4);
    let (status, _) = call(&test.app, "PUT", "/api/notifications/read-all", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, unread) = call(&test.app, "GET", "/api/notifications/unread-count", Some(&student), None).await;
    assert_eq!(unread["data"]["unread"], 0);

    // Manager numbers
    let (status, counts) = call(&test.app, "GET", "/api/orders/counts", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(counts["data"]["served"], 1);

    let (status, dashboard) = call(&test.app, "GET", "/api/analytics/dashboard", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["data"]["served_orders"], 1);
    assert_eq!(
        dashboard["data"]["total_revenue"].as_f64().unwrap(),
        order["total_with_tax"].as_f64().unwrap()
    );

    let (status, report) = call(&test.app, "GET", "/api/analytics?period=7d", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["data"]["total_orders"], 1);
}

#[tokio::test]
async fn test_empty_cart_and_unknown_slot_rejected() {
    let test = test_app();
    let student = student_token(&test).await;

    let slot = last_slot(&test.app, &student).await;
    let (status, body) = call(
        &test.app,
        "POST",
        "/api/orders",
        Some(&student),
        Some(json!({ "scheduled_time": slot })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::CartEmpty.code());

    let dishes = two_dishes(&test.app).await;
    call(
        &test.app,
        "POST",
        "/api/cart/items",
        Some(&student),
        Some(json!({ "menu_item_id": dishes[0].0 })),
    )
    .await;
    // 00:00 is never after now + lead on the current day
    let (status, body) = call(
        &test.app,
        "POST",
        "/api/orders",
        Some(&student),
        Some(json!({ "scheduled_time": "00:00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::SlotNotFound.code());

    // Cart is untouched after the failed checkout
    let (_, cart) = call(&test.app, "GET", "/api/cart", Some(&student), None).await;
    assert_eq!(cart["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_student_cancel_and_order_privacy() {
    let test = test_app();
    let student = student_token(&test).await;
    let manager = login(&test.app, MANAGER_EMAIL, MANAGER_PASSWORD).await;
    let dishes = two_dishes(&test.app).await;

    call(
        &test.app,
        "POST",
        "/api/cart/items",
        Some(&student),
        Some(json!({ "menu_item_id": dishes[0].0 })),
    )
    .await;
    let slot = last_slot(&test.app, &student).await;
    let (_, body) = call(
        &test.app,
        "POST",
        "/api/orders",
        Some(&student),
        Some(json!({ "scheduled_time": slot })),
    )
    .await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // The manager account is not the owner but may read it
    let (status, _) = call(&test.app, "GET", &format!("/api/orders/{order_id}"), Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(
        &test.app,
        "POST",
        &format!("/api/orders/{order_id}/cancel"),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    // Terminal
    let (status, body) = call(
        &test.app,
        "POST",
        &format!("/api/orders/{order_id}/cancel"),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["status"], "cancelled");
}

#[tokio::test]
async fn test_review_updates_menu_rating() {
    let test = test_app();
    let student = student_token(&test).await;
    let dishes = two_dishes(&test.app).await;
    let item_id = &dishes[0].0;

    let (status, body) = call(
        &test.app,
        "POST",
        "/api/reviews",
        Some(&student),
        Some(json!({ "menu_item_id": item_id, "rating": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], ErrorCode::InvalidRating.code());

    let (status, _) = call(
        &test.app,
        "POST",
        "/api/reviews",
        Some(&student),
        Some(json!({ "menu_item_id": item_id, "rating": 4, "comment": "Good" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, item) = call(&test.app, "GET", &format!("/api/menu/{item_id}"), None, None).await;
    assert_eq!(item["data"]["average_rating"].as_f64().unwrap(), 4.0);
    assert_eq!(item["data"]["review_count"], 1);

    let (_, reviewed) = call(
        &test.app,
        "GET",
        &format!("/api/reviews/item/{item_id}/mine"),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(reviewed["data"]["has_reviewed"], true);
}

#[tokio::test]
async fn test_manager_menu_management() {
    let test = test_app();
    let manager = login(&test.app, MANAGER_EMAIL, MANAGER_PASSWORD).await;

    let (status, body) = call(
        &test.app,
        "POST",
        "/api/menu",
        Some(&manager),
        Some(json!({
            "name": "Filter Coffee",
            "price": 20.0,
            "category": "Beverages",
            "preparation_time": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["review_count"], 0);

    let (status, body) = call(
        &test.app,
        "PUT",
        &format!("/api/menu/{id}/availability"),
        Some(&manager),
        Some(json!({ "is_available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_available"], false);

    let (_, available) = call(&test.app, "GET", "/api/menu?available_only=true", None, None).await;
    assert!(
        available["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|item| item["id"] != id.as_str())
    );

    let (status, _) = call(&test.app, "DELETE", &format!("/api/menu/{id}"), Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&test.app, "GET", &format!("/api/menu/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_check_is_public() {
    let test = test_app();
    let (status, body) = call(
        &test.app,
        "POST",
        "/api/auth/password-check",
        None,
        Some(json!({ "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_valid"], false);
}
