//! HTTP-level integration tests for the car registry and service history:
//! ownership gating, mechanic-only mutations, pagination, and filtering.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, patch_json_auth, post_json, post_json_auth};
use sqlx::PgPool;

use autolog_api::auth::password::hash_password;
use autolog_db::models::car::{Car, CreateCar};
use autolog_db::models::user::CreateUser;
use autolog_db::repositories::{CarRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "test_password_123!";

/// Create a user directly in the database.
async fn create_user(pool: &PgPool, email: &str, role: &str) -> autolog_db::models::user::User {
    let input = CreateUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in via the API and return the access token.
async fn login_token(pool: &PgPool, email: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Create a car directly in the database.
async fn create_car(pool: &PgPool, plate: &str, owner_id: i64, status: Option<&str>) -> Car {
    CarRepo::create(
        pool,
        &CreateCar {
            plate: plate.to_string(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2019,
            image: None,
            owner_id,
            status: status.map(str::to_string),
        },
    )
    .await
    .expect("car creation should succeed")
}

// ---------------------------------------------------------------------------
// Listing and ownership
// ---------------------------------------------------------------------------

/// Customers only ever see their own cars, even without filters.
#[sqlx::test(migrations = "../db/migrations")]
async fn customer_list_is_scoped_to_own_cars(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let customer = create_user(&pool, "cust@example.com", "customer").await;
    create_car(&pool, "MECH-1", mechanic.id, None).await;
    create_car(&pool, "CUST-1", customer.id, None).await;
    create_car(&pool, "CUST-2", customer.id, None).await;

    let token = login_token(&pool, "cust@example.com").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cars", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 2);
    let plates: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["plate"].as_str().unwrap())
        .collect();
    assert!(plates.contains(&"CUST-1"));
    assert!(plates.contains(&"CUST-2"));
    assert!(!plates.contains(&"MECH-1"), "foreign cars must be hidden");
}

/// Mechanics see every car.
#[sqlx::test(migrations = "../db/migrations")]
async fn mechanic_lists_all_cars(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let customer = create_user(&pool, "cust@example.com", "customer").await;
    create_car(&pool, "MECH-1", mechanic.id, None).await;
    create_car(&pool, "CUST-1", customer.id, None).await;

    let token = login_token(&pool, "mech@example.com").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cars", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 2);
}

/// Pagination metadata is computed from the filtered total.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_pagination(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    for i in 0..5 {
        create_car(&pool, &format!("CAR-{i}"), mechanic.id, None).await;
    }

    let token = login_token(&pool, "mech@example.com").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cars?page=2&per_page=2", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"], 2);
    assert_eq!(json["per_page"], 2);
    assert_eq!(json["total_items"], 5);
    assert_eq!(json["total_pages"], 3);
    assert_eq!(json["has_previous_page"], true);
    assert_eq!(json["has_next_page"], true);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

/// An oversized `per_page` is clamped to the hard cap, and the metadata
/// reflects the clamped value so every row stays reachable page by page.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_per_page_over_cap_is_clamped(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    for i in 0..3 {
        create_car(&pool, &format!("CAP-{i}"), mechanic.id, None).await;
    }

    let token = login_token(&pool, "mech@example.com").await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cars?per_page=1000", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["per_page"], 100, "per_page must clamp to the cap");
    assert_eq!(json["total_items"], 3);
    assert_eq!(json["total_pages"], 1);
    assert_eq!(json["has_next_page"], false);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

/// Status and brand filters narrow the listing; unknown statuses are
/// ignored rather than rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    create_car(&pool, "READY-1", mechanic.id, Some("ready")).await;
    create_car(&pool, "SHOP-1", mechanic.id, Some("in-service")).await;
    create_car(&pool, "SHOP-2", mechanic.id, Some("in-service")).await;

    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/cars?status=ready", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 1);
    assert_eq!(json["data"][0]["plate"], "READY-1");

    // An unknown status filter is dropped, not an error.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cars?status=exploded", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_items"], 3);
}

/// A customer can fetch their own car but not someone else's.
#[sqlx::test(migrations = "../db/migrations")]
async fn customer_car_access_gate(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let customer = create_user(&pool, "cust@example.com", "customer").await;
    let own = create_car(&pool, "OWN-1", customer.id, None).await;
    let foreign = create_car(&pool, "FOREIGN-1", mechanic.id, None).await;

    let token = login_token(&pool, "cust@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/cars/{}", own.id), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["plate"], "OWN-1");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/cars/{}", foreign.id), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Access denied");
}

/// Fetching an unknown car returns 404 for a mechanic.
#[sqlx::test(migrations = "../db/migrations")]
async fn get_unknown_car(pool: PgPool) {
    create_user(&pool, "mech@example.com", "mechanic").await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/cars/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Mutations (mechanic only)
// ---------------------------------------------------------------------------

/// A mechanic creates a car; the owner defaults to the mechanic and the
/// status defaults to in-service.
#[sqlx::test(migrations = "../db/migrations")]
async fn mechanic_creates_car(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "plate": "NEW-42",
        "brand": "Skoda",
        "model": "Octavia",
        "year": 2021
    });
    let response = post_json_auth(app, "/api/v1/cars", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["plate"], "NEW-42");
    assert_eq!(json["owner_id"], mechanic.id);
    assert_eq!(json["status"], "in-service");
}

/// Creating a car with an already-registered plate returns 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_plate_conflict(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    create_car(&pool, "DUP-1", mechanic.id, None).await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "plate": "DUP-1",
        "brand": "Skoda",
        "model": "Octavia",
        "year": 2021
    });
    let response = post_json_auth(app, "/api/v1/cars", body, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// Customers cannot create, update, or delete cars.
#[sqlx::test(migrations = "../db/migrations")]
async fn customer_mutations_forbidden(pool: PgPool) {
    let customer = create_user(&pool, "cust@example.com", "customer").await;
    let car = create_car(&pool, "OWN-1", customer.id, None).await;
    let token = login_token(&pool, "cust@example.com").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "plate": "NOPE-1", "brand": "Audi", "model": "A4", "year": 2020
    });
    let response = post_json_auth(app, "/api/v1/cars", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Even the customer's own car is read-only to them.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "status": "ready" });
    let response = patch_json_auth(app, &format!("/api/v1/cars/{}", car.id), body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/cars/{}", car.id), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Partial update touches only the supplied fields.
#[sqlx::test(migrations = "../db/migrations")]
async fn mechanic_updates_car(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let car = create_car(&pool, "UPD-1", mechanic.id, None).await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "status": "ready" });
    let response = patch_json_auth(app, &format!("/api/v1/cars/{}", car.id), body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["plate"], "UPD-1", "untouched fields must survive");
}

/// Updates with an unknown status are rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_unknown_status_rejected(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let car = create_car(&pool, "BAD-1", mechanic.id, None).await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "status": "exploded" });
    let response = patch_json_auth(app, &format!("/api/v1/cars/{}", car.id), body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deleting a car removes it and returns 404 on subsequent access.
#[sqlx::test(migrations = "../db/migrations")]
async fn mechanic_deletes_car(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let car = create_car(&pool, "DEL-1", mechanic.id, None).await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/cars/{}", car.id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/cars/{}", car.id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Service history
// ---------------------------------------------------------------------------

/// Adding a service record returns the car with its updated history.
#[sqlx::test(migrations = "../db/migrations")]
async fn add_service_record(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let car = create_car(&pool, "HIST-1", mechanic.id, None).await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "description": "Oil change", "cost": 89.5 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/cars/{}/history", car.id),
        body,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["plate"], "HIST-1");
    let history = json["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["description"], "Oil change");
    assert_eq!(history[0]["cost"], 89.5);
}

/// Adding history to an unknown car returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn add_service_record_unknown_car(pool: PgPool) {
    create_user(&pool, "mech@example.com", "mechanic").await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "description": "Oil change", "cost": 89.5 });
    let response = post_json_auth(app, "/api/v1/cars/999999/history", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A history entry can only be deleted through the car it belongs to.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_service_record_scoped_to_car(pool: PgPool) {
    let mechanic = create_user(&pool, "mech@example.com", "mechanic").await;
    let car = create_car(&pool, "HIST-1", mechanic.id, None).await;
    let other = create_car(&pool, "HIST-2", mechanic.id, None).await;
    let token = login_token(&pool, "mech@example.com").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "description": "Brake pads", "cost": 240.0 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/cars/{}/history", car.id),
        body,
        &token,
    )
    .await;
    let json = body_json(response).await;
    let record_id = json["history"][0]["id"].as_i64().unwrap();

    // Deleting through the wrong car fails.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/cars/{}/history/{record_id}", other.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting through the owning car succeeds.
    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/cars/{}/history/{record_id}", car.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
