//! Car entity model, service history records, and DTOs.

use autolog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A car row from the `cars` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Car {
    pub id: DbId,
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub image: Option<String>,
    pub owner_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A single service-history entry from the `service_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceRecord {
    pub id: DbId,
    pub car_id: DbId,
    pub description: String,
    pub cost: f64,
    pub performed_at: Timestamp,
    pub created_at: Timestamp,
}

/// A car together with its full service history, newest entry first.
#[derive(Debug, Serialize)]
pub struct CarWithHistory {
    #[serde(flatten)]
    pub car: Car,
    pub history: Vec<ServiceRecord>,
}

/// DTO for creating a new car.
///
/// `owner_id` is optional at the API boundary; the handler fills in the
/// creating user's id when it is absent.
#[derive(Debug)]
pub struct CreateCar {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub image: Option<String>,
    pub owner_id: DbId,
    pub status: Option<String>,
}

/// DTO for updating an existing car. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateCar {
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub image: Option<String>,
    pub owner_id: Option<DbId>,
    pub status: Option<String>,
}

/// DTO for appending a service-history entry to a car.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRecord {
    pub description: String,
    pub cost: f64,
    pub performed_at: Option<Timestamp>,
}

/// Filter applied to car listings. Empty fields are ignored.
#[derive(Debug, Default, Clone)]
pub struct CarFilter {
    pub status: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    /// Set by the handler when the requester is a customer; customers only
    /// ever see their own cars.
    pub owner_id: Option<DbId>,
}
