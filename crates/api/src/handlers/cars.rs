//! Handlers for the `/cars` resource and its service history.
//!
//! Reads are open to both roles through [`RequireCarAccess`]; every
//! mutation is mechanic-only. Customers listing cars are force-filtered to
//! their own vehicles regardless of what they put in the query string.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use autolog_core::error::CoreError;
use autolog_core::roles::ROLE_CUSTOMER;
use autolog_core::status::{is_valid_car_status, CAR_STATUS_READY};
use autolog_core::types::DbId;
use autolog_db::models::car::{
    Car, CarFilter, CarWithHistory, CreateCar, CreateServiceRecord, UpdateCar,
};
use autolog_db::repositories::CarRepo;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireCarAccess, RequireMechanic};
use crate::query::{PaginationParams, SortParams};
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Car list filters (`?status=&brand=&model=`). Empty strings and unknown
/// statuses are ignored rather than rejected.
#[derive(Debug, Deserialize)]
pub struct CarFilterParams {
    pub status: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
}

impl CarFilterParams {
    fn into_filter(self, owner_id: Option<DbId>) -> CarFilter {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        CarFilter {
            status: non_empty(self.status).filter(|s| is_valid_car_status(s)),
            brand: non_empty(self.brand),
            model: non_empty(self.model),
            owner_id,
        }
    }
}

/// Request body for `POST /cars`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 16, message = "Plate must be 1 to 16 characters"))]
    pub plate: String,
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(range(min = 1886, max = 2100, message = "Year is out of range"))]
    pub year: i32,
    pub image: Option<String>,
    /// Defaults to the creating mechanic when omitted.
    pub owner_id: Option<DbId>,
    pub status: Option<String>,
}

/// Request body for `PATCH /cars/{car_id}`. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateCarRequest {
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub image: Option<String>,
    pub owner_id: Option<DbId>,
    pub status: Option<String>,
}

/// Reject unknown car statuses on mutations (listings just ignore them).
fn ensure_valid_status(status: &Option<String>) -> Result<(), CoreError> {
    match status {
        Some(s) if !is_valid_car_status(s) => {
            Err(CoreError::Validation(format!("Unknown status: {s}")))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/cars
///
/// Paginated, sortable, filterable car listing. Mechanics see everything;
/// customers only ever see cars they own.
pub async fn list_cars(
    State(state): State<AppState>,
    RequireCarAccess(user): RequireCarAccess,
    Query(pagination): Query<PaginationParams>,
    Query(sort): Query<SortParams>,
    Query(filter): Query<CarFilterParams>,
) -> AppResult<Json<Paginated<Car>>> {
    let owner_id = (user.role == ROLE_CUSTOMER).then_some(user.user_id);
    let filter = filter.into_filter(owner_id);

    let total_items = CarRepo::count(&state.pool, &filter).await?;
    let cars = CarRepo::list(
        &state.pool,
        &filter,
        sort.sort_by(),
        sort.ascending(),
        pagination.per_page(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(Paginated::new(
        cars,
        pagination.page(),
        pagination.per_page(),
        total_items,
    )))
}

/// GET /api/v1/cars/{car_id}
///
/// Fetch one car with its full service history. Ownership-gated for
/// customers.
pub async fn get_car(
    State(state): State<AppState>,
    RequireCarAccess(_user): RequireCarAccess,
    Path(car_id): Path<DbId>,
) -> AppResult<Json<CarWithHistory>> {
    let car = CarRepo::find_with_history(&state.pool, car_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "car",
            id: car_id,
        })?;

    Ok(Json(car))
}

/// POST /api/v1/cars
///
/// Register a new car. Mechanic only. When no owner is given the car is
/// attached to the creating mechanic.
pub async fn create_car(
    State(state): State<AppState>,
    RequireMechanic(user): RequireMechanic,
    Json(input): Json<CreateCarRequest>,
) -> AppResult<impl axum::response::IntoResponse> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    ensure_valid_status(&input.status)?;

    let car = CarRepo::create(
        &state.pool,
        &CreateCar {
            plate: input.plate,
            brand: input.brand,
            model: input.model,
            year: input.year,
            image: input.image,
            owner_id: input.owner_id.unwrap_or(user.user_id),
            status: input.status,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(car)))
}

/// PATCH /api/v1/cars/{car_id}
///
/// Partially update a car. Mechanic only.
pub async fn update_car(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
    Path(car_id): Path<DbId>,
    Json(input): Json<UpdateCarRequest>,
) -> AppResult<Json<Car>> {
    ensure_valid_status(&input.status)?;

    let car = CarRepo::update(
        &state.pool,
        car_id,
        &UpdateCar {
            plate: input.plate,
            brand: input.brand,
            model: input.model,
            year: input.year,
            image: input.image,
            owner_id: input.owner_id,
            status: input.status,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "car",
        id: car_id,
    })?;

    if car.status == CAR_STATUS_READY {
        tracing::info!(car_id, plate = %car.plate, "Car marked ready for pickup");
    }

    Ok(Json(car))
}

/// DELETE /api/v1/cars/{car_id}
///
/// Remove a car and (via cascade) its service history. Mechanic only.
pub async fn delete_car(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
    Path(car_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CarRepo::delete(&state.pool, car_id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "car",
            id: car_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/cars/{car_id}/history
///
/// Append a service-history entry. Mechanic only. Returns the car with its
/// updated history.
pub async fn add_service(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
    Path(car_id): Path<DbId>,
    Json(input): Json<CreateServiceRecord>,
) -> AppResult<impl axum::response::IntoResponse> {
    if CarRepo::find_by_id(&state.pool, car_id).await?.is_none() {
        return Err(CoreError::NotFound {
            entity: "car",
            id: car_id,
        }
        .into());
    }

    CarRepo::add_service_record(&state.pool, car_id, &input).await?;

    let car = CarRepo::find_with_history(&state.pool, car_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "car",
            id: car_id,
        })?;

    Ok((StatusCode::CREATED, Json(car)))
}

/// DELETE /api/v1/cars/{car_id}/history/{record_id}
///
/// Remove one service-history entry. Mechanic only. The record must belong
/// to the addressed car.
pub async fn delete_service(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
    Path((car_id, record_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = CarRepo::delete_service_record(&state.pool, car_id, record_id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "service record",
            id: record_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
