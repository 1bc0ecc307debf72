//! Repository for the `cars` and `service_records` tables.

use autolog_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::car::{
    Car, CarFilter, CarWithHistory, CreateCar, CreateServiceRecord, ServiceRecord, UpdateCar,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, plate, brand, model, year, image, owner_id, status, \
                        created_at, updated_at";

/// Hard cap on page size to keep list queries bounded.
///
/// The HTTP pagination params clamp against the same constant so the pager
/// metadata always agrees with what the query executes.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Map a client-supplied sort key onto a real column.
///
/// Unknown keys fall back to `created_at` rather than erroring, matching the
/// lenient query-parameter handling of the rest of the API.
fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "plate" => "plate",
        "brand" => "brand",
        "model" => "model",
        "year" => "year",
        "status" => "status",
        _ => "created_at",
    }
}

/// Append the `WHERE` clause for a [`CarFilter`] to a query builder.
fn push_filter<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a CarFilter) {
    qb.push(" WHERE TRUE");
    if let Some(status) = &filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(brand) = &filter.brand {
        qb.push(" AND brand = ").push_bind(brand);
    }
    if let Some(model) = &filter.model {
        qb.push(" AND model = ").push_bind(model);
    }
    if let Some(owner_id) = filter.owner_id {
        qb.push(" AND owner_id = ").push_bind(owner_id);
    }
}

/// Provides CRUD operations for cars and their service history.
pub struct CarRepo;

impl CarRepo {
    /// Insert a new car, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCar) -> Result<Car, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (plate, brand, model, year, image, owner_id, status)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'in-service'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(&input.plate)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(input.year)
            .bind(&input.image)
            .bind(input.owner_id)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a car by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Look up only the owner of a car.
    ///
    /// This is the ownership probe the authorization layer uses; it avoids
    /// fetching the whole row on the access-check path.
    pub async fn find_owner_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT owner_id FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count cars matching a filter.
    pub async fn count(pool: &PgPool, filter: &CarFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM cars");
        push_filter(&mut qb, filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// List cars matching a filter with sorting and pagination.
    ///
    /// `limit` is clamped to a hard maximum; `offset` is clamped to zero.
    pub async fn list(
        pool: &PgPool,
        filter: &CarFilter,
        sort_by: &str,
        ascending: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Car>, sqlx::Error> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let offset = offset.max(0);

        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM cars"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY ")
            .push(sort_column(sort_by))
            .push(if ascending { " ASC" } else { " DESC" });
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        qb.build_query_as::<Car>().fetch_all(pool).await
    }

    /// Update a car. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCar,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET
                plate = COALESCE($2, plate),
                brand = COALESCE($3, brand),
                model = COALESCE($4, model),
                year = COALESCE($5, year),
                image = COALESCE($6, image),
                owner_id = COALESCE($7, owner_id),
                status = COALESCE($8, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .bind(&input.plate)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(input.year)
            .bind(&input.image)
            .bind(input.owner_id)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a car and (via cascade) its service history.
    ///
    /// Returns `true` if the row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a car's service history, newest entry first.
    pub async fn list_service_records(
        pool: &PgPool,
        car_id: DbId,
    ) -> Result<Vec<ServiceRecord>, sqlx::Error> {
        sqlx::query_as::<_, ServiceRecord>(
            "SELECT id, car_id, description, cost, performed_at, created_at
             FROM service_records
             WHERE car_id = $1
             ORDER BY performed_at DESC, id DESC",
        )
        .bind(car_id)
        .fetch_all(pool)
        .await
    }

    /// Fetch a car together with its full service history.
    pub async fn find_with_history(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CarWithHistory>, sqlx::Error> {
        let Some(car) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let history = Self::list_service_records(pool, id).await?;
        Ok(Some(CarWithHistory { car, history }))
    }

    /// Append a service-history entry to a car.
    pub async fn add_service_record(
        pool: &PgPool,
        car_id: DbId,
        input: &CreateServiceRecord,
    ) -> Result<ServiceRecord, sqlx::Error> {
        sqlx::query_as::<_, ServiceRecord>(
            "INSERT INTO service_records (car_id, description, cost, performed_at)
             VALUES ($1, $2, $3, COALESCE($4, NOW()))
             RETURNING id, car_id, description, cost, performed_at, created_at",
        )
        .bind(car_id)
        .bind(&input.description)
        .bind(input.cost)
        .bind(input.performed_at)
        .fetch_one(pool)
        .await
    }

    /// Delete one service-history entry from a car.
    ///
    /// The delete is scoped to the car so a record id from another car
    /// cannot be removed through the wrong route.
    pub async fn delete_service_record(
        pool: &PgPool,
        car_id: DbId,
        record_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM service_records WHERE id = $1 AND car_id = $2")
            .bind(record_id)
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
