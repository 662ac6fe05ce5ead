//! Persistence for the `gyms` table.
//!
//! Address, coordinates, amenities, photos and opening hours live in
//! `jsonb` columns and round-trip through the typed shapes in
//! [`clublink_types::shapes`]. `monthly_fee` is `NUMERIC(10, 2)` and is
//! carried as [`Decimal`] end to end, so `300.00` reads back as exactly
//! `300.00`.

use chrono::{DateTime, Utc};
use clublink_types::{
    Address, Coordinates, Gym, GymFilter, GymId, GymOwnerId, GymPatch, GymStatus, NewGym,
    OpeningHours,
};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::codec::DbEnum;
use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "gym";

const COLUMNS: &str = "id, owner_id, name, address, coordinates, amenities, photos, \
                       opening_hours, status::TEXT AS status, monthly_fee, created_at, updated_at";

/// Operations on the `gyms` table.
pub struct GymStore<'a> {
    pool: &'a PgPool,
}

impl<'a> GymStore<'a> {
    /// Create a new gym store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a gym. A missing status defaults to `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] for malformed input (bad coordinates,
    /// fee precision, opening hours) and [`DbError::ConstraintViolation`] if
    /// the owner does not exist.
    pub async fn create(&self, new: &NewGym) -> Result<Gym, DbError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO gyms (owner_id, name, address, coordinates, amenities, photos,
                               opening_hours, status, monthly_fee)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8::gym_status, $9)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GymRow>(&sql)
            .bind(new.owner_id.into_inner())
            .bind(&new.name)
            .bind(Json(&new.address))
            .bind(Json(new.coordinates))
            .bind(Json(&new.amenities))
            .bind(new.photos.as_ref().map(Json))
            .bind(new.opening_hours.as_ref().map(Json))
            .bind(new.status.unwrap_or_default().to_db())
            .bind(new.monthly_fee)
            .fetch_one(self.pool)
            .await?;

        let gym = Gym::try_from(row)?;
        tracing::info!(
            gym_id = %gym.id,
            owner_id = %gym.owner_id,
            name = %gym.name,
            status = gym.status.to_db(),
            "Created gym"
        );
        Ok(gym)
    }

    /// Fetch a gym by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: GymId) -> Result<Option<Gym>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM gyms WHERE id = $1");
        sqlx::query_as::<_, GymRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .map(Gym::try_from)
            .transpose()
    }

    /// List gyms matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &GymFilter) -> Result<Vec<Gym>, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM gyms WHERE TRUE"));
        sql::filter_eq(&mut qb, "owner_id", filter.owner_id.map(GymOwnerId::into_inner));
        sql::filter_enum(&mut qb, "status", filter.status);
        sql::order_and_limit(&mut qb, filter.limit);

        qb.build_query_as::<GymRow>()
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Gym::try_from)
            .collect()
    }

    /// Apply the supplied fields of `patch` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no gym has this id and
    /// [`DbError::ConstraintViolation`] if a new owner does not exist.
    pub async fn update(&self, id: GymId, patch: &GymPatch) -> Result<Gym, DbError> {
        patch.validate()?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE gyms SET updated_at = now()");
        sql::set_if(&mut qb, "owner_id", patch.owner_id.map(GymOwnerId::into_inner));
        sql::set_if(&mut qb, "name", patch.name.as_deref());
        sql::set_if(&mut qb, "address", patch.address.as_ref().map(Json));
        sql::set_if(&mut qb, "coordinates", patch.coordinates.map(Json));
        sql::set_if(&mut qb, "amenities", patch.amenities.as_ref().map(Json));
        sql::set_nullable(
            &mut qb,
            "photos",
            patch.photos.as_ref().map(|photos| photos.as_ref().map(Json)),
        );
        sql::set_nullable(
            &mut qb,
            "opening_hours",
            patch.opening_hours.as_ref().map(|hours| hours.as_ref().map(Json)),
        );
        sql::set_enum_if(&mut qb, "status", patch.status);
        sql::set_if(&mut qb, "monthly_fee", patch.monthly_fee);
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<GymRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        let gym = Gym::try_from(row)?;
        tracing::debug!(gym_id = %id, status = gym.status.to_db(), "Updated gym");
        Ok(gym)
    }

    /// Delete a gym and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no gym has this id and
    /// [`DbError::ConstraintViolation`] while members, visits, messages or
    /// access codes still reference it.
    pub async fn delete(&self, id: GymId) -> Result<Gym, DbError> {
        let sql = format!("DELETE FROM gyms WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, GymRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(gym_id = %id, "Deleted gym");
        Gym::try_from(row)
    }
}

/// A row from the `gyms` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct GymRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    address: Json<Address>,
    coordinates: Json<Coordinates>,
    amenities: Json<Vec<String>>,
    photos: Option<Json<Vec<String>>>,
    opening_hours: Option<Json<OpeningHours>>,
    status: String,
    monthly_fee: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GymRow> for Gym {
    type Error = DbError;

    fn try_from(row: GymRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: GymId(row.id),
            owner_id: GymOwnerId(row.owner_id),
            name: row.name,
            address: row.address.0,
            coordinates: row.coordinates.0,
            amenities: row.amenities.0,
            photos: row.photos.map(|p| p.0),
            opening_hours: row.opening_hours.map(|h| h.0),
            status: GymStatus::from_db(&row.status)?,
            monthly_fee: row.monthly_fee,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
