//! Persistence for the `gym_owners` table.
//!
//! A gym owner is the business profile of exactly one user
//! (`gym_owners_user_id_key`). Gyms reference owners, so an owner with gyms
//! cannot be deleted.

use chrono::{DateTime, Utc};
use clublink_types::{GymOwner, GymOwnerFilter, GymOwnerId, GymOwnerPatch, NewGymOwner, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "gym owner";

const COLUMNS: &str = "id, user_id, business_name, contact_phone, created_at";

/// Operations on the `gym_owners` table.
pub struct GymOwnerStore<'a> {
    pool: &'a PgPool,
}

impl<'a> GymOwnerStore<'a> {
    /// Create a new gym owner store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an owner profile.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if the user does not exist or
    /// already has an owner profile.
    pub async fn create(&self, new: &NewGymOwner) -> Result<GymOwner, DbError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO gym_owners (user_id, business_name, contact_phone)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let owner: GymOwner = sqlx::query_as::<_, GymOwnerRow>(&sql)
            .bind(new.user_id.into_inner())
            .bind(&new.business_name)
            .bind(new.contact_phone.as_deref())
            .fetch_one(self.pool)
            .await?
            .into();

        tracing::info!(
            gym_owner_id = %owner.id,
            user_id = %owner.user_id,
            business_name = %owner.business_name,
            "Created gym owner"
        );
        Ok(owner)
    }

    /// Fetch an owner profile by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: GymOwnerId) -> Result<Option<GymOwner>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM gym_owners WHERE id = $1");
        let row = sqlx::query_as::<_, GymOwnerRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(GymOwner::from))
    }

    /// List owner profiles matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &GymOwnerFilter) -> Result<Vec<GymOwner>, DbError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM gym_owners WHERE TRUE"));
        sql::filter_eq(&mut qb, "user_id", filter.user_id.map(UserId::into_inner));
        sql::order_and_limit(&mut qb, filter.limit);

        let rows = qb
            .build_query_as::<GymOwnerRow>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(GymOwner::from).collect())
    }

    /// Apply the supplied fields of `patch`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no owner profile has this id.
    pub async fn update(&self, id: GymOwnerId, patch: &GymOwnerPatch) -> Result<GymOwner, DbError> {
        patch.validate()?;

        // No updated_at column; `id = id` anchors the SET list.
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE gym_owners SET id = id");
        sql::set_if(&mut qb, "business_name", patch.business_name.as_deref());
        sql::set_nullable(
            &mut qb,
            "contact_phone",
            patch.contact_phone.as_ref().map(Option::as_deref),
        );
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<GymOwnerRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;
        Ok(row.into())
    }

    /// Delete an owner profile and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no owner profile has this id and
    /// [`DbError::ConstraintViolation`] while gyms still reference it.
    pub async fn delete(&self, id: GymOwnerId) -> Result<GymOwner, DbError> {
        let sql = format!("DELETE FROM gym_owners WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, GymOwnerRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(gym_owner_id = %id, "Deleted gym owner");
        Ok(row.into())
    }
}

/// A row from the `gym_owners` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct GymOwnerRow {
    id: Uuid,
    user_id: Uuid,
    business_name: String,
    contact_phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<GymOwnerRow> for GymOwner {
    fn from(row: GymOwnerRow) -> Self {
        Self {
            id: GymOwnerId(row.id),
            user_id: UserId(row.user_id),
            business_name: row.business_name,
            contact_phone: row.contact_phone,
            created_at: row.created_at,
        }
    }
}
