//! Persistence for the `access_codes` table.
//!
//! Access codes are single-use invitations with a deadline. Redemption is
//! one conditional `UPDATE`, so two concurrent redeems of the same code
//! cannot both succeed.

use chrono::{DateTime, Utc};
use clublink_types::{
    AccessCode, AccessCodeFilter, AccessCodeId, AccessCodePatch, GymId, NewAccessCode, UserRole,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::codec::DbEnum;
use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "access code";

const COLUMNS: &str =
    "id, code, gym_id, email, role::TEXT AS role, expires_at, used_at, created_at";

/// Operations on the `access_codes` table.
pub struct AccessCodeStore<'a> {
    pool: &'a PgPool,
}

impl<'a> AccessCodeStore<'a> {
    /// Create a new access code store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Issue an access code.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if the code already exists or
    /// the gym does not.
    pub async fn create(&self, new: &NewAccessCode) -> Result<AccessCode, DbError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO access_codes (code, gym_id, email, role, expires_at)
             VALUES ($1, $2, $3, $4::user_role, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccessCodeRow>(&sql)
            .bind(&new.code)
            .bind(new.gym_id.map(GymId::into_inner))
            .bind(&new.email)
            .bind(new.role.to_db())
            .bind(new.expires_at)
            .fetch_one(self.pool)
            .await?;

        let code = AccessCode::try_from(row)?;
        tracing::info!(
            access_code_id = %code.id,
            role = code.role.to_db(),
            gym_id = ?code.gym_id.map(GymId::into_inner),
            "Issued access code"
        );
        Ok(code)
    }

    /// Fetch an access code by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: AccessCodeId) -> Result<Option<AccessCode>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM access_codes WHERE id = $1");
        sqlx::query_as::<_, AccessCodeRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .map(AccessCode::try_from)
            .transpose()
    }

    /// Fetch an access code by its token.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<AccessCode>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM access_codes WHERE code = $1");
        sqlx::query_as::<_, AccessCodeRow>(&sql)
            .bind(code)
            .fetch_optional(self.pool)
            .await?
            .map(AccessCode::try_from)
            .transpose()
    }

    /// List access codes matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &AccessCodeFilter) -> Result<Vec<AccessCode>, DbError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM access_codes WHERE TRUE"));
        sql::filter_eq(&mut qb, "gym_id", filter.gym_id.map(GymId::into_inner));
        sql::filter_eq(&mut qb, "email", filter.email.as_deref());
        sql::filter_enum(&mut qb, "role", filter.role);
        if filter.unused_only {
            qb.push(" AND used_at IS NULL");
        }
        sql::order_and_limit(&mut qb, filter.limit);

        qb.build_query_as::<AccessCodeRow>()
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(AccessCode::try_from)
            .collect()
    }

    /// Apply the supplied fields of `patch`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no access code has this id and
    /// [`DbError::ConstraintViolation`] if a new gym does not exist.
    pub async fn update(
        &self,
        id: AccessCodeId,
        patch: &AccessCodePatch,
    ) -> Result<AccessCode, DbError> {
        patch.validate()?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE access_codes SET id = id");
        sql::set_nullable(&mut qb, "gym_id", patch.gym_id.map(|gym| gym.map(GymId::into_inner)));
        sql::set_if(&mut qb, "email", patch.email.as_deref());
        sql::set_enum_if(&mut qb, "role", patch.role);
        sql::set_if(&mut qb, "expires_at", patch.expires_at);
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<AccessCodeRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;
        AccessCode::try_from(row)
    }

    /// Redeem `code` at time `at`, stamping `used_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if the code does not exist and
    /// [`DbError::ConstraintViolation`] if it was already used or has
    /// expired.
    pub async fn redeem(&self, code: &str, at: DateTime<Utc>) -> Result<AccessCode, DbError> {
        let sql = format!(
            "UPDATE access_codes SET used_at = $2
             WHERE code = $1 AND used_at IS NULL AND expires_at > $2
             RETURNING {COLUMNS}"
        );
        let redeemed = sqlx::query_as::<_, AccessCodeRow>(&sql)
            .bind(code)
            .bind(at)
            .fetch_optional(self.pool)
            .await?;

        if let Some(row) = redeemed {
            let redeemed = AccessCode::try_from(row)?;
            tracing::info!(
                access_code_id = %redeemed.id,
                role = redeemed.role.to_db(),
                "Redeemed access code"
            );
            return Ok(redeemed);
        }

        // Nothing matched; report why.
        let existing = self
            .get_by_code(code)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, code))?;
        if existing.used_at.is_some() {
            return Err(DbError::constraint(
                "access_codes_single_use",
                format!("access code {code} has already been used"),
            ));
        }
        Err(DbError::constraint(
            "access_codes_not_expired",
            format!("access code {code} expired at {}", existing.expires_at),
        ))
    }

    /// Delete an access code and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no access code has this id.
    pub async fn delete(&self, id: AccessCodeId) -> Result<AccessCode, DbError> {
        let sql = format!("DELETE FROM access_codes WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, AccessCodeRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(access_code_id = %id, "Deleted access code");
        AccessCode::try_from(row)
    }
}

/// A row from the `access_codes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct AccessCodeRow {
    id: Uuid,
    code: String,
    gym_id: Option<Uuid>,
    email: String,
    role: String,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccessCodeRow> for AccessCode {
    type Error = DbError;

    fn try_from(row: AccessCodeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AccessCodeId(row.id),
            code: row.code,
            gym_id: row.gym_id.map(GymId),
            email: row.email,
            role: UserRole::from_db(&row.role)?,
            expires_at: row.expires_at,
            used_at: row.used_at,
            created_at: row.created_at,
        })
    }
}
