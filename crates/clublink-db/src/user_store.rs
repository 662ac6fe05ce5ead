//! Persistence for the `users` table.
//!
//! Users are the root of every other entity. `email` and
//! `external_auth_id` are unique; a duplicate surfaces as
//! [`DbError::ConstraintViolation`] naming `users_email_key` or
//! `users_external_auth_id_key`.

use chrono::{DateTime, Utc};
use clublink_types::{NewUser, User, UserFilter, UserId, UserPatch, UserRole};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::codec::DbEnum;
use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "user";

const COLUMNS: &str = "id, email, role::TEXT AS role, external_auth_id, created_at, updated_at";

/// Operations on the `users` table.
pub struct UserStore<'a> {
    pool: &'a PgPool,
}

impl<'a> UserStore<'a> {
    /// Create a new user store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] for malformed input and
    /// [`DbError::ConstraintViolation`] if the email or external auth id is
    /// already taken.
    pub async fn create(&self, new: &NewUser) -> Result<User, DbError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO users (email, role, external_auth_id)
             VALUES ($1, $2::user_role, $3)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new.email)
            .bind(new.role.to_db())
            .bind(&new.external_auth_id)
            .fetch_one(self.pool)
            .await?;

        let user = User::try_from(row)?;
        tracing::info!(user_id = %user.id, role = user.role.to_db(), "Created user");
        Ok(user)
    }

    /// Fetch a user by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, DbError> {
        self.fetch_one_where("id = $1", id.into_inner()).await
    }

    /// Fetch a user by login email.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.fetch_one_where("email = $1", email).await
    }

    /// Fetch a user by identity provider subject id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_external_auth_id(
        &self,
        external_auth_id: &str,
    ) -> Result<Option<User>, DbError> {
        self.fetch_one_where("external_auth_id = $1", external_auth_id)
            .await
    }

    async fn fetch_one_where<T>(&self, predicate: &str, value: T) -> Result<Option<User>, DbError>
    where
        T: for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send,
    {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE {predicate}");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// List users matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM users WHERE TRUE"));
        sql::filter_enum(&mut qb, "role", filter.role);
        sql::filter_eq(&mut qb, "email", filter.email.as_deref());
        sql::order_and_limit(&mut qb, filter.limit);

        qb.build_query_as::<UserRow>()
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Apply the supplied fields of `patch` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no user has this id and
    /// [`DbError::ConstraintViolation`] if the new email or external auth id
    /// collides with another user.
    pub async fn update(&self, id: UserId, patch: &UserPatch) -> Result<User, DbError> {
        patch.validate()?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");
        sql::set_if(&mut qb, "email", patch.email.as_deref());
        sql::set_enum_if(&mut qb, "role", patch.role);
        sql::set_if(&mut qb, "external_auth_id", patch.external_auth_id.as_deref());
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<UserRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::debug!(user_id = %id, "Updated user");
        User::try_from(row)
    }

    /// Delete a user and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no user has this id and
    /// [`DbError::ConstraintViolation`] while any owner profile, member
    /// profile, message or subscription still references the user.
    pub async fn delete(&self, id: UserId) -> Result<User, DbError> {
        let sql = format!("DELETE FROM users WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(user_id = %id, "Deleted user");
        User::try_from(row)
    }
}

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    role: String,
    external_auth_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId(row.id),
            email: row.email,
            role: UserRole::from_db(&row.role)?,
            external_auth_id: row.external_auth_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
