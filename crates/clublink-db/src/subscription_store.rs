//! Persistence for the `subscriptions` table.
//!
//! Rows mirror the billing provider's view of a subscription. No payment
//! logic lives here; `external_billing_id` is opaque.

use chrono::{DateTime, Utc};
use clublink_types::{
    NewSubscription, Subscription, SubscriptionFilter, SubscriptionId, SubscriptionPatch,
    SubscriptionStatus, SubscriptionType, UserId,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::codec::DbEnum;
use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "subscription";

const COLUMNS: &str = r#"id, user_id, "type"::TEXT AS subscription_type, status::TEXT AS status,
                        current_period_start, current_period_end, external_billing_id,
                        created_at, updated_at"#;

/// Operations on the `subscriptions` table.
pub struct SubscriptionStore<'a> {
    pool: &'a PgPool,
}

impl<'a> SubscriptionStore<'a> {
    /// Create a new subscription store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the period is not ordered and
    /// [`DbError::ConstraintViolation`] if the user does not exist.
    pub async fn create(&self, new: &NewSubscription) -> Result<Subscription, DbError> {
        new.validate()?;

        let sql = format!(
            r#"INSERT INTO subscriptions (user_id, "type", status, current_period_start,
                                         current_period_end, external_billing_id)
               VALUES ($1, $2::subscription_type, $3::subscription_status, $4, $5, $6)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(new.user_id.into_inner())
            .bind(new.subscription_type.to_db())
            .bind(new.status.to_db())
            .bind(new.current_period_start)
            .bind(new.current_period_end)
            .bind(&new.external_billing_id)
            .fetch_one(self.pool)
            .await?;

        let sub = Subscription::try_from(row)?;
        tracing::info!(
            subscription_id = %sub.id,
            user_id = %sub.user_id,
            plan = sub.subscription_type.to_db(),
            "Created subscription"
        );
        Ok(sub)
    }

    /// Fetch a subscription by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: SubscriptionId) -> Result<Option<Subscription>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1");
        sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .map(Subscription::try_from)
            .transpose()
    }

    /// List subscriptions matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE TRUE"
        ));
        sql::filter_eq(&mut qb, "user_id", filter.user_id.map(UserId::into_inner));
        sql::filter_enum(&mut qb, "\"type\"", filter.subscription_type);
        sql::filter_enum(&mut qb, "status", filter.status);
        sql::order_and_limit(&mut qb, filter.limit);

        qb.build_query_as::<SubscriptionRow>()
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Subscription::try_from)
            .collect()
    }

    /// Apply the supplied fields of `patch` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no subscription has this id and
    /// [`DbError::ConstraintViolation`] if the resulting period would be
    /// empty.
    pub async fn update(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> Result<Subscription, DbError> {
        patch.validate()?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE subscriptions SET updated_at = now()");
        sql::set_enum_if(&mut qb, "\"type\"", patch.subscription_type);
        sql::set_enum_if(&mut qb, "status", patch.status);
        sql::set_if(&mut qb, "current_period_start", patch.current_period_start);
        sql::set_if(&mut qb, "current_period_end", patch.current_period_end);
        sql::set_if(&mut qb, "external_billing_id", patch.external_billing_id.as_deref());
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<SubscriptionRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        let sub = Subscription::try_from(row)?;
        tracing::debug!(subscription_id = %id, status = sub.status.to_db(), "Updated subscription");
        Ok(sub)
    }

    /// Delete a subscription and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no subscription has this id.
    pub async fn delete(&self, id: SubscriptionId) -> Result<Subscription, DbError> {
        let sql = format!("DELETE FROM subscriptions WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(subscription_id = %id, "Deleted subscription");
        Subscription::try_from(row)
    }
}

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    subscription_type: String,
    status: String,
    current_period_start: DateTime<Utc>,
    current_period_end: DateTime<Utc>,
    external_billing_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DbError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SubscriptionId(row.id),
            user_id: UserId(row.user_id),
            subscription_type: SubscriptionType::from_db(&row.subscription_type)?,
            status: SubscriptionStatus::from_db(&row.status)?,
            current_period_start: row.current_period_start,
            current_period_end: row.current_period_end,
            external_billing_id: row.external_billing_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
