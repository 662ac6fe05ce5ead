//! Persistence for the `visits` table.

use chrono::{DateTime, Utc};
use clublink_types::{GymId, MemberId, NewVisit, Visit, VisitFilter, VisitId, VisitPatch, VisitStatus};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::codec::DbEnum;
use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "visit";

const COLUMNS: &str = "id, member_id, gym_id, visit_date, check_in_time, check_out_time, \
                       status::TEXT AS status, qr_code_used, created_at";

/// Operations on the `visits` table.
pub struct VisitStore<'a> {
    pool: &'a PgPool,
}

impl<'a> VisitStore<'a> {
    /// Create a new visit store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a visit. `visit_date` defaults to now and `status` to
    /// `booked`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if the member or gym does not
    /// exist.
    pub async fn create(&self, new: &NewVisit) -> Result<Visit, DbError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO visits (member_id, gym_id, visit_date, check_in_time, check_out_time,
                                 status, qr_code_used)
             VALUES ($1, $2, COALESCE($3, now()), $4, $5, $6::visit_status, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, VisitRow>(&sql)
            .bind(new.member_id.into_inner())
            .bind(new.gym_id.into_inner())
            .bind(new.visit_date)
            .bind(new.check_in_time)
            .bind(new.check_out_time)
            .bind(new.status.unwrap_or_default().to_db())
            .bind(new.qr_code_used.as_deref())
            .fetch_one(self.pool)
            .await?;

        let visit = Visit::try_from(row)?;
        tracing::info!(
            visit_id = %visit.id,
            member_id = %visit.member_id,
            gym_id = %visit.gym_id,
            status = visit.status.to_db(),
            "Recorded visit"
        );
        Ok(visit)
    }

    /// Fetch a visit by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: VisitId) -> Result<Option<Visit>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM visits WHERE id = $1");
        sqlx::query_as::<_, VisitRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .map(Visit::try_from)
            .transpose()
    }

    /// List visits matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &VisitFilter) -> Result<Vec<Visit>, DbError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM visits WHERE TRUE"));
        sql::filter_eq(&mut qb, "member_id", filter.member_id.map(MemberId::into_inner));
        sql::filter_eq(&mut qb, "gym_id", filter.gym_id.map(GymId::into_inner));
        sql::filter_enum(&mut qb, "status", filter.status);
        sql::order_and_limit(&mut qb, filter.limit);

        qb.build_query_as::<VisitRow>()
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Visit::try_from)
            .collect()
    }

    /// Apply the supplied fields of `patch`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no visit has this id and
    /// [`DbError::ConstraintViolation`] if the resulting check-out would
    /// precede the check-in.
    pub async fn update(&self, id: VisitId, patch: &VisitPatch) -> Result<Visit, DbError> {
        patch.validate()?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE visits SET id = id");
        sql::set_if(&mut qb, "visit_date", patch.visit_date);
        sql::set_nullable(&mut qb, "check_in_time", patch.check_in_time);
        sql::set_nullable(&mut qb, "check_out_time", patch.check_out_time);
        sql::set_enum_if(&mut qb, "status", patch.status);
        sql::set_nullable(
            &mut qb,
            "qr_code_used",
            patch.qr_code_used.as_ref().map(Option::as_deref),
        );
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<VisitRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        let visit = Visit::try_from(row)?;
        tracing::debug!(visit_id = %id, status = visit.status.to_db(), "Updated visit");
        Ok(visit)
    }

    /// Delete a visit and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no visit has this id.
    pub async fn delete(&self, id: VisitId) -> Result<Visit, DbError> {
        let sql = format!("DELETE FROM visits WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, VisitRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(visit_id = %id, "Deleted visit");
        Visit::try_from(row)
    }
}

/// A row from the `visits` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct VisitRow {
    id: Uuid,
    member_id: Uuid,
    gym_id: Uuid,
    visit_date: DateTime<Utc>,
    check_in_time: Option<DateTime<Utc>>,
    check_out_time: Option<DateTime<Utc>>,
    status: String,
    qr_code_used: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<VisitRow> for Visit {
    type Error = DbError;

    fn try_from(row: VisitRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: VisitId(row.id),
            member_id: MemberId(row.member_id),
            gym_id: GymId(row.gym_id),
            visit_date: row.visit_date,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            status: VisitStatus::from_db(&row.status)?,
            qr_code_used: row.qr_code_used,
            created_at: row.created_at,
        })
    }
}
