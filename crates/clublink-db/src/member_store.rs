//! Persistence for the `members` table and the member/home-gym join.

use chrono::{DateTime, Utc};
use clublink_types::{
    GymId, Member, MemberFilter, MemberHomeGym, MemberId, MemberPatch, MemberPreferences,
    NewMember, SocialAccounts, SubscriptionStatus, SubscriptionType, UserId,
};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::codec::{DbEnum, opt_from_db};
use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "member";

const COLUMNS: &str = "id, user_id, home_gym_id, preferred_name, age, occupation, location, \
                       athlete_type, subscription_type::TEXT AS subscription_type, \
                       subscription_status::TEXT AS subscription_status, profile_photo, bio, \
                       phone, social_accounts, preferences, created_at, updated_at";

/// Operations on the `members` table.
pub struct MemberStore<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberStore<'a> {
    /// Create a new member store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a member profile.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ConstraintViolation`] if the user or home gym does
    /// not exist.
    pub async fn create(&self, new: &NewMember) -> Result<Member, DbError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO members (user_id, home_gym_id, preferred_name, age, occupation, location,
                                  athlete_type, subscription_type, subscription_status,
                                  profile_photo, bio, phone, social_accounts, preferences)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8::subscription_type,
                     $9::subscription_status, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(new.user_id.into_inner())
            .bind(new.home_gym_id.map(GymId::into_inner))
            .bind(new.preferred_name.as_deref())
            .bind(new.age)
            .bind(new.occupation.as_deref())
            .bind(new.location.as_deref())
            .bind(new.athlete_type.as_ref().map(Json))
            .bind(new.subscription_type.map(DbEnum::to_db))
            .bind(new.subscription_status.map(DbEnum::to_db))
            .bind(new.profile_photo.as_deref())
            .bind(new.bio.as_deref())
            .bind(new.phone.as_deref())
            .bind(new.social_accounts.as_ref().map(Json))
            .bind(new.preferences.as_ref().map(Json))
            .fetch_one(self.pool)
            .await?;

        let member = Member::try_from(row)?;
        tracing::info!(
            member_id = %member.id,
            user_id = %member.user_id,
            home_gym_id = ?member.home_gym_id.map(GymId::into_inner),
            "Created member"
        );
        Ok(member)
    }

    /// Fetch a member profile by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, MemberRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .map(Member::try_from)
            .transpose()
    }

    /// List member profiles matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &MemberFilter) -> Result<Vec<Member>, DbError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM members WHERE TRUE"));
        sql::filter_eq(&mut qb, "user_id", filter.user_id.map(UserId::into_inner));
        sql::filter_eq(&mut qb, "home_gym_id", filter.home_gym_id.map(GymId::into_inner));
        sql::filter_enum(&mut qb, "subscription_type", filter.subscription_type);
        sql::filter_enum(&mut qb, "subscription_status", filter.subscription_status);
        sql::order_and_limit(&mut qb, filter.limit);

        qb.build_query_as::<MemberRow>()
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Member::try_from)
            .collect()
    }

    /// Apply the supplied fields of `patch` and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no member has this id and
    /// [`DbError::ConstraintViolation`] if a new home gym does not exist.
    pub async fn update(&self, id: MemberId, patch: &MemberPatch) -> Result<Member, DbError> {
        patch.validate()?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE members SET updated_at = now()");
        sql::set_nullable(
            &mut qb,
            "home_gym_id",
            patch.home_gym_id.map(|gym| gym.map(GymId::into_inner)),
        );
        sql::set_nullable(
            &mut qb,
            "preferred_name",
            patch.preferred_name.as_ref().map(Option::as_deref),
        );
        sql::set_nullable(&mut qb, "age", patch.age);
        sql::set_nullable(&mut qb, "occupation", patch.occupation.as_ref().map(Option::as_deref));
        sql::set_nullable(&mut qb, "location", patch.location.as_ref().map(Option::as_deref));
        sql::set_nullable(
            &mut qb,
            "athlete_type",
            patch.athlete_type.as_ref().map(|types| types.as_ref().map(Json)),
        );
        sql::set_nullable_enum(&mut qb, "subscription_type", patch.subscription_type);
        sql::set_nullable_enum(&mut qb, "subscription_status", patch.subscription_status);
        sql::set_nullable(
            &mut qb,
            "profile_photo",
            patch.profile_photo.as_ref().map(Option::as_deref),
        );
        sql::set_nullable(&mut qb, "bio", patch.bio.as_ref().map(Option::as_deref));
        sql::set_nullable(&mut qb, "phone", patch.phone.as_ref().map(Option::as_deref));
        sql::set_nullable(
            &mut qb,
            "social_accounts",
            patch.social_accounts.as_ref().map(|accounts| accounts.as_ref().map(Json)),
        );
        sql::set_nullable(
            &mut qb,
            "preferences",
            patch.preferences.as_ref().map(|prefs| prefs.as_ref().map(Json)),
        );
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<MemberRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::debug!(member_id = %id, "Updated member");
        Member::try_from(row)
    }

    /// Delete a member profile and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no member has this id and
    /// [`DbError::ConstraintViolation`] while visits still reference it.
    pub async fn delete(&self, id: MemberId) -> Result<Member, DbError> {
        let sql = format!("DELETE FROM members WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, MemberRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(member_id = %id, "Deleted member");
        Member::try_from(row)
    }

    /// Join a member to its user's email and its home gym's name.
    ///
    /// Returns no rows when the member does not exist or has no home gym.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn home_gym_links(&self, id: MemberId) -> Result<Vec<MemberHomeGym>, DbError> {
        let rows: Vec<(Uuid, String, String)> = sqlx::query_as(
            r"SELECT m.id, u.email, g.name AS gym_name
              FROM members m
              JOIN users u ON u.id = m.user_id
              JOIN gyms g ON g.id = m.home_gym_id
              WHERE m.id = $1",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(member_id, email, gym_name)| MemberHomeGym {
                member_id: MemberId(member_id),
                email,
                gym_name,
            })
            .collect())
    }
}

/// A row from the `members` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    user_id: Uuid,
    home_gym_id: Option<Uuid>,
    preferred_name: Option<String>,
    age: Option<i32>,
    occupation: Option<String>,
    location: Option<String>,
    athlete_type: Option<Json<Vec<String>>>,
    subscription_type: Option<String>,
    subscription_status: Option<String>,
    profile_photo: Option<String>,
    bio: Option<String>,
    phone: Option<String>,
    social_accounts: Option<Json<SocialAccounts>>,
    preferences: Option<Json<MemberPreferences>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MemberRow> for Member {
    type Error = DbError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MemberId(row.id),
            user_id: UserId(row.user_id),
            home_gym_id: row.home_gym_id.map(GymId),
            preferred_name: row.preferred_name,
            age: row.age,
            occupation: row.occupation,
            location: row.location,
            athlete_type: row.athlete_type.map(|t| t.0),
            subscription_type: opt_from_db::<SubscriptionType>(row.subscription_type.as_deref())?,
            subscription_status: opt_from_db::<SubscriptionStatus>(
                row.subscription_status.as_deref(),
            )?,
            profile_photo: row.profile_photo,
            bio: row.bio,
            phone: row.phone,
            social_accounts: row.social_accounts.map(|s| s.0),
            preferences: row.preferences.map(|p| p.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
