//! End-to-end smoke test against a live database.
//!
//! Builds a throwaway User -> `GymOwner` -> Gym -> Member chain, checks that
//! the member/home-gym join sees exactly one row, then deletes the chain in
//! reverse order. Cleanup runs whether or not the check passed.

use chrono::Utc;
use clublink_types::{
    Address, Coordinates, GymId, GymOwnerId, GymStatus, MemberHomeGym, MemberId, NewGym,
    NewGymOwner, NewMember, NewUser, SubscriptionStatus, SubscriptionType, UserId, UserRole,
};
use rust_decimal::Decimal;

use crate::error::DbError;
use crate::postgres::PostgresPool;

/// What a successful smoke run created and observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    /// The temporary user.
    pub user_id: UserId,
    /// The temporary owner profile.
    pub gym_owner_id: GymOwnerId,
    /// The temporary gym.
    pub gym_id: GymId,
    /// The temporary member.
    pub member_id: MemberId,
    /// The single joined row.
    pub link: MemberHomeGym,
}

#[derive(Debug, Default)]
struct Created {
    user: Option<UserId>,
    owner: Option<GymOwnerId>,
    gym: Option<GymId>,
    member: Option<MemberId>,
}

/// Run the smoke test and clean up after it.
///
/// # Errors
///
/// Returns the first [`DbError`] raised while building the chain, or
/// [`DbError::Invariant`] if the join does not return exactly one row.
/// Cleanup failures are logged, not returned.
pub async fn run_smoke_test(db: &PostgresPool) -> Result<SmokeReport, DbError> {
    let mut created = Created::default();
    let outcome = exercise(db, &mut created).await;
    cleanup(db, &created).await;

    match &outcome {
        Ok(report) => tracing::info!(
            member_id = %report.member_id,
            gym = %report.link.gym_name,
            "Smoke test passed"
        ),
        Err(e) => tracing::error!(error = %e, "Smoke test failed"),
    }
    outcome
}

async fn exercise(db: &PostgresPool, created: &mut Created) -> Result<SmokeReport, DbError> {
    let stamp = Utc::now().timestamp_millis();

    let user = db
        .users()
        .create(&NewUser {
            email: format!("smoke+{stamp}@example.com"),
            role: UserRole::Owner,
            external_auth_id: format!("smoke_{stamp}"),
        })
        .await?;
    created.user = Some(user.id);

    let owner = db
        .gym_owners()
        .create(&NewGymOwner {
            user_id: user.id,
            business_name: "Smoke Test Fitness".to_owned(),
            contact_phone: None,
        })
        .await?;
    created.owner = Some(owner.id);

    let gym = db
        .gyms()
        .create(&NewGym {
            owner_id: owner.id,
            name: "Smoke Test Gym".to_owned(),
            address: Address {
                street: Some("123 Test".to_owned()),
                city: Some("Testville".to_owned()),
                ..Address::default()
            },
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            amenities: vec!["wifi".to_owned()],
            photos: None,
            opening_hours: None,
            status: Some(GymStatus::Pending),
            monthly_fee: Decimal::new(30_000, 2),
        })
        .await?;
    created.gym = Some(gym.id);

    let member = db
        .members()
        .create(&NewMember {
            user_id: user.id,
            home_gym_id: Some(gym.id),
            subscription_type: Some(SubscriptionType::BasePassport),
            subscription_status: Some(SubscriptionStatus::Active),
            ..NewMember::default()
        })
        .await?;
    created.member = Some(member.id);

    let links = db.members().home_gym_links(member.id).await?;
    let [link] = <[MemberHomeGym; 1]>::try_from(links).map_err(|rows| {
        DbError::Invariant(format!(
            "member/home-gym join returned {} rows, expected 1",
            rows.len()
        ))
    })?;

    Ok(SmokeReport {
        user_id: user.id,
        gym_owner_id: owner.id,
        gym_id: gym.id,
        member_id: member.id,
        link,
    })
}

async fn cleanup(db: &PostgresPool, created: &Created) {
    if let Some(id) = created.member {
        if let Err(e) = db.members().delete(id).await {
            tracing::warn!(member_id = %id, error = %e, "Smoke cleanup failed");
        }
    }
    if let Some(id) = created.gym {
        if let Err(e) = db.gyms().delete(id).await {
            tracing::warn!(gym_id = %id, error = %e, "Smoke cleanup failed");
        }
    }
    if let Some(id) = created.owner {
        if let Err(e) = db.gym_owners().delete(id).await {
            tracing::warn!(gym_owner_id = %id, error = %e, "Smoke cleanup failed");
        }
    }
    if let Some(id) = created.user {
        if let Err(e) = db.users().delete(id).await {
            tracing::warn!(user_id = %id, error = %e, "Smoke cleanup failed");
        }
    }
}
