//! Demo data for local development.
//!
//! [`seed_demo_data`] inserts a small, fully linked network: six users,
//! two gym owners with one gym each, three members, and a handful of
//! visits, messages, access codes and subscriptions. The row builders are
//! plain functions so the data set can be inspected without a database.
//!
//! Seeding is not idempotent: running it twice fails on the unique emails.

use chrono::{DateTime, Utc};
use clublink_types::{
    Address, Coordinates, DayHours, GymId, GymOwnerId, GymStatus, MemberId, MemberPreferences,
    NewAccessCode, NewGym, NewGymOwner, NewMember, NewMessage, NewSubscription, NewUser,
    NewVisit, OpeningHours, SocialAccounts, SubscriptionStatus, SubscriptionType, UserId,
    UserRole, VisitStatus,
};
use rust_decimal::Decimal;

use crate::error::DbError;
use crate::maintenance::TableCount;
use crate::postgres::PostgresPool;
use crate::tables::Table;

/// Parse a fixed RFC 3339 timestamp.
fn utc(text: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DbError::Invariant(format!("bad seed timestamp {text}: {e}")))
}

/// Turn a vector into a fixed-size array.
fn fixed<T, const N: usize>(items: Vec<T>, what: &str) -> Result<[T; N], DbError> {
    items.try_into().map_err(|rest: Vec<T>| {
        DbError::Invariant(format!("expected {N} {what}, got {}", rest.len()))
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn count(table: Table, rows: usize) -> TableCount {
    TableCount {
        table,
        rows: u64::try_from(rows).unwrap_or(u64::MAX),
    }
}

// ---------------------------------------------------------------------------
// Row builders
// ---------------------------------------------------------------------------

/// One admin, two owners, three members.
pub fn demo_users() -> [NewUser; 6] {
    let user = |email: &str, role, auth: &str| NewUser {
        email: email.to_owned(),
        role,
        external_auth_id: auth.to_owned(),
    };
    [
        user("admin@clublink.com", UserRole::Admin, "clerk_admin_001"),
        user("owner1@clublink.com", UserRole::Owner, "clerk_owner_001"),
        user("owner2@clublink.com", UserRole::Owner, "clerk_owner_002"),
        user("member1@clublink.com", UserRole::Member, "clerk_member_001"),
        user("member2@clublink.com", UserRole::Member, "clerk_member_002"),
        user("member3@clublink.com", UserRole::Member, "clerk_member_003"),
    ]
}

/// Business profiles for the two owner users.
pub fn demo_gym_owners(owner_users: [UserId; 2]) -> [NewGymOwner; 2] {
    let [first, second] = owner_users;
    [
        NewGymOwner {
            user_id: first,
            business_name: "Elite Fitness Center".to_owned(),
            contact_phone: Some("+1-555-0101".to_owned()),
        },
        NewGymOwner {
            user_id: second,
            business_name: "PowerHouse Gym".to_owned(),
            contact_phone: Some("+1-555-0102".to_owned()),
        },
    ]
}

fn manhattan(street: &str, zip_code: &str) -> Address {
    Address {
        street: Some(street.to_owned()),
        line2: None,
        city: Some("New York".to_owned()),
        state: Some("NY".to_owned()),
        zip_code: Some(zip_code.to_owned()),
        country: Some("USA".to_owned()),
    }
}

/// One active gym per owner.
pub fn demo_gyms(owners: [GymOwnerId; 2]) -> [NewGym; 2] {
    let [elite, powerhouse] = owners;
    let weekend = DayHours::new("08:00", "20:00");
    [
        NewGym {
            owner_id: elite,
            name: "Elite Fitness Center - Downtown".to_owned(),
            address: manhattan("123 Main St", "10001"),
            coordinates: Coordinates {
                lat: 40.7589,
                lng: -73.9851,
            },
            amenities: strings(&[
                "Cardio Equipment",
                "Weight Training",
                "Group Classes",
                "Personal Training",
                "Locker Rooms",
            ]),
            photos: Some(strings(&[
                "https://example.com/gym1-1.jpg",
                "https://example.com/gym1-2.jpg",
            ])),
            opening_hours: Some(OpeningHours::weekdays_and_weekend(
                &DayHours::new("06:00", "22:00"),
                &weekend,
                &weekend,
            )),
            status: Some(GymStatus::Active),
            monthly_fee: Decimal::new(30_000, 2),
        },
        NewGym {
            owner_id: powerhouse,
            name: "PowerHouse Gym - Midtown".to_owned(),
            address: manhattan("456 Park Ave", "10022"),
            coordinates: Coordinates {
                lat: 40.7614,
                lng: -73.9776,
            },
            amenities: strings(&["Heavy Lifting", "CrossFit", "Boxing", "Yoga Studio", "Sauna"]),
            photos: Some(strings(&[
                "https://example.com/gym2-1.jpg",
                "https://example.com/gym2-2.jpg",
            ])),
            opening_hours: Some(OpeningHours::weekdays_and_weekend(
                &DayHours::new("05:00", "23:00"),
                &DayHours::new("06:00", "21:00"),
                &DayHours::new("07:00", "20:00"),
            )),
            status: Some(GymStatus::Active),
            monthly_fee: Decimal::new(35_000, 2),
        },
    ]
}

/// Profiles for the three member users. The first and third train at the
/// first gym, the second at the other.
pub fn demo_members(member_users: [UserId; 3], gyms: [GymId; 2]) -> [NewMember; 3] {
    let [alex, sarah, mike] = member_users;
    let [downtown, midtown] = gyms;
    let prefs = |time: &str, classes: &[&str], equipment: &[&str]| MemberPreferences {
        workout_time: Some(time.to_owned()),
        favorite_classes: strings(classes),
        equipment: strings(equipment),
    };
    [
        NewMember {
            user_id: alex,
            home_gym_id: Some(downtown),
            preferred_name: Some("Alex Johnson".to_owned()),
            age: Some(28),
            occupation: Some("Software Engineer".to_owned()),
            location: Some("New York, NY".to_owned()),
            athlete_type: Some(strings(&["Fitness Enthusiast", "Runner"])),
            subscription_type: Some(SubscriptionType::BasePassport),
            subscription_status: Some(SubscriptionStatus::Active),
            profile_photo: Some("https://example.com/profile1.jpg".to_owned()),
            bio: Some("Passionate about fitness and always looking for new challenges.".to_owned()),
            phone: Some("+1-555-0201".to_owned()),
            social_accounts: Some(SocialAccounts {
                instagram: Some("@alexfitness".to_owned()),
                twitter: Some("@alexjohnson".to_owned()),
                ..SocialAccounts::default()
            }),
            preferences: Some(prefs("evening", &["HIIT", "Yoga"], &["treadmill", "dumbbells"])),
        },
        NewMember {
            user_id: sarah,
            home_gym_id: Some(midtown),
            preferred_name: Some("Sarah Chen".to_owned()),
            age: Some(32),
            occupation: Some("Marketing Manager".to_owned()),
            location: Some("New York, NY".to_owned()),
            athlete_type: Some(strings(&["CrossFitter", "Weight Lifter"])),
            subscription_type: Some(SubscriptionType::UnlimitedRoamer),
            subscription_status: Some(SubscriptionStatus::Active),
            profile_photo: Some("https://example.com/profile2.jpg".to_owned()),
            bio: Some("CrossFit enthusiast who loves pushing limits and building strength.".to_owned()),
            phone: Some("+1-555-0202".to_owned()),
            social_accounts: Some(SocialAccounts {
                instagram: Some("@sarahcrossfit".to_owned()),
                facebook: Some("sarah.chen.fitness".to_owned()),
                ..SocialAccounts::default()
            }),
            preferences: Some(prefs(
                "morning",
                &["CrossFit", "Strength Training"],
                &["barbell", "kettlebell"],
            )),
        },
        NewMember {
            user_id: mike,
            home_gym_id: Some(downtown),
            preferred_name: Some("Mike Rodriguez".to_owned()),
            age: Some(25),
            occupation: Some("Personal Trainer".to_owned()),
            location: Some("New York, NY".to_owned()),
            athlete_type: Some(strings(&["Bodybuilder", "Trainer"])),
            subscription_type: Some(SubscriptionType::BasePassport),
            subscription_status: Some(SubscriptionStatus::Active),
            profile_photo: Some("https://example.com/profile3.jpg".to_owned()),
            bio: Some(
                "Certified personal trainer helping others achieve their fitness goals.".to_owned(),
            ),
            phone: Some("+1-555-0203".to_owned()),
            social_accounts: Some(SocialAccounts {
                instagram: Some("@miketrainer".to_owned()),
                linkedin: Some("mike-rodriguez-trainer".to_owned()),
                ..SocialAccounts::default()
            }),
            preferences: Some(prefs(
                "afternoon",
                &["Strength Training", "Cardio"],
                &["machines", "free weights"],
            )),
        },
    ]
}

/// Two completed visits and one still in progress.
///
/// # Errors
///
/// Returns [`DbError::Invariant`] if a fixed timestamp fails to parse.
pub fn demo_visits(members: [MemberId; 3], gyms: [GymId; 2]) -> Result<[NewVisit; 3], DbError> {
    let [alex, sarah, mike] = members;
    let [downtown, midtown] = gyms;
    Ok([
        NewVisit {
            member_id: alex,
            gym_id: downtown,
            visit_date: Some(utc("2024-01-15T10:00:00Z")?),
            check_in_time: Some(utc("2024-01-15T10:05:00Z")?),
            check_out_time: Some(utc("2024-01-15T11:30:00Z")?),
            status: Some(VisitStatus::Completed),
            qr_code_used: Some("qr_visit_001".to_owned()),
        },
        NewVisit {
            member_id: sarah,
            gym_id: midtown,
            visit_date: Some(utc("2024-01-16T07:00:00Z")?),
            check_in_time: Some(utc("2024-01-16T07:02:00Z")?),
            check_out_time: Some(utc("2024-01-16T08:15:00Z")?),
            status: Some(VisitStatus::Completed),
            qr_code_used: Some("qr_visit_002".to_owned()),
        },
        NewVisit {
            member_id: mike,
            gym_id: downtown,
            visit_date: Some(utc("2024-01-17T14:00:00Z")?),
            check_in_time: Some(utc("2024-01-17T14:10:00Z")?),
            check_out_time: None,
            status: Some(VisitStatus::CheckedIn),
            qr_code_used: Some("qr_visit_003".to_owned()),
        },
    ])
}

/// An admin/owner exchange and a member question, all about the first gym.
///
/// `users` is `[admin, first owner, first member]`.
///
/// # Errors
///
/// Returns [`DbError::Invariant`] if a fixed timestamp fails to parse.
pub fn demo_messages(users: [UserId; 3], gym: GymId) -> Result<[NewMessage; 3], DbError> {
    let [admin, owner, member] = users;
    let message = |sender, recipient, content: &str, read_at| NewMessage {
        sender_id: sender,
        recipient_id: recipient,
        gym_id: Some(gym),
        content: content.to_owned(),
        read_at,
    };
    Ok([
        message(
            admin,
            owner,
            "Welcome to Club Link! Your gym has been approved and is now live.",
            Some(utc("2024-01-10T09:00:00Z")?),
        ),
        message(
            owner,
            admin,
            "Thank you! We're excited to be part of the Club Link network.",
            None,
        ),
        message(
            member,
            owner,
            "Hi! I have a question about the new equipment you mentioned.",
            None,
        ),
    ])
}

/// A gym-scoped member invitation and a system-wide admin invitation.
///
/// # Errors
///
/// Returns [`DbError::Invariant`] if a fixed timestamp fails to parse.
pub fn demo_access_codes(gym: GymId) -> Result<[NewAccessCode; 2], DbError> {
    let expires_at = utc("2024-02-15T23:59:59Z")?;
    Ok([
        NewAccessCode {
            code: "WELCOME2024".to_owned(),
            gym_id: Some(gym),
            email: "newmember@example.com".to_owned(),
            role: UserRole::Member,
            expires_at,
        },
        NewAccessCode {
            code: "ADMIN2024".to_owned(),
            gym_id: None,
            email: "newadmin@example.com".to_owned(),
            role: UserRole::Admin,
            expires_at,
        },
    ])
}

/// January 2024 subscriptions for the three member users.
///
/// # Errors
///
/// Returns [`DbError::Invariant`] if a fixed timestamp fails to parse.
pub fn demo_subscriptions(member_users: [UserId; 3]) -> Result<[NewSubscription; 3], DbError> {
    let [alex, sarah, mike] = member_users;
    let start = utc("2024-01-01T00:00:00Z")?;
    let end = utc("2024-01-31T23:59:59Z")?;
    let sub = |user_id, subscription_type, billing: &str| NewSubscription {
        user_id,
        subscription_type,
        status: SubscriptionStatus::Active,
        current_period_start: start,
        current_period_end: end,
        external_billing_id: billing.to_owned(),
    };
    Ok([
        sub(alex, SubscriptionType::BasePassport, "sub_base_passport_001"),
        sub(sarah, SubscriptionType::UnlimitedRoamer, "sub_unlimited_roamer_001"),
        sub(mike, SubscriptionType::BasePassport, "sub_base_passport_002"),
    ])
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Insert the demo data set and return how many rows went into each table,
/// in creation order.
///
/// # Errors
///
/// Returns [`DbError::ConstraintViolation`] if the data (or part of it) is
/// already present, or any other [`DbError`] from the stores.
pub async fn seed_demo_data(db: &PostgresPool) -> Result<Vec<TableCount>, DbError> {
    let mut user_ids = Vec::new();
    for new in &demo_users() {
        user_ids.push(db.users().create(new).await?.id);
    }
    let [admin, owner1, owner2, member1, member2, member3] = fixed(user_ids, "users")?;
    tracing::info!(count = 6, "Seeded users");

    let mut owner_ids = Vec::new();
    for new in &demo_gym_owners([owner1, owner2]) {
        owner_ids.push(db.gym_owners().create(new).await?.id);
    }
    let owner_ids: [GymOwnerId; 2] = fixed(owner_ids, "gym owners")?;

    let mut gym_ids = Vec::new();
    for new in &demo_gyms(owner_ids) {
        gym_ids.push(db.gyms().create(new).await?.id);
    }
    let gym_ids: [GymId; 2] = fixed(gym_ids, "gyms")?;
    let [downtown, _] = gym_ids;
    tracing::info!(owners = 2, gyms = 2, "Seeded gym owners and gyms");

    let member_users = [member1, member2, member3];
    let mut member_ids = Vec::new();
    for new in &demo_members(member_users, gym_ids) {
        member_ids.push(db.members().create(new).await?.id);
    }
    let member_ids: [MemberId; 3] = fixed(member_ids, "members")?;
    tracing::info!(count = 3, "Seeded members");

    let visits = demo_visits(member_ids, gym_ids)?;
    for new in &visits {
        db.visits().create(new).await?;
    }

    let messages = demo_messages([admin, owner1, member1], downtown)?;
    for new in &messages {
        db.messages().create(new).await?;
    }

    let codes = demo_access_codes(downtown)?;
    for new in &codes {
        db.access_codes().create(new).await?;
    }

    let subscriptions = demo_subscriptions(member_users)?;
    for new in &subscriptions {
        db.subscriptions().create(new).await?;
    }

    let summary = vec![
        count(Table::Users, 6),
        count(Table::GymOwners, owner_ids.len()),
        count(Table::Gyms, gym_ids.len()),
        count(Table::Members, member_ids.len()),
        count(Table::Visits, visits.len()),
        count(Table::Messages, messages.len()),
        count(Table::AccessCodes, codes.len()),
        count(Table::Subscriptions, subscriptions.len()),
    ];
    tracing::info!("Seeded demo data");
    Ok(summary)
}
