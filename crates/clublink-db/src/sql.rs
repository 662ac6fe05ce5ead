//! Small helpers shared by the stores' dynamic queries.

use sqlx::{Postgres, QueryBuilder};

use crate::codec::DbEnum;

/// Append an `AND col = $n` filter when `value` is present.
pub(crate) fn filter_eq<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, value: Option<T>)
where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(" AND ").push(column).push(" = ").push_bind(value);
    }
}

/// Append an `AND col = $n::type` filter for an enum column.
pub(crate) fn filter_enum<E: DbEnum>(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    value: Option<E>,
) {
    if let Some(value) = value {
        qb.push(" AND ")
            .push(column)
            .push(" = ")
            .push_bind(value.to_db())
            .push("::")
            .push(E::TYPE_NAME);
    }
}

/// Append the stable list ordering and an optional `LIMIT`.
pub(crate) fn order_and_limit(qb: &mut QueryBuilder<'_, Postgres>, limit: Option<u32>) {
    qb.push(" ORDER BY created_at, id");
    if let Some(limit) = limit {
        qb.push(" LIMIT ").push_bind(i64::from(limit));
    }
}

/// Append `, col = $n` to an `UPDATE ... SET` list when `value` is present.
pub(crate) fn set_if<'a, T>(qb: &mut QueryBuilder<'a, Postgres>, column: &str, value: Option<T>)
where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(", ").push(column).push(" = ").push_bind(value);
    }
}

/// Append `, col = $n::type` for an enum column when `value` is present.
pub(crate) fn set_enum_if<E: DbEnum>(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    value: Option<E>,
) {
    if let Some(value) = value {
        qb.push(", ")
            .push(column)
            .push(" = ")
            .push_bind(value.to_db())
            .push("::")
            .push(E::TYPE_NAME);
    }
}

/// Append `, col = $n` when `value` is present, binding `NULL` for
/// `Some(None)`.
#[allow(clippy::option_option)]
pub(crate) fn set_nullable<'a, T>(
    qb: &mut QueryBuilder<'a, Postgres>,
    column: &str,
    value: Option<Option<T>>,
) where
    T: 'a + sqlx::Encode<'a, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(", ").push(column).push(" = ").push_bind(value);
    }
}

/// Append `, col = $n::type` for a nullable enum column when `value` is
/// present.
#[allow(clippy::option_option)]
pub(crate) fn set_nullable_enum<E: DbEnum>(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    value: Option<Option<E>>,
) {
    if let Some(value) = value {
        qb.push(", ")
            .push(column)
            .push(" = ")
            .push_bind(value.map(DbEnum::to_db))
            .push("::")
            .push(E::TYPE_NAME);
    }
}

#[cfg(test)]
mod tests {
    use clublink_types::{SubscriptionType, UserRole};

    use super::*;

    #[test]
    fn filters_render_placeholders_in_order() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM users WHERE TRUE");
        filter_enum(&mut qb, "role", Some(UserRole::Owner));
        filter_eq(&mut qb, "email", None::<String>);
        filter_eq(&mut qb, "email", Some("a@b.c"));
        order_and_limit(&mut qb, Some(5));
        assert_eq!(
            qb.sql(),
            "SELECT id FROM users WHERE TRUE AND role = $1::user_role AND email = $2 \
             ORDER BY created_at, id LIMIT $3"
        );
    }

    #[test]
    fn set_list_skips_absent_fields() {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");
        set_if(&mut qb, "email", None::<&str>);
        set_enum_if(&mut qb, "role", Some(UserRole::Admin));
        assert_eq!(
            qb.sql(),
            "UPDATE users SET updated_at = now(), role = $1::user_role"
        );
    }

    #[test]
    #[allow(clippy::option_option)]
    fn nullable_set_binds_clears_and_skips_absent() {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE members SET updated_at = now()");
        set_nullable(&mut qb, "home_gym_id", Some(None::<uuid::Uuid>));
        set_nullable(&mut qb, "bio", None::<Option<&str>>);
        set_nullable(&mut qb, "phone", Some(Some("555-0100")));
        set_nullable_enum(&mut qb, "subscription_type", Some(None::<SubscriptionType>));
        set_nullable_enum(&mut qb, "subscription_status", None::<Option<SubscriptionType>>);
        assert_eq!(
            qb.sql(),
            "UPDATE members SET updated_at = now(), home_gym_id = $1, phone = $2, \
             subscription_type = $3::subscription_type"
        );
    }
}
