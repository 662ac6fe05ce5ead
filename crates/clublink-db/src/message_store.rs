//! Persistence for the `messages` table.

use chrono::{DateTime, Utc};
use clublink_types::{
    GymId, Message, MessageFilter, MessageId, MessagePatch, NewMessage, UserId,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::error::DbError;
use crate::sql;

const ENTITY: &str = "message";

const COLUMNS: &str = "id, sender_id, recipient_id, gym_id, content, read_at, created_at";

/// Operations on the `messages` table.
pub struct MessageStore<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageStore<'a> {
    /// Create a new message store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a message.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] for blank content and
    /// [`DbError::ConstraintViolation`] if the sender, recipient or gym does
    /// not exist.
    pub async fn create(&self, new: &NewMessage) -> Result<Message, DbError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO messages (sender_id, recipient_id, gym_id, content, read_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let message: Message = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(new.sender_id.into_inner())
            .bind(new.recipient_id.into_inner())
            .bind(new.gym_id.map(GymId::into_inner))
            .bind(&new.content)
            .bind(new.read_at)
            .fetch_one(self.pool)
            .await?
            .into();

        tracing::info!(
            message_id = %message.id,
            sender_id = %message.sender_id,
            recipient_id = %message.recipient_id,
            "Created message"
        );
        Ok(message)
    }

    /// Fetch a message by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn get_by_id(&self, id: MessageId) -> Result<Option<Message>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM messages WHERE id = $1");
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Message::from))
    }

    /// List messages matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn list(&self, filter: &MessageFilter) -> Result<Vec<Message>, DbError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM messages WHERE TRUE"));
        sql::filter_eq(&mut qb, "sender_id", filter.sender_id.map(UserId::into_inner));
        sql::filter_eq(&mut qb, "recipient_id", filter.recipient_id.map(UserId::into_inner));
        sql::filter_eq(&mut qb, "gym_id", filter.gym_id.map(GymId::into_inner));
        if filter.unread_only {
            qb.push(" AND read_at IS NULL");
        }
        sql::order_and_limit(&mut qb, filter.limit);

        let rows = qb
            .build_query_as::<MessageRow>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    /// Apply the supplied fields of `patch`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no message has this id.
    pub async fn update(&self, id: MessageId, patch: &MessagePatch) -> Result<Message, DbError> {
        patch.validate()?;

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE messages SET id = id");
        sql::set_if(&mut qb, "content", patch.content.as_deref());
        sql::set_nullable(&mut qb, "read_at", patch.read_at);
        qb.push(" WHERE id = ").push_bind(id.into_inner());
        qb.push(" RETURNING ").push(COLUMNS);

        let row = qb
            .build_query_as::<MessageRow>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;
        Ok(row.into())
    }

    /// Record that the recipient read the message.
    ///
    /// The first read time sticks; marking an already-read message again
    /// returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no message has this id.
    pub async fn mark_read(&self, id: MessageId) -> Result<Message, DbError> {
        let sql = format!(
            "UPDATE messages SET read_at = COALESCE(read_at, now())
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;
        Ok(row.into())
    }

    /// Delete a message and return the removed row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotFound`] if no message has this id.
    pub async fn delete(&self, id: MessageId) -> Result<Message, DbError> {
        let sql = format!("DELETE FROM messages WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(id.into_inner())
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(ENTITY, id))?;

        tracing::info!(message_id = %id, "Deleted message");
        Ok(row.into())
    }
}

/// A row from the `messages` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    sender_id: Uuid,
    recipient_id: Uuid,
    gym_id: Option<Uuid>,
    content: String,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId(row.id),
            sender_id: UserId(row.sender_id),
            recipient_id: UserId(row.recipient_id),
            gym_id: row.gym_id.map(GymId),
            content: row.content,
            read_at: row.read_at,
            created_at: row.created_at,
        }
    }
}
