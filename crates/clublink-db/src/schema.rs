//! Read-only introspection of the live schema.
//!
//! [`SchemaInspector`] reads the server version, tables, enum types,
//! columns and foreign keys from the catalog so an operator can confirm a
//! migration landed. [`SchemaReport::missing_tables`] and
//! [`SchemaReport::missing_enums`] compare the result with what this crate
//! expects.

use sqlx::PgPool;

use crate::codec::DbEnum;
use crate::error::DbError;
use crate::maintenance::{TableCount, count_rows};
use crate::tables::Table;

/// A `PostgreSQL` enum type and its labels in sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Type name.
    pub name: String,
    /// Labels in `enumsortorder`.
    pub labels: Vec<String>,
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// SQL data type as reported by `information_schema`.
    pub data_type: String,
    /// Whether the column accepts `NULL`.
    pub is_nullable: bool,
    /// Default expression, if any.
    pub default: Option<String>,
}

/// A single-column foreign key.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ForeignKey {
    /// Constraint name.
    pub constraint: String,
    /// Referencing table.
    pub table: String,
    /// Referencing column.
    pub column: String,
    /// Referenced table.
    pub foreign_table: String,
    /// Referenced column.
    pub foreign_column: String,
}

/// Columns of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumns {
    /// The table.
    pub table: Table,
    /// Its columns in ordinal order.
    pub columns: Vec<ColumnInfo>,
}

/// Everything [`SchemaInspector::report`] gathers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    /// `SELECT version()`.
    pub server_version: String,
    /// Tables in the `public` schema.
    pub tables: Vec<String>,
    /// Enum types in the `public` schema.
    pub enums: Vec<EnumType>,
    /// Columns of each known table that exists.
    pub columns: Vec<TableColumns>,
    /// Foreign keys in the `public` schema.
    pub foreign_keys: Vec<ForeignKey>,
    /// Row counts of each known table, if every table exists.
    pub row_counts: Option<Vec<TableCount>>,
}

/// Enum types the migration creates, with their expected labels.
fn expected_enums() -> Vec<EnumType> {
    fn labels<E: DbEnum>() -> EnumType {
        EnumType {
            name: E::TYPE_NAME.to_owned(),
            labels: E::variants().iter().map(|v| v.to_db().to_owned()).collect(),
        }
    }
    vec![
        labels::<clublink_types::UserRole>(),
        labels::<clublink_types::GymStatus>(),
        labels::<clublink_types::SubscriptionType>(),
        labels::<clublink_types::SubscriptionStatus>(),
        labels::<clublink_types::VisitStatus>(),
    ]
}

impl SchemaReport {
    /// Known tables absent from the database.
    pub fn missing_tables(&self) -> Vec<Table> {
        Table::CREATION_ORDER
            .into_iter()
            .filter(|t| !self.tables.iter().any(|name| name == t.name()))
            .collect()
    }

    /// Expected enum types that are absent or carry different labels.
    pub fn missing_enums(&self) -> Vec<String> {
        expected_enums()
            .into_iter()
            .filter(|expected| !self.enums.contains(expected))
            .map(|expected| expected.name)
            .collect()
    }

    /// Whether every known table and enum type is present.
    pub fn is_complete(&self) -> bool {
        self.missing_tables().is_empty() && self.missing_enums().is_empty()
    }
}

/// Catalog queries against the `public` schema.
pub struct SchemaInspector<'a> {
    pool: &'a PgPool,
}

impl<'a> SchemaInspector<'a> {
    /// Create a new inspector bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The server's version banner.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn server_version(&self) -> Result<String, DbError> {
        let (version,): (String,) = sqlx::query_as("SELECT version()")
            .fetch_one(self.pool)
            .await?;
        Ok(version)
    }

    /// Names of the tables in the `public` schema.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn tables(&self) -> Result<Vec<String>, DbError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r"SELECT table_name::TEXT
              FROM information_schema.tables
              WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
              ORDER BY table_name",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Enum types in the `public` schema with their labels.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn enums(&self) -> Result<Vec<EnumType>, DbError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r"SELECT t.typname::TEXT, e.enumlabel::TEXT
              FROM pg_type t
              JOIN pg_enum e ON e.enumtypid = t.oid
              JOIN pg_namespace n ON n.oid = t.typnamespace
              WHERE n.nspname = 'public'
              ORDER BY t.typname, e.enumsortorder",
        )
        .fetch_all(self.pool)
        .await?;

        let mut enums: Vec<EnumType> = Vec::new();
        for (name, label) in rows {
            match enums.last_mut() {
                Some(current) if current.name == name => current.labels.push(label),
                _ => enums.push(EnumType {
                    name,
                    labels: vec![label],
                }),
            }
        }
        Ok(enums)
    }

    /// Columns of `table` in ordinal order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn columns(&self, table: Table) -> Result<Vec<ColumnInfo>, DbError> {
        let rows = sqlx::query_as::<_, ColumnInfo>(
            r"SELECT column_name::TEXT AS name,
                     data_type::TEXT AS data_type,
                     (is_nullable = 'YES') AS is_nullable,
                     column_default::TEXT AS default
              FROM information_schema.columns
              WHERE table_schema = 'public' AND table_name = $1
              ORDER BY ordinal_position",
        )
        .bind(table.name())
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Foreign keys in the `public` schema.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn foreign_keys(&self) -> Result<Vec<ForeignKey>, DbError> {
        let rows = sqlx::query_as::<_, ForeignKey>(
            r"SELECT tc.constraint_name::TEXT AS constraint,
                     tc.table_name::TEXT AS table,
                     kcu.column_name::TEXT AS column,
                     ccu.table_name::TEXT AS foreign_table,
                     ccu.column_name::TEXT AS foreign_column
              FROM information_schema.table_constraints tc
              JOIN information_schema.key_column_usage kcu
                ON kcu.constraint_name = tc.constraint_name
               AND kcu.table_schema = tc.table_schema
              JOIN information_schema.constraint_column_usage ccu
                ON ccu.constraint_name = tc.constraint_name
               AND ccu.table_schema = tc.table_schema
              WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = 'public'
              ORDER BY tc.table_name, kcu.column_name",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Gather the full report. Row counts are only collected when every
    /// known table exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any catalog query fails.
    pub async fn report(&self) -> Result<SchemaReport, DbError> {
        let server_version = self.server_version().await?;
        let tables = self.tables().await?;
        let enums = self.enums().await?;

        let mut columns = Vec::new();
        for table in Table::CREATION_ORDER {
            if tables.iter().any(|name| name == table.name()) {
                columns.push(TableColumns {
                    table,
                    columns: self.columns(table).await?,
                });
            }
        }

        let foreign_keys = self.foreign_keys().await?;
        let row_counts = if columns.len() == Table::CREATION_ORDER.len() {
            Some(count_rows(self.pool).await?)
        } else {
            None
        };

        let report = SchemaReport {
            server_version,
            tables,
            enums,
            columns,
            foreign_keys,
            row_counts,
        };
        tracing::info!(
            tables = report.tables.len(),
            enums = report.enums.len(),
            foreign_keys = report.foreign_keys.len(),
            complete = report.is_complete(),
            "Inspected schema"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(tables: &[&str], enums: Vec<EnumType>) -> SchemaReport {
        SchemaReport {
            server_version: "PostgreSQL 16".to_owned(),
            tables: tables.iter().map(|t| (*t).to_owned()).collect(),
            enums,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            row_counts: None,
        }
    }

    #[test]
    fn complete_schema_has_nothing_missing() {
        let names: Vec<&str> = Table::CREATION_ORDER.iter().map(|t| t.name()).collect();
        let report = report_with(&names, expected_enums());
        assert!(report.missing_tables().is_empty());
        assert!(report.missing_enums().is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn missing_table_is_reported() {
        let report = report_with(&["users", "gyms"], expected_enums());
        let missing = report.missing_tables();
        assert!(missing.contains(&Table::Visits));
        assert!(!missing.contains(&Table::Users));
        assert!(!report.is_complete());
    }

    #[test]
    fn enum_with_wrong_labels_is_reported() {
        let mut enums = expected_enums();
        if let Some(role) = enums.iter_mut().find(|e| e.name == "user_role") {
            role.labels.pop();
        }
        let report = report_with(&[], enums);
        assert_eq!(report.missing_enums(), vec!["user_role".to_owned()]);
    }
}
