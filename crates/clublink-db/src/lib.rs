//! `PostgreSQL` data store for the Club Link gym network.
//!
//! Eight tables linked by foreign keys: users, gym owners, gyms, members,
//! visits, messages, access codes and subscriptions. Each table has a store
//! that borrows the shared pool and exposes create / get / list / update /
//! delete. Referential integrity is enforced by the database; violations
//! surface as [`DbError::ConstraintViolation`].
//!
//! # Architecture
//!
//! ```text
//! PostgresPool (opened once, passed explicitly)
//!     |
//!     +-- UserStore / GymOwnerStore / GymStore / MemberStore
//!     +-- VisitStore / MessageStore / AccessCodeStore / SubscriptionStore
//!     |
//!     +-- maintenance   (row counts, full reset)
//!     +-- seed          (demo data set)
//!     +-- smoke         (end-to-end check with cleanup)
//!     +-- schema        (catalog introspection)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`error`] -- Shared error type and constraint classification
//! - [`codec`] -- Rust enum <-> `PostgreSQL` enum label mapping
//! - [`tables`] -- Table list and dependency order

pub mod access_code_store;
pub mod codec;
pub mod error;
pub mod gym_owner_store;
pub mod gym_store;
pub mod maintenance;
pub mod member_store;
pub mod message_store;
pub mod postgres;
pub mod schema;
pub mod seed;
pub mod smoke;
mod sql;
pub mod subscription_store;
pub mod tables;
pub mod user_store;
pub mod visit_store;

// Re-export primary types for convenience.
pub use access_code_store::AccessCodeStore;
pub use error::DbError;
pub use gym_owner_store::GymOwnerStore;
pub use gym_store::GymStore;
pub use maintenance::{TableCount, count_rows, reset_all};
pub use member_store::MemberStore;
pub use message_store::MessageStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use schema::{ColumnInfo, EnumType, ForeignKey, SchemaInspector, SchemaReport, TableColumns};
pub use seed::seed_demo_data;
pub use smoke::{SmokeReport, run_smoke_test};
pub use subscription_store::SubscriptionStore;
pub use tables::Table;
pub use user_store::UserStore;
pub use visit_store::VisitStore;
