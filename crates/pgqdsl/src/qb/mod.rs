//! Statement builders and the predicate/placeholder engine.
//!
//! # Features
//!
//! - **Composable predicates**: AND/OR/NOT groups with automatic placeholder numbering
//! - **Two addressing schemes**: `$1, $2, ...` or `@p1, @p2, ...` from the same builder
//! - **Raw escapes**: literal fragments whose own `$n` / `@name` markers are merged in
//! - **Arc-based parameters**: clone-friendly builders and predicate trees
//!
//! # Usage
//!
//! ```ignore
//! use pgqdsl::qb::{self, Statement, eq, gt, or};
//!
//! // SELECT
//! let q = qb::select(["id", "name"])
//!     .from("users")
//!     .filter(eq("active", true))
//!     .filter(or(vec![gt("age", 18i32), eq("role", "admin")]))
//!     .order_by_desc("created_at")
//!     .limit(20)
//!     .build()?;
//! // SELECT id, name FROM users WHERE active = $1 AND (age > $2 OR role = $3)
//! //   ORDER BY created_at DESC LIMIT $4
//!
//! // Same statement with named markers
//! let named = qb::select(["id"]).from("users").eq("active", true).build_named()?;
//! // SELECT id FROM users WHERE active = @p1
//!
//! // INSERT
//! let q = qb::insert_into("users")
//!     .columns(["username", "email"])
//!     .values(pgqdsl::params!["alice", "alice@example.com"])
//!     .returning(["id"])
//!     .build()?;
//!
//! // UPDATE
//! let q = qb::update("users").set("status", "inactive").eq("id", user_id).build()?;
//!
//! // DELETE
//! let q = qb::delete_from("users").eq("id", user_id).build()?;
//! ```

/// WHERE shorthands shared by the builders that own a `filter` method.
macro_rules! where_shorthands {
    () => {
        /// Add WHERE: column = value
        pub fn eq<T: $crate::qb::SqlValue>(self, column: impl Into<String>, value: T) -> Self {
            self.filter($crate::qb::eq(column, value))
        }

        /// Add WHERE: column != value
        pub fn ne<T: $crate::qb::SqlValue>(self, column: impl Into<String>, value: T) -> Self {
            self.filter($crate::qb::ne(column, value))
        }

        /// Add WHERE: column > value
        pub fn gt<T: $crate::qb::SqlValue>(self, column: impl Into<String>, value: T) -> Self {
            self.filter($crate::qb::gt(column, value))
        }

        /// Add WHERE: column >= value
        pub fn gte<T: $crate::qb::SqlValue>(self, column: impl Into<String>, value: T) -> Self {
            self.filter($crate::qb::gte(column, value))
        }

        /// Add WHERE: column < value
        pub fn lt<T: $crate::qb::SqlValue>(self, column: impl Into<String>, value: T) -> Self {
            self.filter($crate::qb::lt(column, value))
        }

        /// Add WHERE: column <= value
        pub fn lte<T: $crate::qb::SqlValue>(self, column: impl Into<String>, value: T) -> Self {
            self.filter($crate::qb::lte(column, value))
        }

        /// Add WHERE: column LIKE pattern
        pub fn like<T: $crate::qb::SqlValue>(self, column: impl Into<String>, pattern: T) -> Self {
            self.filter($crate::qb::like(column, pattern))
        }

        /// Add WHERE: column ILIKE pattern (case-insensitive)
        pub fn ilike<T: $crate::qb::SqlValue>(self, column: impl Into<String>, pattern: T) -> Self {
            self.filter($crate::qb::ilike(column, pattern))
        }

        /// Add WHERE: column IN (values...)
        pub fn in_list<T: $crate::qb::SqlValue>(
            self,
            column: impl Into<String>,
            values: impl IntoIterator<Item = T>,
        ) -> Self {
            self.filter($crate::qb::in_list(column, values))
        }

        /// Add WHERE: column BETWEEN low AND high
        pub fn between<T: $crate::qb::SqlValue>(self, column: impl Into<String>, low: T, high: T) -> Self {
            self.filter($crate::qb::between(column, low, high))
        }

        /// Add WHERE: column IS NULL
        pub fn is_null(self, column: impl Into<String>) -> Self {
            self.filter($crate::qb::is_null(column))
        }

        /// Add WHERE: column IS NOT NULL
        pub fn is_not_null(self, column: impl Into<String>) -> Self {
            self.filter($crate::qb::is_not_null(column))
        }
    };
}

mod binder;
mod bridge;
mod debug;
mod delete;
mod expr;
mod insert;
mod marker;
mod param;
mod raw;
mod select;
mod traits;
mod update;

pub use binder::{Binder, Named, Positional};
pub use bridge::named_to_positional;
pub use debug::{inline_named, inline_positional, to_sql};
pub use delete::DeleteQb;
pub use expr::{
    Clause, CompareOp, Predicate, and, between, eq, gt, gte, ilike, in_list, in_params, is_not_null,
    is_null, like, lt, lte, ne, not, or, raw, raw_named, raw_values,
};
pub use insert::InsertQb;
pub use param::{Literal, NamedArgs, Param, ParamList, SqlValue};
pub use raw::{RawArgs, RawSql};
pub use select::{JoinType, OrderDir, SelectQb};
pub use traits::{NamedQuery, PositionalQuery, Statement, StatementKind};
pub use update::{SetValue, UpdateQb};

/// Create a SELECT builder for the given columns.
///
/// An empty column list renders `SELECT *`.
///
/// # Example
/// ```ignore
/// let qb = pgqdsl::qb::select(["id", "name"]).from("users").eq("id", 1i64);
/// ```
pub fn select<I, S>(columns: I) -> SelectQb
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    SelectQb::new(columns)
}

/// Create an INSERT builder for the given table.
///
/// # Example
/// ```ignore
/// let qb = pgqdsl::qb::insert_into("users")
///     .columns(["username", "email"])
///     .values(pgqdsl::params!["alice", "alice@example.com"]);
/// ```
pub fn insert_into(table: impl Into<String>) -> InsertQb {
    InsertQb::new(table)
}

/// Create an UPDATE builder for the given table.
///
/// # Example
/// ```ignore
/// let qb = pgqdsl::qb::update("users")
///     .set("status", "inactive")
///     .eq("id", user_id);
/// ```
pub fn update(table: impl Into<String>) -> UpdateQb {
    UpdateQb::new(table)
}

/// Create a DELETE builder for the given table.
///
/// DELETE without predicates has no WHERE clause.
///
/// # Example
/// ```ignore
/// let qb = pgqdsl::qb::delete_from("users").eq("id", user_id);
/// ```
pub fn delete_from(table: impl Into<String>) -> DeleteQb {
    DeleteQb::new(table)
}
