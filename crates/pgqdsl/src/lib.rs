//! # pgqdsl
//!
//! A fluent SQL statement composer for Postgres.
//!
//! ## Features
//!
//! - **No string concatenation**: statements are built from typed clause objects
//! - **Composable predicates**: nested AND/OR/NOT groups and raw escapes keep one consistent placeholder numbering
//! - **Two addressing schemes**: `$1, $2, ...` for `tokio-postgres`, `@p1, @name, ...` for named-parameter APIs
//! - **Named → positional bridge**: translate `@name` SQL for drivers that only speak `$n`
//! - **Debug inlining**: print a statement with its values inlined, for logs only
//! - **Execution**: run built statements on a client, pooled client or transaction via [`Executor`]
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use pgqdsl::prelude::*;
//!
//! // SELECT
//! let q = select(["uuid", "name"])
//!     .from("alerts")
//!     .filter(eq("uuid", "abc-123"))
//!     .build()?;
//! assert_eq!(q.sql(), "SELECT uuid, name FROM alerts WHERE uuid = $1");
//!
//! // INSERT
//! let q = insert_into("users")
//!     .columns(["name", "age"])
//!     .values(params!["Alice", 30i32])
//!     .values(params!["Bob", 25i32])
//!     .build()?;
//! // INSERT INTO users (name, age) VALUES ($1, $2), ($3, $4)
//!
//! // Named markers and the bridge
//! let named = select(["*"]).from("users").eq("active", true).build_named()?;
//! let positional = named.to_positional()?;
//!
//! // Execution
//! let exec = Executor::new(&client);
//! let users: Vec<User> = exec.fetch_all(&select(["*"]).from("users").limit(10)).await?;
//! ```

pub mod client;
pub mod error;
pub mod exec;
pub mod prelude;
pub mod qb;
pub mod row;

pub use client::GenericClient;
pub use error::{QdslError, QdslResult};
pub use exec::{BindMode, ExecConfig, Executor, LogLevel};
pub use row::{FromRow, RowExt, RowMapper};

// Re-export qb module for easy access
pub use qb::{
    DeleteQb, InsertQb, NamedArgs, NamedQuery, Param, ParamList, PositionalQuery, Predicate,
    SelectQb, Statement, StatementKind, UpdateQb, delete_from, insert_into, named_to_positional,
    select, to_sql, update,
};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
