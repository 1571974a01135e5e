//! Convenient imports for typical `pgqdsl` usage.
//!
//! ```ignore
//! use pgqdsl::prelude::*;
//! ```

pub use crate::params;
pub use crate::qb::{
    JoinType, OrderDir, Param, Statement, and, between, delete_from, eq, gt, gte, ilike, in_list,
    insert_into, is_not_null, is_null, like, lt, lte, ne, not, or, raw, raw_named, raw_values,
    select, to_sql, update,
};
pub use crate::{
    BindMode, ExecConfig, Executor, FromRow, GenericClient, QdslError, QdslResult, RowExt,
    RowMapper,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
