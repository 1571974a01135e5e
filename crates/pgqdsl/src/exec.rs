//! Running built statements against a [`GenericClient`].
//!
//! The executor builds the statement, logs it and hands the positional SQL plus
//! parameters to the client. Rows are mapped through [`FromRow`] or an explicit
//! [`RowMapper`].

use crate::client::GenericClient;
use crate::error::QdslResult;
use crate::qb::{PositionalQuery, Statement};
use crate::row::{FromRow, RowMapper};

/// How a statement is rendered before it reaches the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BindMode {
    /// Render `$n` placeholders directly.
    #[default]
    Positional,
    /// Render `@name` placeholders, then translate them to `$n`.
    NamedBridge,
}

/// Level of the per-statement log event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Rendering path used for every statement.
    pub bind_mode: BindMode,
    /// Tracing event level to emit at.
    pub log_level: LogLevel,
    /// Truncate logged SQL (in bytes, on a char boundary). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Also log the SQL with values inlined.
    pub log_debug_sql: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            bind_mode: BindMode::Positional,
            log_level: LogLevel::Debug,
            max_sql_length: Some(200),
            log_debug_sql: false,
        }
    }
}

impl ExecConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rendering path.
    pub fn bind_mode(mut self, mode: BindMode) -> Self {
        self.bind_mode = mode;
        self
    }

    /// Override the log event level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Log the literal-inlined SQL next to the parameterized form.
    pub fn log_debug_sql(mut self, enabled: bool) -> Self {
        self.log_debug_sql = enabled;
        self
    }

    /// Build `stmt` along the configured rendering path.
    pub fn prepare(&self, stmt: &impl Statement) -> QdslResult<PositionalQuery> {
        match self.bind_mode {
            BindMode::Positional => stmt.build(),
            BindMode::NamedBridge => stmt.build_named()?.to_positional(),
        }
    }

    fn truncate<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }
}

/// Cut `sql` to at most `max_bytes` without splitting a character.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Builds, logs and runs statements on a borrowed client.
///
/// # Example
/// ```ignore
/// let exec = Executor::new(&client);
/// let n = exec.execute(&update("users").set("active", false).eq("id", 7i64)).await?;
/// let users: Vec<User> = exec.fetch_all(&select(["*"]).from("users")).await?;
/// ```
#[derive(Debug)]
pub struct Executor<'c, C> {
    client: &'c C,
    config: ExecConfig,
}

impl<'c, C: GenericClient> Executor<'c, C> {
    /// Create an executor with the default configuration.
    pub fn new(client: &'c C) -> Self {
        Self::with_config(client, ExecConfig::default())
    }

    /// Create an executor with a custom configuration.
    pub fn with_config(client: &'c C, config: ExecConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    pub fn client(&self) -> &'c C {
        self.client
    }

    fn prepare(&self, stmt: &impl Statement) -> QdslResult<PositionalQuery> {
        let query = self.config.prepare(stmt)?;
        self.log(&query);
        Ok(query)
    }

    #[cfg(feature = "tracing")]
    fn log(&self, query: &PositionalQuery) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    LogLevel::Error => tracing::error!($($field)*),
                    LogLevel::Warn => tracing::warn!($($field)*),
                    LogLevel::Info => tracing::info!($($field)*),
                    LogLevel::Debug => tracing::debug!($($field)*),
                    LogLevel::Trace => tracing::trace!($($field)*),
                }
            };
        }

        let kind = query.kind().as_str();
        let param_count = query.params().len();
        let sql = self.config.truncate(query.sql());
        if self.config.log_debug_sql {
            let debug_sql = query.to_debug_sql();
            let debug_sql = self.config.truncate(&debug_sql);
            emit_at_level!(
                self.config.log_level,
                target: "pgqdsl.sql",
                kind,
                param_count,
                sql = %sql,
                debug_sql = %debug_sql,
            );
        } else {
            emit_at_level!(
                self.config.log_level,
                target: "pgqdsl.sql",
                kind,
                param_count,
                sql = %sql,
            );
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn log(&self, _query: &PositionalQuery) {}

    /// Execute and return the affected row count.
    pub async fn execute(&self, stmt: &impl Statement) -> QdslResult<u64> {
        let query = self.prepare(stmt)?;
        self.client.execute(query.sql(), &query.params_ref()).await
    }

    /// Fetch exactly one row mapped to `T`; zero rows is [`NotFound`](crate::QdslError::NotFound).
    pub async fn fetch_one<T: FromRow>(&self, stmt: &impl Statement) -> QdslResult<T> {
        let query = self.prepare(stmt)?;
        let row = self.client.query_one(query.sql(), &query.params_ref()).await?;
        T::from_row(&row)
    }

    /// Fetch at most one row mapped to `T`.
    pub async fn fetch_opt<T: FromRow>(&self, stmt: &impl Statement) -> QdslResult<Option<T>> {
        let query = self.prepare(stmt)?;
        let row = self.client.query_opt(query.sql(), &query.params_ref()).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Fetch all rows mapped to `T`.
    pub async fn fetch_all<T: FromRow>(&self, stmt: &impl Statement) -> QdslResult<Vec<T>> {
        let query = self.prepare(stmt)?;
        let rows = self.client.query(query.sql(), &query.params_ref()).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Fetch exactly one row through an explicit mapper.
    pub async fn fetch_one_with<T: Default>(
        &self,
        stmt: &impl Statement,
        mapper: &RowMapper<T>,
    ) -> QdslResult<T> {
        let query = self.prepare(stmt)?;
        let row = self.client.query_one(query.sql(), &query.params_ref()).await?;
        mapper.map(&row)
    }

    /// Fetch at most one row through an explicit mapper.
    pub async fn fetch_opt_with<T: Default>(
        &self,
        stmt: &impl Statement,
        mapper: &RowMapper<T>,
    ) -> QdslResult<Option<T>> {
        let query = self.prepare(stmt)?;
        let row = self.client.query_opt(query.sql(), &query.params_ref()).await?;
        row.as_ref().map(|r| mapper.map(r)).transpose()
    }

    /// Fetch all rows through an explicit mapper.
    pub async fn fetch_all_with<T: Default>(
        &self,
        stmt: &impl Statement,
        mapper: &RowMapper<T>,
    ) -> QdslResult<Vec<T>> {
        let query = self.prepare(stmt)?;
        let rows = self.client.query(query.sql(), &query.params_ref()).await?;
        mapper.map_all(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::{eq, select};

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("abc", 2), "ab");
        // 'é' is two bytes; cutting inside it backs off to the previous boundary.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }

    #[test]
    fn config_truncates_with_ellipsis() {
        let cfg = ExecConfig::new().max_sql_length(6);
        assert_eq!(cfg.truncate("SELECT * FROM t"), "SELECT...");
        assert_eq!(cfg.clone().no_truncate().truncate("SELECT * FROM t"), "SELECT * FROM t");
    }

    #[test]
    fn defaults() {
        let cfg = ExecConfig::default();
        assert_eq!(cfg.bind_mode, BindMode::Positional);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.max_sql_length, Some(200));
        assert!(!cfg.log_debug_sql);
    }

    #[test]
    fn both_bind_modes_prepare_the_same_query() {
        let stmt = select(["*"]).from("users").filter(eq("id", 5i64)).limit(1);
        let direct = ExecConfig::new().prepare(&stmt).unwrap();
        let bridged = ExecConfig::new()
            .bind_mode(BindMode::NamedBridge)
            .prepare(&stmt)
            .unwrap();
        assert_eq!(direct.sql(), "SELECT * FROM users WHERE id = $1 LIMIT $2");
        assert_eq!(bridged.sql(), direct.sql());
        assert_eq!(bridged.params().literals(), direct.params().literals());
    }
}
