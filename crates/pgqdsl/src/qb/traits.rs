//! Trait definitions for statement builders.

use std::fmt;

use crate::error::QdslResult;
use crate::qb::binder::{Binder, Named, Positional};
use crate::qb::bridge::named_to_positional;
use crate::qb::debug::{inline_named, inline_positional};
use crate::qb::param::{NamedArgs, ParamList};
use tokio_postgres::types::ToSql;

/// Which builder produced a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base trait for all statement builders.
///
/// Implementors only describe how to render their clauses through a
/// [`Binder`]; building in either addressing scheme is provided. Building never
/// mutates the builder, so it can be repeated and always gives the same result.
pub trait Statement {
    /// Kind of statement this builder produces.
    fn kind(&self) -> StatementKind;

    /// Render the statement text, drawing every marker from `binder`.
    fn render<B: Binder>(&self, binder: &mut B) -> QdslResult<String>;

    /// Build with `$n` placeholders.
    fn build(&self) -> QdslResult<PositionalQuery> {
        let mut binder = Positional::new();
        let sql = self.render(&mut binder)?;
        binder.verify()?;
        Ok(PositionalQuery::new(self.kind(), sql, binder.into_params()))
    }

    /// Build with `@name` placeholders.
    fn build_named(&self) -> QdslResult<NamedQuery> {
        let mut binder = Named::new();
        let sql = self.render(&mut binder)?;
        binder.verify()?;
        Ok(NamedQuery::new(self.kind(), sql, binder.into_args()))
    }

    /// Positional SQL with every value inlined as a literal. Logging only.
    fn to_debug_sql(&self) -> QdslResult<String> {
        Ok(self.build()?.to_debug_sql())
    }
}

/// A built statement with `$n` placeholders.
#[derive(Clone, Debug)]
pub struct PositionalQuery {
    kind: StatementKind,
    sql: String,
    params: ParamList,
}

impl PositionalQuery {
    pub fn new(kind: StatementKind, sql: String, params: ParamList) -> Self {
        Self { kind, sql, params }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.as_refs()
    }

    /// SQL with every `$n` replaced by its value's literal.
    pub fn to_debug_sql(&self) -> String {
        inline_positional(&self.sql, &self.params)
    }

    pub fn into_parts(self) -> (String, ParamList) {
        (self.sql, self.params)
    }
}

/// A built statement with `@name` placeholders.
#[derive(Clone, Debug)]
pub struct NamedQuery {
    kind: StatementKind,
    sql: String,
    args: NamedArgs,
}

impl NamedQuery {
    pub fn new(kind: StatementKind, sql: String, args: NamedArgs) -> Self {
        Self { kind, sql, args }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &NamedArgs {
        &self.args
    }

    /// Translate to `$n` form for drivers without named parameters.
    pub fn to_positional(&self) -> QdslResult<PositionalQuery> {
        let (sql, params) = named_to_positional(&self.sql, &self.args)?;
        Ok(PositionalQuery::new(self.kind, sql, params))
    }

    /// SQL with every `@name` replaced by its value's literal.
    pub fn to_debug_sql(&self) -> String {
        inline_named(&self.sql, &self.args)
    }

    pub fn into_parts(self) -> (String, NamedArgs) {
        (self.sql, self.args)
    }
}
