//! DELETE statement builder.

use crate::error::QdslResult;
use crate::qb::binder::Binder;
use crate::qb::expr::{Clause, Predicate};
use crate::qb::traits::{Statement, StatementKind};

/// DELETE statement builder.
///
/// Without predicates the statement has no WHERE clause and deletes every row.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    table: String,
    where_clause: Clause,
    returning: Vec<String>,
}

impl DeleteQb {
    /// Create a new DELETE builder for a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            where_clause: Clause::new(),
            returning: Vec::new(),
        }
    }

    /// Add a WHERE predicate (ANDed with the others).
    pub fn filter(mut self, pred: Predicate) -> Self {
        self.where_clause.push(pred);
        self
    }

    where_shorthands!();

    /// Set RETURNING columns.
    pub fn returning<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returning = columns.into_iter().map(Into::into).collect();
        self
    }
}

impl Statement for DeleteQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn render<B: Binder>(&self, binder: &mut B) -> QdslResult<String> {
        let mut sql = format!("DELETE FROM {}", self.table);

        self.where_clause.write_to("WHERE", &mut sql, binder)?;

        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }

        Ok(sql)
    }
}
