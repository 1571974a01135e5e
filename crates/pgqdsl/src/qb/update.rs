//! UPDATE statement builder.

use crate::error::{QdslError, QdslResult};
use crate::qb::binder::Binder;
use crate::qb::expr::{Clause, Predicate};
use crate::qb::param::{Param, SqlValue};
use crate::qb::traits::{Statement, StatementKind};

/// Right-hand side of a SET assignment.
#[derive(Clone, Debug)]
pub enum SetValue {
    /// Bound as a parameter.
    Value(Param),
    /// Written verbatim, e.g. `now()` or `count + 1`.
    Raw(String),
}

/// UPDATE statement builder.
///
/// SET values are numbered before WHERE values, matching the text.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    table: String,
    sets: Vec<(String, SetValue)>,
    where_clause: Clause,
    returning: Vec<String>,
}

impl UpdateQb {
    /// Create a new UPDATE builder for a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            sets: Vec::new(),
            where_clause: Clause::new(),
            returning: Vec::new(),
        }
    }

    /// SET `column = value`.
    pub fn set<T: SqlValue>(mut self, column: impl Into<String>, value: T) -> Self {
        self.sets.push((column.into(), SetValue::Value(Param::new(value))));
        self
    }

    /// SET `column = <expr>` with the expression written verbatim.
    pub fn set_raw(mut self, column: impl Into<String>, expr: impl Into<String>) -> Self {
        self.sets.push((column.into(), SetValue::Raw(expr.into())));
        self
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

impl Statement for UpdateQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn render<B: Binder>(&self, binder: &mut B) -> QdslResult<String> {
        if self.sets.is_empty() {
            return Err(QdslError::validation(format!(
                "update {}: no columns to set",
                self.table
            )));
        }

        let mut assignments = Vec::with_capacity(self.sets.len());
        for (column, value) in &self.sets {
            let rhs = match value {
                SetValue::Value(param) => binder.bind(param)?,
                SetValue::Raw(expr) => expr.clone(),
            };
            binder.verify()?;
            assignments.push(format!("{} = {}", column, rhs));
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));

        self.where_clause.write_to("WHERE", &mut sql, binder)?;

        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::expr::{eq, in_list};
    use crate::qb::update;

    #[test]
    fn set_is_numbered_before_where() {
        let q = update("users")
            .set("name", "Alice")
            .set("email", "alice@example.com")
            .filter(eq("uuid", "u-1"))
            .build()
            .unwrap();
        assert_eq!(q.sql(), "UPDATE users SET name = $1, email = $2 WHERE uuid = $3");
        assert_eq!(
            q.params().literals(),
            vec!["'Alice'", "'alice@example.com'", "'u-1'"]
        );
    }

    #[test]
    fn raw_set_consumes_no_slot() {
        let q = update("posts")
            .set_raw("updated_at", "now()")
            .set("title", "t")
            .in_list("id", [1i64, 2])
            .returning(["id", "updated_at"])
            .build()
            .unwrap();
        assert_eq!(
            q.sql(),
            "UPDATE posts SET updated_at = now(), title = $1 WHERE id IN ($2, $3) RETURNING id, updated_at"
        );
    }

    #[test]
    fn update_without_set_is_rejected() {
        let err = update("users").filter(in_list("id", [1i32])).build().unwrap_err();
        assert!(matches!(err, QdslError::Validation(_)));
    }

    #[test]
    fn update_without_where_has_no_where() {
        let q = update("flags").set("on", false).build().unwrap();
        assert_eq!(q.sql(), "UPDATE flags SET on = $1");
        assert_eq!(q.kind(), StatementKind::Update);
    }
}
