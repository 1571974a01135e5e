//! INSERT statement builder.

use crate::error::{QdslError, QdslResult};
use crate::qb::binder::Binder;
use crate::qb::param::Param;
use crate::qb::traits::{Statement, StatementKind};

/// INSERT statement builder.
///
/// Rows are bound row-major: left to right, top to bottom.
#[derive(Clone, Debug)]
pub struct InsertQb {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<Param>>,
    /// Raw action after `ON CONFLICT`
    on_conflict: Option<String>,
    returning: Vec<String>,
}

impl InsertQb {
    /// Create a new INSERT builder for a table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            on_conflict: None,
            returning: Vec::new(),
        }
    }

    /// Set the column list.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one row of values.
    ///
    /// ```ignore
    /// insert_into("users")
    ///     .columns(["name", "age"])
    ///     .values(params!["Alice", 30i32])
    ///     .values(params!["Bob", 25i32]);
    /// ```
    pub fn values(mut self, row: Vec<Param>) -> Self {
        self.rows.push(row);
        self
    }

    /// Append many rows.
    pub fn values_many(mut self, rows: impl IntoIterator<Item = Vec<Param>>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Append an `ON CONFLICT <action>` clause, e.g. `"(email) DO NOTHING"`.
    pub fn on_conflict(mut self, action: impl Into<String>) -> Self {
        self.on_conflict = Some(action.into());
        self
    }

    /// Set RETURNING columns.
    pub fn returning<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returning = columns.into_iter().map(Into::into).collect();
        self
    }

    fn validate(&self) -> QdslResult<()> {
        if self.rows.is_empty() && !self.columns.is_empty() {
            return Err(QdslError::validation(format!(
                "insert into {}: columns given without any rows",
                self.table
            )));
        }

        let width = if self.columns.is_empty() {
            self.rows.first().map_or(0, Vec::len)
        } else {
            self.columns.len()
        };

        for (i, row) in self.rows.iter().enumerate() {
            if row.is_empty() {
                return Err(QdslError::validation(format!(
                    "insert into {}: row {} has no values",
                    self.table,
                    i + 1
                )));
            }
            if row.len() != width {
                return Err(QdslError::validation(format!(
                    "insert into {}: row {} has {} values, expected {}",
                    self.table,
                    i + 1,
                    row.len(),
                    width
                )));
            }
        }
        Ok(())
    }
}

impl Statement for InsertQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn render<B: Binder>(&self, binder: &mut B) -> QdslResult<String> {
        self.validate()?;

        let mut sql = format!("INSERT INTO {}", self.table);
        if !self.columns.is_empty() {
            sql.push_str(&format!(" ({})", self.columns.join(", ")));
        }

        if self.rows.is_empty() {
            sql.push_str(" DEFAULT VALUES");
        } else {
            let mut tuples = Vec::with_capacity(self.rows.len());
            for row in &self.rows {
                let markers = row
                    .iter()
                    .map(|v| binder.bind(v))
                    .collect::<QdslResult<Vec<_>>>()?;
                binder.verify()?;
                tuples.push(format!("({})", markers.join(", ")));
            }
            sql.push_str(" VALUES ");
            sql.push_str(&tuples.join(", "));
        }

        if let Some(action) = &self.on_conflict {
            sql.push_str(" ON CONFLICT ");
            sql.push_str(action);
        }

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
    use crate::qb::insert_into;

    #[test]
    fn two_rows_are_numbered_row_major() {
        let q = insert_into("users")
            .columns(["name", "age"])
            .values(crate::params!["Alice", 30i32])
            .values(crate::params!["Bob", 25i32])
            .build()
            .unwrap();
        assert_eq!(q.sql(), "INSERT INTO users (name, age) VALUES ($1, $2), ($3, $4)");
        assert_eq!(q.params().literals(), vec!["'Alice'", "30", "'Bob'", "25"]);
        assert_eq!(q.kind(), StatementKind::Insert);
    }

    #[test]
    fn on_conflict_and_returning_carry_no_params() {
        let q = insert_into("users")
            .columns(["email", "name"])
            .values(crate::params!["a@x.io", "A"])
            .on_conflict("(email) DO UPDATE SET name = EXCLUDED.name")
            .returning(["id"])
            .build()
            .unwrap();
        assert_eq!(
            q.sql(),
            "INSERT INTO users (email, name) VALUES ($1, $2) \
             ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name RETURNING id"
        );
        assert_eq!(q.params().len(), 2);
    }

    #[test]
    fn no_rows_render_default_values() {
        let q = insert_into("events").returning(["id"]).build().unwrap();
        assert_eq!(q.sql(), "INSERT INTO events DEFAULT VALUES RETURNING id");
        assert!(q.params().is_empty());
    }

    #[test]
    fn columns_without_rows_are_rejected() {
        let err = insert_into("t").columns(["a", "b"]).build().unwrap_err();
        assert!(matches!(err, QdslError::Validation(_)));

        let err = insert_into("t")
            .columns(["a", "b"])
            .values_many(Vec::new())
            .build_named()
            .unwrap_err();
        assert!(matches!(err, QdslError::Validation(_)));
    }

    #[test]
    fn row_arity_mismatch_is_rejected() {
        let err = insert_into("users")
            .columns(["name", "age"])
            .values(crate::params!["Alice"])
            .build()
            .unwrap_err();
        assert!(matches!(err, QdslError::Validation(_)));

        let err = insert_into("users")
            .values(crate::params![1i32, 2i32])
            .values(crate::params![3i32])
            .build_named()
            .unwrap_err();
        assert!(matches!(err, QdslError::Validation(_)));
    }

    #[test]
    fn named_rows_mint_in_row_major_order() {
        let q = insert_into("t")
            .columns(["a", "b"])
            .values_many([crate::params![1i32, 2i32], crate::params![3i32, 4i32]])
            .build_named()
            .unwrap();
        assert_eq!(q.sql(), "INSERT INTO t (a, b) VALUES (@p1, @p2), (@p3, @p4)");
        assert_eq!(q.args().literal("p3").as_deref(), Some("3"));
    }
}
