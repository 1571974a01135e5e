//! SELECT statement builder.

use std::fmt;

use crate::error::QdslResult;
use crate::qb::binder::Binder;
use crate::qb::expr::{Clause, Predicate};
use crate::qb::param::Param;
use crate::qb::traits::{Statement, StatementKind};

/// JOIN flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderDir {
    #[default]
    Asc,
    Desc,
}

impl OrderDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            OrderDir::Asc => "ASC",
            OrderDir::Desc => "DESC",
        }
    }
}

impl fmt::Display for OrderDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// `<kind> <table> ON <left> = <right>`
#[derive(Clone, Debug)]
struct Join {
    kind: JoinType,
    table: String,
    left: String,
    right: String,
}

/// SELECT statement builder.
///
/// Clause placeholders are numbered WHERE, HAVING, LIMIT, OFFSET, which is
/// also their order in the text.
#[derive(Clone, Debug, Default)]
pub struct SelectQb {
    /// SELECT columns (empty renders `*`)
    columns: Vec<String>,
    distinct: bool,
    /// Table or FROM expression, may carry an alias
    from: String,
    joins: Vec<Join>,
    where_clause: Clause,
    group_by: Vec<String>,
    having: Clause,
    order_by: Vec<(String, OrderDir)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectQb {
    /// Create a builder selecting `columns`.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the FROM table (aliases allowed, e.g. `"users u"`).
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.from = table.into();
        self
    }

    /// Render `SELECT DISTINCT`.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ==================== JOIN ====================

    /// Add a JOIN on `left = right`.
    pub fn join(
        mut self,
        kind: JoinType,
        table: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        self.joins.push(Join {
            kind,
            table: table.into(),
            left: left.into(),
            right: right.into(),
        });
        self
    }

    /// Add INNER JOIN.
    pub fn inner_join(self, table: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.join(JoinType::Inner, table, left, right)
    }

    /// Add LEFT JOIN.
    pub fn left_join(self, table: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.join(JoinType::Left, table, left, right)
    }

    /// Add RIGHT JOIN.
    pub fn right_join(self, table: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.join(JoinType::Right, table, left, right)
    }

    /// Add FULL JOIN.
    pub fn full_join(self, table: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.join(JoinType::Full, table, left, right)
    }

    // ==================== WHERE / HAVING ====================

    /// Add a WHERE predicate (ANDed with the others).
    pub fn filter(mut self, pred: Predicate) -> Self {
        self.where_clause.push(pred);
        self
    }

    where_shorthands!();

    /// Append GROUP BY columns.
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add a HAVING predicate (ANDed with the others).
    pub fn having(mut self, pred: Predicate) -> Self {
        self.having.push(pred);
        self
    }

    // ==================== ORDER / LIMIT / OFFSET ====================

    /// Append an ORDER BY column.
    pub fn order_by(mut self, column: impl Into<String>, dir: OrderDir) -> Self {
        self.order_by.push((column.into(), dir));
        self
    }

    /// Append an ascending ORDER BY column.
    pub fn order_by_asc(self, column: impl Into<String>) -> Self {
        self.order_by(column, OrderDir::Asc)
    }

    /// Append a descending ORDER BY column.
    pub fn order_by_desc(self, column: impl Into<String>) -> Self {
        self.order_by(column, OrderDir::Desc)
    }

    /// Set LIMIT (bound as a parameter).
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set OFFSET (bound as a parameter).
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Set LIMIT and OFFSET from a 1-based page number.
    pub fn paginate(self, page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        self.limit(per_page).offset((page - 1).saturating_mul(per_page))
    }
}

impl Statement for SelectQb {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn render<B: Binder>(&self, binder: &mut B) -> QdslResult<String> {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }

        if !self.from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.from);
        }

        for join in &self.joins {
            sql.push_str(&format!(
                " {} {} ON {} = {}",
                join.kind, join.table, join.left, join.right
            ));
        }

        self.where_clause.write_to("WHERE", &mut sql, binder)?;

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        self.having.write_to("HAVING", &mut sql, binder)?;

        if !self.order_by.is_empty() {
            let parts: Vec<String> = self
                .order_by
                .iter()
                .map(|(col, dir)| format!("{} {}", col, dir))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }

        if let Some(limit) = self.limit {
            let marker = binder.bind(&Param::new(limit))?;
            binder.verify()?;
            sql.push_str(" LIMIT ");
            sql.push_str(&marker);
        }

        if let Some(offset) = self.offset {
            let marker = binder.bind(&Param::new(offset))?;
            binder.verify()?;
            sql.push_str(" OFFSET ");
            sql.push_str(&marker);
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::expr::{eq, gt, raw};
    use crate::qb::select;

    #[test]
    fn minimal_select() {
        let q = select(["uuid", "name"])
            .from("alerts")
            .filter(eq("uuid", "abc-123"))
            .build()
            .unwrap();
        assert_eq!(q.sql(), "SELECT uuid, name FROM alerts WHERE uuid = $1");
        assert_eq!(q.params().literals(), vec!["'abc-123'"]);
        assert_eq!(q.kind(), StatementKind::Select);
    }

    #[test]
    fn empty_columns_render_star_and_empty_from_is_skipped() {
        let q = SelectQb::new(Vec::<String>::new()).build().unwrap();
        assert_eq!(q.sql(), "SELECT *");
    }

    #[test]
    fn joins_group_having_order() {
        let q = select(["u.id", "COUNT(*)"])
            .distinct()
            .from("users u")
            .inner_join("orders o", "o.user_id", "u.id")
            .left_join("refunds r", "r.order_id", "o.id")
            .filter(gt("o.total", 100i32))
            .group_by(["u.id"])
            .having(raw("COUNT(*) > $1", crate::params![5i64]))
            .order_by_desc("u.id")
            .order_by("u.name", OrderDir::Asc)
            .limit(10)
            .offset(20)
            .build()
            .unwrap();
        assert_eq!(
            q.sql(),
            "SELECT DISTINCT u.id, COUNT(*) FROM users u \
             INNER JOIN orders o ON o.user_id = u.id \
             LEFT JOIN refunds r ON r.order_id = o.id \
             WHERE o.total > $1 GROUP BY u.id HAVING COUNT(*) > $2 \
             ORDER BY u.id DESC, u.name ASC LIMIT $3 OFFSET $4"
        );
        assert_eq!(q.params().literals(), vec!["100", "5", "10", "20"]);
    }

    #[test]
    fn right_and_full_join_keywords() {
        let q = select(["*"])
            .from("a")
            .right_join("b", "b.a_id", "a.id")
            .full_join("c", "c.a_id", "a.id")
            .build()
            .unwrap();
        assert_eq!(
            q.sql(),
            "SELECT * FROM a RIGHT JOIN b ON b.a_id = a.id FULL JOIN c ON c.a_id = a.id"
        );
    }

    #[test]
    fn limit_offset_without_where() {
        let q = select(["*"])
            .from("logs")
            .order_by_desc("created")
            .limit(10)
            .offset(20)
            .build()
            .unwrap();
        assert_eq!(q.sql(), "SELECT * FROM logs ORDER BY created DESC LIMIT $1 OFFSET $2");
        assert_eq!(q.params().literals(), vec!["10", "20"]);
    }

    #[test]
    fn paginate_clamps_page() {
        let q = select(["*"]).from("t").paginate(0, 25).build().unwrap();
        assert_eq!(q.params().literals(), vec!["25", "0"]);
        let q = select(["*"]).from("t").paginate(3, 25).build().unwrap();
        assert_eq!(q.params().literals(), vec!["25", "50"]);
    }

    #[test]
    fn paginate_saturates_instead_of_overflowing() {
        let q = select(["*"]).from("t").paginate(i64::MAX, 2).build().unwrap();
        assert_eq!(q.params().literals(), vec!["2".to_string(), i64::MAX.to_string()]);
    }

    #[test]
    fn named_build_continues_counter_across_clauses() {
        let q = select(["*"])
            .from("users")
            .eq("active", true)
            .having(gt("n", 2i32))
            .limit(5)
            .build_named()
            .unwrap();
        assert_eq!(
            q.sql(),
            "SELECT * FROM users WHERE active = @p1 HAVING n > @p2 LIMIT @p3"
        );
        assert_eq!(q.args().len(), 3);
    }
}
