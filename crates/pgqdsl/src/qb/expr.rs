//! Predicate tree for WHERE/HAVING clauses.
//!
//! A [`Predicate`] renders itself through a [`Binder`], which owns the cursor:
//! each value asks the binder for the next marker, so numbering stays correct no
//! matter how deeply fragments are nested or how many clauses share the pass.
//!
//! ```ignore
//! use pgqdsl::qb::{and, eq, or};
//!
//! let p = and(vec![eq("a", 1i32), or(vec![eq("b", 2i32), eq("c", 3i32)])]);
//! let (sql, params, next) = p.to_positional(1)?;
//! assert_eq!(sql, "(a = $1 AND (b = $2 OR c = $3))");
//! assert_eq!(next, 4);
//! ```

use crate::error::QdslResult;
use crate::qb::binder::{Binder, Named, Positional};
use crate::qb::param::{NamedArgs, Param, ParamList, SqlValue};
use crate::qb::raw::RawSql;

/// Comparison operator of a [`Predicate::Compare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
}

impl CompareOp {
    /// SQL spelling of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Like => "LIKE",
            CompareOp::ILike => "ILIKE",
        }
    }
}

/// Condition node.
///
/// Column names are written verbatim and must come from trusted code; only
/// values travel through placeholders.
#[derive(Clone, Debug)]
pub enum Predicate {
    /// `column op $n`
    Compare {
        column: String,
        op: CompareOp,
        value: Param,
    },

    /// `column IN ($n, ...)`. An empty list renders `column IN ()`.
    In { column: String, values: Vec<Param> },

    /// `column BETWEEN $n AND $m`
    Between {
        column: String,
        low: Param,
        high: Param,
    },

    /// `column IS NULL` / `column IS NOT NULL`
    NullCheck { column: String, is_null: bool },

    /// `(a AND b ...)`
    And(Vec<Predicate>),

    /// `(a OR b ...)`
    Or(Vec<Predicate>),

    /// `NOT (inner)`
    Not(Box<Predicate>),

    /// Literal fragment with its own placeholders.
    Raw(RawSql),
}

impl Predicate {
    /// Render through `binder`, consuming one slot per contributed value.
    pub fn render<B: Binder + ?Sized>(&self, binder: &mut B) -> QdslResult<String> {
        match self {
            Predicate::Compare { column, op, value } => {
                let marker = binder.bind(value)?;
                Ok(format!("{} {} {}", column, op.as_sql(), marker))
            }
            Predicate::In { column, values } => {
                let markers = values
                    .iter()
                    .map(|v| binder.bind(v))
                    .collect::<QdslResult<Vec<_>>>()?;
                Ok(format!("{} IN ({})", column, markers.join(", ")))
            }
            Predicate::Between { column, low, high } => {
                let low = binder.bind(low)?;
                let high = binder.bind(high)?;
                Ok(format!("{} BETWEEN {} AND {}", column, low, high))
            }
            Predicate::NullCheck { column, is_null } => {
                if *is_null {
                    Ok(format!("{} IS NULL", column))
                } else {
                    Ok(format!("{} IS NOT NULL", column))
                }
            }
            Predicate::And(children) => combine(children, " AND ", binder),
            Predicate::Or(children) => combine(children, " OR ", binder),
            Predicate::Not(inner) => Ok(format!("NOT ({})", inner.render(binder)?)),
            Predicate::Raw(raw) => binder.bind_raw(raw),
        }
    }

    /// Render positionally starting at `$start`.
    ///
    /// Returns the fragment, the values in placeholder order and the next free
    /// position.
    pub fn to_positional(&self, start: usize) -> QdslResult<(String, ParamList, usize)> {
        let mut binder = Positional::starting_at(start);
        let sql = self.render(&mut binder)?;
        binder.verify()?;
        let next = binder.next_position();
        Ok((sql, binder.into_params(), next))
    }

    /// Render with named markers, continuing the auto-name counter from `counter`.
    ///
    /// Returns the fragment, the arguments and the advanced counter.
    pub fn to_named(&self, counter: usize) -> QdslResult<(String, NamedArgs, usize)> {
        let mut binder = Named::starting_at(counter);
        let sql = self.render(&mut binder)?;
        binder.verify()?;
        let next = binder.counter();
        Ok((sql, binder.into_args(), next))
    }
}

fn combine<B: Binder + ?Sized>(children: &[Predicate], sep: &str, binder: &mut B) -> QdslResult<String> {
    match children {
        [] => Ok(String::new()),
        [only] => only.render(binder),
        _ => {
            let parts = children
                .iter()
                .map(|p| p.render(binder))
                .collect::<QdslResult<Vec<_>>>()?;
            Ok(format!("({})", parts.join(sep)))
        }
    }
}

// ==================== Constructors ====================

fn compare<T: SqlValue>(column: impl Into<String>, op: CompareOp, value: T) -> Predicate {
    Predicate::Compare {
        column: column.into(),
        op,
        value: Param::new(value),
    }
}

/// `column = value`
pub fn eq<T: SqlValue>(column: impl Into<String>, value: T) -> Predicate {
    compare(column, CompareOp::Eq, value)
}

/// `column != value`
pub fn ne<T: SqlValue>(column: impl Into<String>, value: T) -> Predicate {
    compare(column, CompareOp::Ne, value)
}

/// `column > value`
pub fn gt<T: SqlValue>(column: impl Into<String>, value: T) -> Predicate {
    compare(column, CompareOp::Gt, value)
}

/// `column >= value`
pub fn gte<T: SqlValue>(column: impl Into<String>, value: T) -> Predicate {
    compare(column, CompareOp::Gte, value)
}

/// `column < value`
pub fn lt<T: SqlValue>(column: impl Into<String>, value: T) -> Predicate {
    compare(column, CompareOp::Lt, value)
}

/// `column <= value`
pub fn lte<T: SqlValue>(column: impl Into<String>, value: T) -> Predicate {
    compare(column, CompareOp::Lte, value)
}

/// `column LIKE pattern`
pub fn like<T: SqlValue>(column: impl Into<String>, pattern: T) -> Predicate {
    compare(column, CompareOp::Like, pattern)
}

/// `column ILIKE pattern` (case-insensitive)
pub fn ilike<T: SqlValue>(column: impl Into<String>, pattern: T) -> Predicate {
    compare(column, CompareOp::ILike, pattern)
}

/// `column IN (values...)`
///
/// An empty list renders `column IN ()`, which matches nothing in Postgres.
/// Guard empty input at the call site if that is not what you want.
pub fn in_list<T: SqlValue>(column: impl Into<String>, values: impl IntoIterator<Item = T>) -> Predicate {
    in_params(column, values.into_iter().map(Param::new).collect())
}

/// `column IN (values...)` from pre-wrapped, possibly heterogeneous values.
pub fn in_params(column: impl Into<String>, values: Vec<Param>) -> Predicate {
    Predicate::In {
        column: column.into(),
        values,
    }
}

/// `column BETWEEN low AND high`
pub fn between<T: SqlValue>(column: impl Into<String>, low: T, high: T) -> Predicate {
    Predicate::Between {
        column: column.into(),
        low: Param::new(low),
        high: Param::new(high),
    }
}

/// `column IS NULL`
pub fn is_null(column: impl Into<String>) -> Predicate {
    Predicate::NullCheck {
        column: column.into(),
        is_null: true,
    }
}

/// `column IS NOT NULL`
pub fn is_not_null(column: impl Into<String>) -> Predicate {
    Predicate::NullCheck {
        column: column.into(),
        is_null: false,
    }
}

/// AND group. Zero children render nothing, one child renders unwrapped.
pub fn and(preds: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::And(preds.into_iter().collect())
}

/// OR group. Zero children render nothing, one child renders unwrapped.
pub fn or(preds: impl IntoIterator<Item = Predicate>) -> Predicate {
    Predicate::Or(preds.into_iter().collect())
}

/// `NOT (pred)`
pub fn not(pred: Predicate) -> Predicate {
    Predicate::Not(Box::new(pred))
}

/// Raw fragment with `$1, $2, ...` markers numbered locally from 1.
///
/// # Example
/// ```ignore
/// raw(
///     "EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
///     params![user_id, target_id],
/// )
/// ```
pub fn raw(sql: impl Into<String>, params: Vec<Param>) -> Predicate {
    Predicate::Raw(RawSql::positional(sql, params))
}

/// Raw fragment with `$n` markers from homogeneous values.
pub fn raw_values<T: SqlValue>(sql: impl Into<String>, values: Vec<T>) -> Predicate {
    raw(sql, values.into_iter().map(Param::new).collect())
}

/// Raw fragment with `@name` markers.
///
/// Names must not collide with auto-generated ones (`p1`, `p2`, ...) in the
/// same statement. A name reused by a later fragment keeps the first
/// fragment's value.
pub fn raw_named<K: Into<String>>(
    sql: impl Into<String>,
    args: impl IntoIterator<Item = (K, Param)>,
) -> Predicate {
    Predicate::Raw(RawSql::named(sql, args))
}

/// Top-level predicates of one clause, joined with AND.
///
/// Unlike [`Predicate::And`], the joined list is never wrapped in parentheses:
/// `WHERE a = $1 AND b = $2`.
#[derive(Clone, Debug, Default)]
pub struct Clause {
    preds: Vec<Predicate>,
}

impl Clause {
    /// Create an empty clause.
    pub fn new() -> Self {
        Self { preds: Vec::new() }
    }

    /// Check if the clause has no predicates.
    pub fn is_empty(&self) -> bool {
        self.preds.is_empty()
    }

    /// Append a predicate.
    pub fn push(&mut self, pred: Predicate) {
        self.preds.push(pred);
    }

    /// Get all predicates.
    pub fn predicates(&self) -> &[Predicate] {
        &self.preds
    }

    /// Render the clause body (without keyword).
    ///
    /// Predicates rendering to an empty string (empty AND/OR groups) are
    /// skipped. The binder is verified after every predicate.
    pub fn render<B: Binder + ?Sized>(&self, binder: &mut B) -> QdslResult<String> {
        let mut parts = Vec::with_capacity(self.preds.len());
        for pred in &self.preds {
            let sql = pred.render(binder)?;
            binder.verify()?;
            if !sql.is_empty() {
                parts.push(sql);
            }
        }
        Ok(parts.join(" AND "))
    }

    /// Render and append ` <keyword> <body>` to `sql` if the body is non-empty.
    pub(crate) fn write_to<B: Binder + ?Sized>(
        &self,
        keyword: &str,
        sql: &mut String,
        binder: &mut B,
    ) -> QdslResult<()> {
        if self.preds.is_empty() {
            return Ok(());
        }
        let body = self.render(binder)?;
        if !body.is_empty() {
            sql.push(' ');
            sql.push_str(keyword);
            sql.push(' ');
            sql.push_str(&body);
        }
        Ok(())
    }
}
