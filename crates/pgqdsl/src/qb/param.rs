//! Parameter storage using Arc for clone-friendly query builders.
//!
//! Values are opaque to the engine: they are positioned, bound to a driver call,
//! and printed by the debug inliner through [`SqlValue::literal`], nothing else.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Debug rendering of a bound value as a SQL literal.
///
/// Never use this to build executable SQL: text literals only get their quotes
/// doubled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    /// `NULL`
    Null,
    /// `TRUE` / `FALSE`
    Bool(bool),
    /// Single-quoted text
    Text(String),
    /// Any other value in its default textual form
    Other(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("NULL"),
            Literal::Bool(true) => f.write_str("TRUE"),
            Literal::Bool(false) => f.write_str("FALSE"),
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Other(s) => f.write_str(s),
        }
    }
}

/// A value that can be bound as a statement parameter.
///
/// Implemented for the scalar types `tokio-postgres` can encode. Implement it for
/// your own `ToSql` types to use them in predicates.
pub trait SqlValue: ToSql + Send + Sync + 'static {
    /// Literal form used by the debug inliner.
    fn literal(&self) -> Literal;
}

macro_rules! impl_sql_value_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SqlValue for $ty {
                fn literal(&self) -> Literal {
                    Literal::Other(self.to_string())
                }
            }
        )*
    };
}

impl_sql_value_display!(
    i16,
    i32,
    i64,
    u32,
    f32,
    f64,
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    chrono::DateTime<chrono::FixedOffset>,
);

impl SqlValue for bool {
    fn literal(&self) -> Literal {
        Literal::Bool(*self)
    }
}

impl SqlValue for &'static str {
    fn literal(&self) -> Literal {
        Literal::Text((*self).to_string())
    }
}

impl SqlValue for String {
    fn literal(&self) -> Literal {
        Literal::Text(self.clone())
    }
}

impl SqlValue for serde_json::Value {
    fn literal(&self) -> Literal {
        Literal::Text(self.to_string())
    }
}

impl<T: SqlValue> SqlValue for Option<T> {
    fn literal(&self) -> Literal {
        match self {
            Some(v) => v.literal(),
            None => Literal::Null,
        }
    }
}

// Postgres array parameter.
impl<T: SqlValue> SqlValue for Vec<T> {
    fn literal(&self) -> Literal {
        let items: Vec<String> = self.iter().map(|v| v.literal().to_string()).collect();
        Literal::Other(format!("ARRAY[{}]", items.join(", ")))
    }
}

/// Object-safe view over a [`SqlValue`].
trait BoundValue: Send + Sync {
    fn as_to_sql(&self) -> &(dyn ToSql + Sync);
    fn literal(&self) -> Literal;
}

impl<T: SqlValue> BoundValue for T {
    fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        self
    }

    fn literal(&self) -> Literal {
        SqlValue::literal(self)
    }
}

/// A clone-friendly parameter wrapper using Arc.
///
/// Cloning a predicate tree or a builder never copies parameter values.
#[derive(Clone)]
pub struct Param(Arc<dyn BoundValue>);

impl Param {
    /// Create a new parameter from any [`SqlValue`].
    pub fn new<T: SqlValue>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_ref(&self) -> &(dyn ToSql + Sync) {
        self.0.as_to_sql()
    }

    /// Debug literal for this value.
    pub fn literal(&self) -> Literal {
        self.0.literal()
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Param")
            .field(&format_args!("{}", self.literal()))
            .finish()
    }
}

/// Build a `Vec<Param>` from heterogeneous values.
///
/// ```ignore
/// let row = pgqdsl::params!["Alice", 30i32, true];
/// ```
#[macro_export]
macro_rules! params {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::qb::Param::new($value)),*]
    };
}

/// Ordered parameters of a positional statement, aligned 1:1 with `$1, $2, ...`.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a pre-wrapped Param and return its 1-based index.
    pub fn push_param(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter at a 1-based placeholder position.
    pub fn get(&self, position: usize) -> Option<&Param> {
        position.checked_sub(1).and_then(|i| self.params.get(i))
    }

    /// Iterate in placeholder order.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// Get all parameters as references for tokio-postgres.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }

    /// Debug literals in placeholder order.
    pub fn literals(&self) -> Vec<String> {
        self.params.iter().map(|p| p.literal().to_string()).collect()
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<Param> {
        self.params
    }
}

impl From<Vec<Param>> for ParamList {
    fn from(params: Vec<Param>) -> Self {
        Self { params }
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Arguments of a named statement, keyed by marker name (without the `@`).
///
/// Iteration order is unspecified; nothing in this crate depends on it.
#[derive(Clone, Debug, Default)]
pub struct NamedArgs {
    args: HashMap<String, Param>,
}

impl NamedArgs {
    /// Create an empty argument map.
    pub fn new() -> Self {
        Self {
            args: HashMap::new(),
        }
    }

    /// Insert a value, returning the previous value for that name.
    pub fn insert(&mut self, name: impl Into<String>, param: Param) -> Option<Param> {
        self.args.insert(name.into(), param)
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.args.get(name)
    }

    /// Check whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Check if no names are bound.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Iterate over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.args.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Debug literal for a name.
    pub fn literal(&self, name: &str) -> Option<String> {
        self.args.get(name).map(|p| p.literal().to_string())
    }
}

impl<K: Into<String>> FromIterator<(K, Param)> for NamedArgs {
    fn from_iter<I: IntoIterator<Item = (K, Param)>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
