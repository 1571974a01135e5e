//! Row mapping traits and utilities

use std::fmt;

use crate::error::{QdslError, QdslResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for types that can be constructed from a database row.
///
/// # Example
/// ```ignore
/// struct User { id: i64, name: String }
///
/// impl FromRow for User {
///     fn from_row(row: &Row) -> QdslResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             name: row.try_get_column("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> QdslResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning [`QdslError::Decode`] on failure
    fn try_get_column<T>(&self, column: &str) -> QdslResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> QdslResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| QdslError::decode(column, e.to_string()))
    }
}

macro_rules! impl_from_row_tuple {
    ($($idx:tt => $ty:ident),+) => {
        impl<$($ty),+> FromRow for ($($ty,)+)
        where
            $($ty: for<'a> FromSql<'a>,)+
        {
            fn from_row(row: &Row) -> QdslResult<Self> {
                Ok(($(
                    row.try_get::<_, $ty>($idx)
                        .map_err(|e| QdslError::decode(stringify!($idx), e.to_string()))?,
                )+))
            }
        }
    };
}

impl_from_row_tuple!(0 => A);
impl_from_row_tuple!(0 => A, 1 => B);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C);
impl_from_row_tuple!(0 => A, 1 => B, 2 => C, 3 => D);

type Setter<T> = Box<dyn Fn(&mut T, &Row, usize) -> QdslResult<()> + Send + Sync>;

/// Explicit column → field mapping for types without a [`FromRow`] impl.
///
/// Each declared column is looked up by name and decoded into the setter's
/// value type. Row columns that are not declared are ignored; a declared column
/// missing from the row is a [`QdslError::Decode`] error.
///
/// ```ignore
/// #[derive(Default)]
/// struct Alert { uuid: String, level: i32 }
///
/// let mapper = RowMapper::<Alert>::new()
///     .column("uuid", |a, v: String| a.uuid = v)
///     .column("level", |a, v: i32| a.level = v);
/// let alerts = executor.fetch_all_with(&stmt, &mapper).await?;
/// ```
pub struct RowMapper<T> {
    columns: Vec<(String, Setter<T>)>,
}

impl<T: Default> RowMapper<T> {
    /// Create a mapper with no columns.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Declare a column and the setter that stores its decoded value.
    pub fn column<V, F>(mut self, name: impl Into<String>, set: F) -> Self
    where
        T: 'static,
        V: for<'a> FromSql<'a> + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let name = name.into();
        let column = name.clone();
        let setter: Setter<T> = Box::new(move |target: &mut T, row: &Row, idx: usize| {
            let value = row
                .try_get::<_, V>(idx)
                .map_err(|e| QdslError::decode(&column, e.to_string()))?;
            set(target, value);
            Ok(())
        });
        self.columns.push((name, setter));
        self
    }

    /// Declared column names in mapping order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Map one row.
    pub fn map(&self, row: &Row) -> QdslResult<T> {
        let mut target = T::default();
        for (name, setter) in &self.columns {
            let idx = row
                .columns()
                .iter()
                .position(|c| c.name() == name)
                .ok_or_else(|| QdslError::decode(name, "column not present in row"))?;
            setter(&mut target, row, idx)?;
        }
        Ok(target)
    }

    /// Map every row, failing on the first error.
    pub fn map_all(&self, rows: &[Row]) -> QdslResult<Vec<T>> {
        rows.iter().map(|row| self.map(row)).collect()
    }
}

impl<T: Default> Default for RowMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RowMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowMapper")
            .field(
                "columns",
                &self.columns.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
