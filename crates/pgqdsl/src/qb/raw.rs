//! Raw SQL fragments that arrive with their own placeholders.

use crate::error::{QdslError, QdslResult};
use crate::qb::marker::{POSITIONAL_MARKER, try_replace_all};
use crate::qb::param::Param;

/// Arguments carried by a raw fragment, in the addressing scheme its markers use.
#[derive(Clone, Debug)]
pub enum RawArgs {
    /// Values for `$1, $2, ...`, in index order.
    Positional(Vec<Param>),
    /// Values for `@name` markers.
    Named(Vec<(String, Param)>),
}

/// A literal SQL fragment plus the values its markers refer to.
///
/// Positional fragments are numbered from `$1` locally; rendering shifts them
/// into the statement's numbering.
#[derive(Clone, Debug)]
pub struct RawSql {
    pub(crate) sql: String,
    pub(crate) args: RawArgs,
}

impl RawSql {
    /// Fragment with `$n` markers.
    pub fn positional(sql: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            sql: sql.into(),
            args: RawArgs::Positional(params),
        }
    }

    /// Fragment with `@name` markers.
    pub fn named<K: Into<String>>(
        sql: impl Into<String>,
        args: impl IntoIterator<Item = (K, Param)>,
    ) -> Self {
        Self {
            sql: sql.into(),
            args: RawArgs::Named(args.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    /// The fragment text as written.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The carried arguments.
    pub fn args(&self) -> &RawArgs {
        &self.args
    }

    /// Rewrite every `$n` through `marker_for(n)` after checking that `n`
    /// names one of the `count` supplied values.
    pub(crate) fn rewrite_positional<F>(&self, count: usize, mut marker_for: F) -> QdslResult<String>
    where
        F: FnMut(usize) -> String,
    {
        try_replace_all(&POSITIONAL_MARKER, &self.sql, |index| {
            let n = self.parse_index(index, count)?;
            Ok(marker_for(n))
        })
    }

    /// Value for a name in a named fragment; later pairs win over earlier ones.
    pub(crate) fn named_value(&self, name: &str) -> Option<&Param> {
        match &self.args {
            RawArgs::Named(pairs) => pairs.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v),
            RawArgs::Positional(_) => None,
        }
    }

    fn parse_index(&self, index: &str, count: usize) -> QdslResult<usize> {
        let n: usize = index.parse().map_err(|_| {
            QdslError::malformed_raw(&self.sql, format!("non-numeric placeholder `${index}`"))
        })?;
        if n == 0 || n > count {
            return Err(QdslError::malformed_raw(
                &self.sql,
                format!("placeholder `${n}` out of range for {count} argument(s)"),
            ));
        }
        Ok(n)
    }
}
