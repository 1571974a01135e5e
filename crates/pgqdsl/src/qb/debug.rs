//! Literal inlining for logs.
//!
//! The output is for humans reading logs. Values are printed with their
//! [`Literal`](crate::qb::Literal) form; nothing here is safe to execute.

use crate::error::QdslResult;
use crate::qb::marker::{NAMED_MARKER, NUMBERED_MARKER};
use crate::qb::param::{NamedArgs, ParamList};
use crate::qb::traits::Statement;
use regex::Captures;

/// Replace every `$n` in `sql` with the literal of the n-th value.
///
/// Markers are matched with their whole numeral in a single left-to-right
/// pass, so `$1` never matches inside `$10` and inlined text is never scanned
/// again. Markers without a value are left as written.
pub fn inline_positional(sql: &str, params: &ParamList) -> String {
    NUMBERED_MARKER
        .replace_all(sql, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|n| params.get(n))
                .map(|p| p.literal().to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace every `@name` in `sql` with the literal of its value.
///
/// Unknown names are left as written.
pub fn inline_named(sql: &str, args: &NamedArgs) -> String {
    NAMED_MARKER
        .replace_all(sql, |caps: &Captures<'_>| {
            args.literal(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Build `stmt` positionally and inline its values.
///
/// # Example
/// ```ignore
/// let stmt = select(["*"]).from("users").filter(eq("name", "O'Brien"));
/// assert_eq!(to_sql(&stmt)?, "SELECT * FROM users WHERE name = 'O''Brien'");
/// ```
pub fn to_sql(stmt: &impl Statement) -> QdslResult<String> {
    stmt.to_debug_sql()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::param::Param;

    #[test]
    fn ten_and_one_are_distinct_markers() {
        let params: ParamList = (1..=10i32).map(|i| Param::new(i * 100)).collect::<Vec<_>>().into();
        let sql = inline_positional("a = $1 AND b = $10 AND c = $2", &params);
        assert_eq!(sql, "a = 100 AND b = 1000 AND c = 200");
    }

    #[test]
    fn inlined_values_are_not_rescanned() {
        let params = ParamList::from(crate::params!["costs $2", 5i32]);
        let sql = inline_positional("a = $1 AND b = $2", &params);
        assert_eq!(sql, "a = 'costs $2' AND b = 5");
    }

    #[test]
    fn quotes_null_and_bool_literals() {
        let params = ParamList::from(crate::params!["O'Brien", None::<i32>, false]);
        let sql = inline_positional("n = $1 AND d = $2 AND f = $3", &params);
        assert_eq!(sql, "n = 'O''Brien' AND d = NULL AND f = FALSE");
    }

    #[test]
    fn missing_position_is_left_alone() {
        let params = ParamList::from(crate::params![1i32]);
        assert_eq!(inline_positional("a = $1 AND b = $3", &params), "a = 1 AND b = $3");
    }

    #[test]
    fn named_inlining() {
        let args: NamedArgs = [("p1", Param::new("x")), ("owner", Param::new(7i64))]
            .into_iter()
            .collect();
        let sql = inline_named("a = @p1 AND o = @owner AND t @> '{}' AND z = @zz", &args);
        assert_eq!(sql, "a = 'x' AND o = 7 AND t @> '{}' AND z = @zz");
    }
}
