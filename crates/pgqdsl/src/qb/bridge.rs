//! Named → positional translation for drivers that only speak `$n`.

use std::collections::HashMap;

use crate::error::{QdslError, QdslResult};
use crate::qb::marker::{NAMED_MARKER, try_replace_all};
use crate::qb::param::{NamedArgs, ParamList};

/// Rewrite every `@name` marker in `sql` to `$n`.
///
/// The first occurrence of each distinct name takes the next position and its
/// value is appended to the returned list; later occurrences reuse that
/// position. Positions depend only on first-occurrence order in the text, never
/// on the iteration order of `args`. Arguments that no marker refers to are
/// dropped.
///
/// # Example
/// ```ignore
/// let args: NamedArgs = [("id", Param::new(42i32))].into_iter().collect();
/// let (sql, params) = named_to_positional("a = @id OR b = @id", &args)?;
/// assert_eq!(sql, "a = $1 OR b = $1");
/// assert_eq!(params.len(), 1);
/// ```
pub fn named_to_positional(sql: &str, args: &NamedArgs) -> QdslResult<(String, ParamList)> {
    let mut params = ParamList::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    let rewritten = try_replace_all(&NAMED_MARKER, sql, |name| {
        if let Some(pos) = seen.get(name) {
            return Ok(format!("${pos}"));
        }
        let value = args
            .get(name)
            .ok_or_else(|| QdslError::MissingNamedArg(name.to_string()))?;
        let pos = params.push_param(value.clone());
        seen.insert(name.to_string(), pos);
        Ok(format!("${pos}"))
    })?;

    Ok((rewritten, params))
}
