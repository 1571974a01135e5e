//! Placeholder marker scanning shared by raw fragments, the bridge and the debug inliner.

use crate::error::QdslResult;
use regex::Regex;
use std::sync::LazyLock;

/// `$<index>` in raw fragments. Captures word characters so that `$x` is
/// reported as malformed.
pub(crate) static POSITIONAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)").expect("positional marker regex"));

/// `$<digits>` as emitted by the positional binder.
pub(crate) static NUMBERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("numbered marker regex"));

/// `@<name>`
pub(crate) static NAMED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").expect("named marker regex"));

/// Replace every match of `re` in `sql` with the closure's output.
///
/// The closure receives the first capture group. Unlike
/// [`Regex::replace_all`] the replacement may fail, which aborts the whole
/// rewrite.
pub(crate) fn try_replace_all<F>(re: &Regex, sql: &str, mut replace: F) -> QdslResult<String>
where
    F: FnMut(&str) -> QdslResult<String>,
{
    let mut out = String::with_capacity(sql.len());
    let mut last = 0;
    for caps in re.captures_iter(sql) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&sql[last..whole.start()]);
        out.push_str(&replace(inner.as_str())?);
        last = whole.end();
    }
    out.push_str(&sql[last..]);
    Ok(out)
}
