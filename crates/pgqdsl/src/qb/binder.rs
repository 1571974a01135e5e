//! Placeholder-minting strategies.
//!
//! A [`Binder`] owns the cursor of one render pass. Predicates ask it for a
//! marker per value and hand it raw fragments to merge; the binder decides what
//! the marker looks like and where the value goes:
//!
//! - [`Positional`]: `$1, $2, ...` with values appended to a [`ParamList`]
//! - [`Named`]: `@p1, @p2, ...` with values inserted into [`NamedArgs`]

use std::collections::{HashMap, HashSet};

use crate::error::{QdslError, QdslResult};
use crate::qb::marker::{NAMED_MARKER, try_replace_all};
use crate::qb::param::{NamedArgs, Param, ParamList};
use crate::qb::raw::{RawArgs, RawSql};

/// Cursor plus argument sink for one render pass.
pub trait Binder {
    /// Consume one placeholder slot for `value` and return its marker text.
    fn bind(&mut self, value: &Param) -> QdslResult<String>;

    /// Merge a raw fragment into this binder's numbering and return the
    /// rewritten fragment.
    fn bind_raw(&mut self, raw: &RawSql) -> QdslResult<String>;

    /// Placeholder slots consumed so far in this pass.
    fn slots(&self) -> usize;

    /// Check that every marker emitted so far refers to a collected value.
    fn verify(&self) -> QdslResult<()>;
}

/// `$n` placeholders backed by an ordered [`ParamList`].
#[derive(Debug)]
pub struct Positional {
    /// Position of the first slot minus one.
    base: usize,
    slots: usize,
    params: ParamList,
    /// Highest `$n` written into the SQL so far.
    max_marker: usize,
    /// Positions already given to `@name` markers of raw fragments.
    named_positions: HashMap<String, usize>,
}

impl Positional {
    /// Start numbering at `$1`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Start numbering at `$start` (values below 1 are treated as 1).
    pub fn starting_at(start: usize) -> Self {
        Self {
            base: start.max(1) - 1,
            slots: 0,
            params: ParamList::new(),
            max_marker: 0,
            named_positions: HashMap::new(),
        }
    }

    /// Position the next bound value will receive.
    pub fn next_position(&self) -> usize {
        self.base + self.slots + 1
    }

    /// Finish the pass and take the collected values.
    pub fn into_params(self) -> ParamList {
        self.params
    }

    fn push(&mut self, value: Param) -> usize {
        self.params.push_param(value);
        self.slots += 1;
        self.base + self.slots
    }

    fn marker(&mut self, pos: usize) -> String {
        self.max_marker = self.max_marker.max(pos);
        format!("${pos}")
    }
}

impl Default for Positional {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder for Positional {
    fn bind(&mut self, value: &Param) -> QdslResult<String> {
        let pos = self.push(value.clone());
        Ok(self.marker(pos))
    }

    fn bind_raw(&mut self, raw: &RawSql) -> QdslResult<String> {
        match &raw.args {
            RawArgs::Positional(values) => {
                let shift = self.next_position() - 1;
                let mut highest = 0;
                let sql = raw.rewrite_positional(values.len(), |n| {
                    highest = highest.max(n + shift);
                    format!("${}", n + shift)
                })?;
                self.max_marker = self.max_marker.max(highest);
                for v in values {
                    self.push(v.clone());
                }
                Ok(sql)
            }
            RawArgs::Named(_) => {
                // Same first-occurrence rule as the bridge, across every fragment of the pass.
                try_replace_all(&NAMED_MARKER, &raw.sql, |name| {
                    if let Some(&pos) = self.named_positions.get(name) {
                        return Ok(self.marker(pos));
                    }
                    let value = raw
                        .named_value(name)
                        .ok_or_else(|| QdslError::MissingNamedArg(name.to_string()))?;
                    let pos = self.push(value.clone());
                    self.named_positions.insert(name.to_string(), pos);
                    Ok(self.marker(pos))
                })
            }
        }
    }

    fn slots(&self) -> usize {
        self.slots
    }

    fn verify(&self) -> QdslResult<()> {
        let highest = self.max_marker.saturating_sub(self.base);
        if highest > self.params.len() {
            return Err(QdslError::ParamMismatch {
                placeholders: highest,
                params: self.params.len(),
            });
        }
        Ok(())
    }
}

/// `@name` placeholders backed by a [`NamedArgs`] map.
///
/// Auto-generated names are `<prefix><counter>` (`p1`, `p2`, ...). Names
/// supplied by raw fragments are merged as-is and do not advance the counter;
/// a raw name equal to an auto-generated one is rejected with
/// [`QdslError::NameCollision`].
#[derive(Debug)]
pub struct Named {
    prefix: String,
    start: usize,
    counter: usize,
    args: NamedArgs,
    auto_names: HashSet<String>,
    raw_names: HashSet<String>,
    /// Names written into the SQL so far.
    referenced: HashSet<String>,
}

impl Named {
    /// Auto names start at `p1`.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Auto names continue after `counter` (the next one is `p{counter + 1}`).
    pub fn starting_at(counter: usize) -> Self {
        Self {
            prefix: "p".to_string(),
            start: counter,
            counter,
            args: NamedArgs::new(),
            auto_names: HashSet::new(),
            raw_names: HashSet::new(),
            referenced: HashSet::new(),
        }
    }

    /// Override the auto-name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Current counter value (the last auto name minted).
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Finish the pass and take the collected values.
    pub fn into_args(self) -> NamedArgs {
        self.args
    }

    fn mint(&mut self, value: Param) -> QdslResult<String> {
        self.counter += 1;
        let name = format!("{}{}", self.prefix, self.counter);
        if self.raw_names.contains(&name) {
            return Err(QdslError::NameCollision(name));
        }
        self.auto_names.insert(name.clone());
        self.referenced.insert(name.clone());
        self.args.insert(name.clone(), value);
        Ok(name)
    }
}

impl Default for Named {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder for Named {
    fn bind(&mut self, value: &Param) -> QdslResult<String> {
        let name = self.mint(value.clone())?;
        Ok(format!("@{name}"))
    }

    fn bind_raw(&mut self, raw: &RawSql) -> QdslResult<String> {
        match &raw.args {
            RawArgs::Named(pairs) => {
                let mut fresh = Vec::new();
                for (name, value) in pairs {
                    if self.auto_names.contains(name) {
                        return Err(QdslError::NameCollision(name.clone()));
                    }
                    // An earlier fragment keeps its value; within a fragment the last pair wins.
                    if self.raw_names.contains(name) && !fresh.contains(name) {
                        continue;
                    }
                    fresh.push(name.clone());
                    self.args.insert(name.clone(), value.clone());
                }
                self.raw_names.extend(fresh);
                for caps in NAMED_MARKER.captures_iter(&raw.sql) {
                    if let Some(name) = caps.get(1) {
                        self.referenced.insert(name.as_str().to_string());
                    }
                }
                Ok(raw.sql.clone())
            }
            RawArgs::Positional(values) => {
                let names = values
                    .iter()
                    .map(|v| self.mint(v.clone()))
                    .collect::<QdslResult<Vec<_>>>()?;
                raw.rewrite_positional(names.len(), |n| format!("@{}", names[n - 1]))
            }
        }
    }

    fn slots(&self) -> usize {
        self.counter - self.start
    }

    fn verify(&self) -> QdslResult<()> {
        match self.referenced.iter().find(|name| !self.args.contains(name)) {
            Some(name) => Err(QdslError::MissingNamedArg(name.to_string())),
            None => Ok(()),
        }
    }
}
