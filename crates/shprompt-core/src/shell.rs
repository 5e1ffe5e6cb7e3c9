//! Shell script emission for exported prompt variables.

use std::collections::BTreeMap;
use std::fmt::Write;

/// A batch of environment changes, turned into a script the shell sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironMod {
    /// `None` means unset.
    vars: BTreeMap<String, Option<String>>,
}

impl EnvironMod {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), Some(value.into()));
    }

    pub fn unset_var(&mut self, name: impl Into<String>) {
        self.vars.insert(name.into(), None);
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Renders one `export`/`unset` line per variable, sorted by name.
    ///
    /// Values are quoted so that each expands to exactly the given string.
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for (name, value) in &self.vars {
            let _ = match value {
                Some(value) => writeln!(script, "export {name}={}", yash_quote::quoted(value)),
                None => writeln!(script, "unset {name}"),
            };
        }
        script
    }
}
