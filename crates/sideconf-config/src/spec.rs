use std::path::Path;
use toml::{Table, Value};
use tracing::warn;

use sideconf_core::{Result, SideconfError};

use crate::builder::SpecEntry;
use crate::value::Store;

/// A built, queryable config spec.
///
/// Values handed out by the builder stay connected to this spec: loading new
/// contents here is immediately visible through every [`ConfigValue`].
///
/// [`ConfigValue`]: crate::ConfigValue
#[derive(Debug)]
pub struct ConfigSpec {
    store: Store,
    entries: Vec<SpecEntry>,
}

impl ConfigSpec {
    pub(crate) fn new(store: Store, entries: Vec<SpecEntry>) -> Self {
        Self { store, entries }
    }

    pub fn entries(&self) -> &[SpecEntry] {
        &self.entries
    }

    pub fn is_loaded(&self) -> bool {
        self.store.read().is_some()
    }

    /// Replace the loaded contents.
    pub fn load(&self, table: Table) {
        for key in self.unknown_keys(&table) {
            warn!(key = %key, "ignoring undeclared config key");
        }
        *self.store.write() = Some(table);
    }

    /// Parse `raw` as TOML and load it. On error the current contents are kept.
    pub fn load_str(&self, raw: &str, origin: &Path) -> Result<()> {
        let table = toml::from_str::<Table>(raw).map_err(|e| SideconfError::Parse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.load(table);
        Ok(())
    }

    /// Mark the spec loaded with nothing stored, so every value reports its default.
    pub fn reset(&self) {
        *self.store.write() = Some(Table::new());
    }

    /// Declared defaults arranged as the nested table a config file would hold.
    pub fn default_table(&self) -> Table {
        let mut table = Table::new();
        for entry in &self.entries {
            insert_path(&mut table, &entry.path, entry.default.clone());
        }
        table
    }

    /// Dotted keys present in `table` that no declared field covers.
    pub fn unknown_keys(&self, table: &Table) -> Vec<String> {
        let mut unknown = Vec::new();
        self.collect_unknown(table, &mut Vec::new(), &mut unknown);
        unknown
    }

    fn collect_unknown(&self, table: &Table, prefix: &mut Vec<String>, out: &mut Vec<String>) {
        for (key, value) in table {
            prefix.push(key.clone());
            let declared = self.entries.iter().any(|e| e.path == *prefix);
            let is_section = self
                .entries
                .iter()
                .any(|e| e.path.len() > prefix.len() && e.path.starts_with(prefix));
            if !declared {
                match value {
                    Value::Table(inner) if is_section => self.collect_unknown(inner, prefix, out),
                    _ => out.push(prefix.join(".")),
                }
            }
            prefix.pop();
        }
    }
}

fn insert_path(table: &mut Table, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = table;
    for key in parents {
        let slot = current
            .entry(key.clone())
            .or_insert(Value::Table(Table::new()));
        let Value::Table(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}
