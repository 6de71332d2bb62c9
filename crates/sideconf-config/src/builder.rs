use std::sync::Arc;
use toml::Value;

use sideconf_core::{Result, SideconfError};

use crate::spec::ConfigSpec;
use crate::value::{ConfigValue, ConfigValueType, Store};

/// Metadata recorded for every declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecEntry {
    pub path: Vec<String>,
    pub default: Value,
    pub comment: Vec<String>,
    /// Inclusive bounds, kept for documentation. Not enforced.
    pub range: Option<(Value, Value)>,
}

impl SpecEntry {
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// Collects field declarations and produces a [`ConfigSpec`].
///
/// Declaration mistakes (unbalanced `pop`, duplicate paths, defaults that have
/// no TOML representation) are collected and reported together by [`build`].
///
/// [`build`]: SpecBuilder::build
#[derive(Debug, Default)]
pub struct SpecBuilder {
    store: Store,
    entries: Vec<SpecEntry>,
    section: Vec<String>,
    pending_comment: Vec<String>,
    errors: Vec<String>,
}

impl SpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a comment line to the next declared field.
    pub fn comment(&mut self, line: impl Into<String>) -> &mut Self {
        self.pending_comment.push(line.into());
        self
    }

    /// Open a nested section; subsequent fields live under it.
    pub fn push(&mut self, section: impl Into<String>) -> &mut Self {
        self.section.push(section.into());
        self
    }

    pub fn pop(&mut self) -> &mut Self {
        if self.section.pop().is_none() {
            self.errors
                .push("attempted to pop more sections than were pushed".into());
        }
        self
    }

    pub fn define<T: ConfigValueType>(&mut self, name: impl Into<String>, default: T) -> ConfigValue<T> {
        self.define_entry(name.into(), default, None)
    }

    /// Like [`define`](Self::define), recording `[min, max]` alongside the field.
    pub fn define_in_range<T>(
        &mut self,
        name: impl Into<String>,
        default: T,
        min: T,
        max: T,
    ) -> ConfigValue<T>
    where
        T: ConfigValueType + PartialOrd,
    {
        let name = name.into();
        if min > max {
            self.errors
                .push(format!("{}: empty range", self.dotted(&name)));
        }
        let range = match (Value::try_from(&min), Value::try_from(&max)) {
            (Ok(lo), Ok(hi)) => Some((lo, hi)),
            _ => None,
        };
        self.define_entry(name, default, range)
    }

    fn define_entry<T: ConfigValueType>(
        &mut self,
        name: String,
        default: T,
        range: Option<(Value, Value)>,
    ) -> ConfigValue<T> {
        let mut path = self.section.clone();
        path.push(name);
        let dotted = path.join(".");

        if path.iter().any(|segment| segment.is_empty()) {
            self.errors.push(format!("{dotted}: empty path segment"));
        }
        if let Some(existing) = self.entries.iter().find(|e| overlaps(&e.path, &path)) {
            if existing.path == path {
                self.errors.push(format!("duplicate config path: {dotted}"));
            } else {
                self.errors.push(format!(
                    "config path {dotted} conflicts with {}",
                    existing.dotted_path()
                ));
            }
        }

        let comment = std::mem::take(&mut self.pending_comment);
        match Value::try_from(&default) {
            Ok(value) => self.entries.push(SpecEntry {
                path: path.clone(),
                default: value,
                comment,
                range,
            }),
            Err(e) => self
                .errors
                .push(format!("{dotted}: default has no TOML representation: {e}")),
        }

        ConfigValue::new(path, default, Arc::clone(&self.store))
    }

    fn dotted(&self, name: &str) -> String {
        let mut path = self.section.clone();
        path.push(name.to_string());
        path.join(".")
    }

    pub fn build(mut self) -> Result<ConfigSpec> {
        if !self.section.is_empty() {
            let open = self.section.join(".");
            self.errors.push(format!("unclosed section: {open}"));
        }
        if !self.errors.is_empty() {
            return Err(SideconfError::Spec(self.errors.join("; ")));
        }
        Ok(ConfigSpec::new(self.store, self.entries))
    }
}

/// True when one path equals or is a prefix of the other.
fn overlaps(a: &[String], b: &[String]) -> bool {
    let shared = a.len().min(b.len());
    a[..shared] == b[..shared]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_attaches_to_next_field_only() {
        let mut builder = SpecBuilder::new();
        builder.comment("first line").comment("second line");
        let _a = builder.define("a", 1_i64);
        let _b = builder.define("b", 2_i64);

        assert_eq!(builder.entries[0].comment, vec!["first line", "second line"]);
        assert!(builder.entries[1].comment.is_empty());
    }

    #[test]
    fn test_sections_prefix_paths() {
        let mut builder = SpecBuilder::new();
        builder.push("general").push("display");
        let scale = builder.define("scale", 1.0_f64);
        builder.pop().pop();

        assert_eq!(scale.dotted_path(), "general.display.scale");
        assert!(builder.section.is_empty());
        assert!(builder.errors.is_empty());
    }

    #[test]
    fn test_overlaps() {
        let a = vec!["x".to_string()];
        let ab = vec!["x".to_string(), "y".to_string()];
        let c = vec!["z".to_string()];
        assert!(overlaps(&a, &ab));
        assert!(overlaps(&ab, &a));
        assert!(overlaps(&a, &a));
        assert!(!overlaps(&a, &c));
    }
}
