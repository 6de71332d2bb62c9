use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use toml::{Table, Value};
use tracing::warn;

/// Loaded contents of a spec, shared by the spec and all of its value handles.
/// `None` until the host has populated the spec.
pub(crate) type Store = Arc<RwLock<Option<Table>>>;

/// Types that can be declared as config fields.
pub trait ConfigValueType: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> ConfigValueType for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Handle to one declared field. Reads through to whatever the host loaded.
#[derive(Debug, Clone)]
pub struct ConfigValue<T> {
    path: Arc<[String]>,
    default: T,
    store: Store,
}

impl<T: ConfigValueType> ConfigValue<T> {
    pub(crate) fn new(path: Vec<String>, default: T, store: Store) -> Self {
        Self {
            path: path.into(),
            default,
            store,
        }
    }

    /// The effective value: the stored one if present and well-typed, else the default.
    pub fn get(&self) -> T {
        let store = self.store.read();
        let Some(raw) = store.as_ref().and_then(|table| lookup(table, &self.path)) else {
            return self.default.clone();
        };
        match raw.clone().try_into::<T>() {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.dotted_path(), error = %e, "stored value has the wrong type, using default");
                self.default.clone()
            }
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }
}

pub(crate) fn lookup<'a>(table: &'a Table, path: &[String]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = table;
    for key in parents {
        current = current.get(key)?.as_table()?;
    }
    current.get(last)
}
