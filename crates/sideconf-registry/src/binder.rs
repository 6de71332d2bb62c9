use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use sideconf_config::{ConfigValue, ConfigValueType};
use sideconf_core::Role;

use crate::callbacks::CallbackList;

/// Handed to [`ConfigObject::setup_config`] so the object can tie each
/// declared value to the field it should be written back into.
///
/// Bindings are not run here. Each one becomes a callback on the role's list
/// and reads the value only when the host reports a (re)load.
///
/// [`ConfigObject::setup_config`]: crate::ConfigObject::setup_config
pub struct ValueBinder<'a, C> {
    role: Role,
    callbacks: &'a CallbackList,
    instance: &'a Arc<RwLock<C>>,
}

impl<'a, C> ValueBinder<'a, C>
where
    C: Send + Sync + 'static,
{
    pub(crate) fn new(role: Role, callbacks: &'a CallbackList, instance: &'a Arc<RwLock<C>>) -> Self {
        Self {
            role,
            callbacks,
            instance,
        }
    }

    /// Role of the spec being declared.
    pub fn role(&self) -> Role {
        self.role
    }

    /// On every (re)load, call `save` with the config object and the current value.
    pub fn bind<T, F>(&self, value: &ConfigValue<T>, save: F)
    where
        T: ConfigValueType,
        F: Fn(&mut C, T) + Send + Sync + 'static,
    {
        let value = value.clone();
        let instance = Arc::clone(self.instance);
        self.callbacks.push(move || {
            let current = value.get();
            let mut guard = instance.write();
            save(&mut *guard, current);
        });
    }
}

impl<C> fmt::Debug for ValueBinder<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBinder")
            .field("role", &self.role)
            .field("callbacks", self.callbacks)
            .finish()
    }
}
