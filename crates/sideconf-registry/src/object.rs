use sideconf_config::SpecBuilder;

use crate::binder::ValueBinder;

/// A config object managed by a [`ConfigRegistry`](crate::ConfigRegistry).
pub trait ConfigObject: Sized + Send + Sync + 'static {
    /// Declare every field into `builder`. Fields that should follow the file
    /// on reload are bound through `binder`.
    fn setup_config(&mut self, builder: &mut SpecBuilder, binder: &ValueBinder<'_, Self>);

    /// Refresh derived or cached state. Runs first on every load and reload.
    fn after_config_reload(&mut self) {}
}
