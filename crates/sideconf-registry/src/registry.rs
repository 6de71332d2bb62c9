use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use sideconf_config::{ConfigRegistrar, ConfigSpec, SpecBuilder};
use sideconf_core::{
    ConfigEvent, ConfigEventSource, PhysicalSide, Result, Role, RuntimeEnvironment, SideconfError,
};

use crate::binder::ValueBinder;
use crate::callbacks::CallbackList;
use crate::object::ConfigObject;

/// A config object as held by the registry.
pub type Shared<T> = Arc<RwLock<T>>;

/// Owns the client and server config objects of one mod and keeps them in
/// sync with the host's config files.
///
/// The server object always exists. The client object exists only when the
/// runtime reports a client at construction time.
///
/// Setup order: construct, optionally set file names, then call
/// [`add_configs`](Self::add_configs) once. File names set afterwards have
/// no effect.
#[derive(Debug)]
pub struct ConfigRegistry<C, S> {
    client: Option<Shared<C>>,
    server: Shared<S>,
    client_callbacks: Arc<CallbackList>,
    server_callbacks: Arc<CallbackList>,
    /// Empty for the default name.
    client_file_name: String,
    /// Empty for the default name.
    server_file_name: String,
}

impl<C: ConfigObject, S: ConfigObject> ConfigRegistry<C, S> {
    pub fn new<E, FC, FS>(env: &E, client: FC, server: FS) -> Self
    where
        E: RuntimeEnvironment + ?Sized,
        FC: FnOnce() -> C,
        FS: FnOnce() -> S,
    {
        let client = env.is_client().then(|| Arc::new(RwLock::new(client())));
        let server = Arc::new(RwLock::new(server()));
        Self::from_parts(client, server)
    }

    /// Like [`new`](Self::new), probing the side with [`PhysicalSide::detect`].
    pub fn detect<FC, FS>(client: FC, server: FS) -> Self
    where
        FC: FnOnce() -> C,
        FS: FnOnce() -> S,
    {
        Self::new(&PhysicalSide::detect(), client, server)
    }

    /// Like [`new`](Self::new) for factories that can fail. The first failure
    /// is returned and no registry is built.
    pub fn try_new<E, FC, FS>(env: &E, client: FC, server: FS) -> Result<Self>
    where
        E: RuntimeEnvironment + ?Sized,
        FC: FnOnce() -> anyhow::Result<C>,
        FS: FnOnce() -> anyhow::Result<S>,
    {
        let client = if env.is_client() {
            Some(Arc::new(RwLock::new(client()?)))
        } else {
            None
        };
        let server = Arc::new(RwLock::new(server()?));
        Ok(Self::from_parts(client, server))
    }

    fn from_parts(client: Option<Shared<C>>, server: Shared<S>) -> Self {
        Self {
            client,
            server,
            client_callbacks: Arc::new(CallbackList::new()),
            server_callbacks: Arc::new(CallbackList::new()),
            client_file_name: String::new(),
            server_file_name: String::new(),
        }
    }

    pub fn set_client_file_name(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.client_file_name = file_name.into();
        self
    }

    pub fn set_server_file_name(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.server_file_name = file_name.into();
        self
    }

    pub fn client(&self) -> Option<&Shared<C>> {
        self.client.as_ref()
    }

    pub fn server(&self) -> &Shared<S> {
        &self.server
    }

    pub fn add_client_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.client_callbacks.push(callback);
    }

    pub fn add_server_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.server_callbacks.push(callback);
    }

    /// Callback list that (re)load events for `role` run.
    pub fn callbacks(&self, role: Role) -> Result<&CallbackList> {
        select(role, &self.client_callbacks, &self.server_callbacks)
    }

    /// Configured file name for `role`, `None` when the default applies.
    pub fn file_name(&self, role: Role) -> Result<Option<&str>> {
        let file_name = match role {
            Role::Client => &self.client_file_name,
            Role::Server => &self.server_file_name,
            Role::Common => return Err(SideconfError::UnsupportedRole(role)),
        };
        Ok((!file_name.is_empty()).then_some(file_name.as_str()))
    }

    /// Subscribe to load/reload events for `mod_id`, then declare and register
    /// every present config object with `registrar`.
    pub fn add_configs<E, R>(&self, mod_id: &str, events: &E, registrar: &R) -> Result<()>
    where
        E: ConfigEventSource + ?Sized,
        R: ConfigRegistrar + ?Sized,
    {
        // Register events before registering configs
        let router = Arc::new(EventRouter {
            mod_id: mod_id.to_string(),
            client: Arc::clone(&self.client_callbacks),
            server: Arc::clone(&self.server_callbacks),
        });
        let loading = Arc::clone(&router);
        events.on_loading(Arc::new(move |event: &ConfigEvent| loading.on_config_event(event)));
        events.on_reloading(Arc::new(move |event: &ConfigEvent| router.on_config_event(event)));

        // The reload hook goes first so it also runs on hosts that only
        // populate configs during registration and never send a load event.
        if let Some(client) = &self.client {
            let hook = Arc::clone(client);
            self.add_client_callback(move || hook.write().after_config_reload());
            register_config(
                mod_id,
                Role::Client,
                client,
                &self.client_callbacks,
                self.file_name(Role::Client)?,
                registrar,
            )?;
        }

        let hook = Arc::clone(&self.server);
        self.add_server_callback(move || hook.write().after_config_reload());
        register_config(
            mod_id,
            Role::Server,
            &self.server,
            &self.server_callbacks,
            self.file_name(Role::Server)?,
            registrar,
        )
    }
}

fn register_config<T, R>(
    mod_id: &str,
    role: Role,
    instance: &Shared<T>,
    callbacks: &CallbackList,
    file_name: Option<&str>,
    registrar: &R,
) -> Result<()>
where
    T: ConfigObject,
    R: ConfigRegistrar + ?Sized,
{
    let spec = build_spec(role, instance, callbacks)?;
    registrar.register_config(mod_id, role, spec, file_name)
}

/// Declare `instance` into a fresh builder. Its bindings reach `callbacks`
/// only if the declaration builds.
fn build_spec<T: ConfigObject>(
    role: Role,
    instance: &Shared<T>,
    callbacks: &CallbackList,
) -> Result<ConfigSpec> {
    let staged = CallbackList::new();
    let mut builder = SpecBuilder::new();
    instance
        .write()
        .setup_config(&mut builder, &ValueBinder::new(role, &staged, instance));
    let spec = builder.build()?;
    callbacks.append(staged);
    Ok(spec)
}

fn select<'a>(
    role: Role,
    client: &'a CallbackList,
    server: &'a CallbackList,
) -> Result<&'a CallbackList> {
    match role {
        Role::Client => Ok(client),
        Role::Server => Ok(server),
        Role::Common => Err(SideconfError::UnsupportedRole(role)),
    }
}

/// Event-side view of a registry: everything a subscribed handler needs.
struct EventRouter {
    mod_id: String,
    client: Arc<CallbackList>,
    server: Arc<CallbackList>,
}

impl EventRouter {
    fn on_config_event(&self, event: &ConfigEvent) -> Result<()> {
        // Hosts without per-mod event scoping deliver every mod's events here.
        if event.mod_id != self.mod_id {
            return Ok(());
        }
        select(event.role, &self.client, &self.server)?.run_all();
        info!("{} {} config for {}", event.phase, event.role, self.mod_id);
        Ok(())
    }
}
