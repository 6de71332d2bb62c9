#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use sideconf_core::*;
    use std::sync::Arc;

    // ── Role tests ─────────────────────────────────────────────

    #[test]
    fn test_role_extension() {
        assert_eq!(Role::Client.extension(), "client");
        assert_eq!(Role::Server.extension(), "server");
        assert_eq!(Role::Common.extension(), "common");
    }

    #[test]
    fn test_role_default_file_name() {
        assert_eq!(Role::Client.default_file_name("demo"), "demo-client.toml");
        assert_eq!(Role::Server.default_file_name("demo"), "demo-server.toml");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("client".parse::<Role>().unwrap(), Role::Client);
        assert_eq!(" SERVER ".parse::<Role>().unwrap(), Role::Server);
        assert_eq!("common".parse::<Role>().unwrap(), Role::Common);
        assert!("both".parse::<Role>().is_err());
    }

    // ── Environment tests ──────────────────────────────────────

    #[test]
    fn test_physical_side_probe() {
        assert!(PhysicalSide::Client.is_client());
        assert!(!PhysicalSide::DedicatedServer.is_client());
        assert_eq!(PhysicalSide::default(), PhysicalSide::Client);
    }

    #[test]
    fn test_physical_side_from_str() {
        assert_eq!("client".parse::<PhysicalSide>().unwrap(), PhysicalSide::Client);
        assert_eq!("server".parse::<PhysicalSide>().unwrap(), PhysicalSide::DedicatedServer);
        assert_eq!(
            "dedicated_server".parse::<PhysicalSide>().unwrap(),
            PhysicalSide::DedicatedServer
        );
        assert!("toaster".parse::<PhysicalSide>().is_err());
    }

    // ── Error tests ────────────────────────────────────────────

    #[test]
    fn test_error_unsupported_role_display() {
        let err = SideconfError::UnsupportedRole(Role::Common);
        assert_eq!(err.to_string(), "common config type not supported");
    }

    #[test]
    fn test_error_registration_display() {
        let err = SideconfError::Registration {
            mod_id: "demo".into(),
            role: Role::Server,
            reason: "already registered".into(),
        };
        let s = err.to_string();
        assert!(s.contains("demo/server"));
        assert!(s.contains("already registered"));
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: SideconfError = anyhow::anyhow!("factory exploded").into();
        assert!(matches!(err, SideconfError::Other(_)));
        assert_eq!(err.to_string(), "factory exploded");
    }

    // ── Event tests ────────────────────────────────────────────

    #[test]
    fn test_event_constructors() {
        let load = ConfigEvent::loading("demo", Role::Client);
        assert!(!load.is_reload());
        assert_eq!(load.phase.label(), "Loading");

        let reload = ConfigEvent::reloading("demo", Role::Server);
        assert!(reload.is_reload());
        assert_eq!(reload.phase.to_string(), "Reloading");
    }

    #[test]
    fn test_bus_runs_handlers_in_subscription_order() {
        let bus = ConfigEventBus::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            bus.on_reloading(Arc::new(move |_event: &ConfigEvent| {
                seen.lock().push(tag);
                Ok(())
            }));
        }

        bus.post(ConfigEvent::reloading("demo", Role::Server)).unwrap();
        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_bus_routes_by_phase() {
        let bus = ConfigEventBus::default();
        let loads = Arc::new(Mutex::new(0));
        let reloads = Arc::new(Mutex::new(0));
        {
            let loads = Arc::clone(&loads);
            bus.on_loading(Arc::new(move |_: &ConfigEvent| {
                *loads.lock() += 1;
                Ok(())
            }));
        }
        {
            let reloads = Arc::clone(&reloads);
            bus.on_reloading(Arc::new(move |_: &ConfigEvent| {
                *reloads.lock() += 1;
                Ok(())
            }));
        }

        bus.post(ConfigEvent::loading("demo", Role::Client)).unwrap();
        bus.post(ConfigEvent::loading("demo", Role::Client)).unwrap();
        bus.post(ConfigEvent::reloading("demo", Role::Client)).unwrap();

        assert_eq!(*loads.lock(), 2);
        assert_eq!(*reloads.lock(), 1);
        assert_eq!(bus.handler_count(ConfigPhase::Loading), 1);
        assert_eq!(bus.handler_count(ConfigPhase::Reloading), 1);
    }

    #[test]
    fn test_bus_stops_at_first_error() {
        let bus = ConfigEventBus::default();
        let reached = Arc::new(Mutex::new(false));

        bus.on_loading(Arc::new(|event: &ConfigEvent| {
            Err(SideconfError::UnsupportedRole(event.role))
        }));
        {
            let reached = Arc::clone(&reached);
            bus.on_loading(Arc::new(move |_: &ConfigEvent| {
                *reached.lock() = true;
                Ok(())
            }));
        }

        let result = bus.post(ConfigEvent::loading("demo", Role::Common));
        assert!(matches!(result, Err(SideconfError::UnsupportedRole(Role::Common))));
        assert!(!*reached.lock());
    }

    #[test]
    fn test_bus_broadcasts_to_observers() {
        let bus = ConfigEventBus::new(8);
        let mut rx = bus.subscribe();

        bus.post(ConfigEvent::reloading("demo", Role::Server)).unwrap();

        let received = rx.try_recv().unwrap();
        assert_eq!(received, ConfigEvent::reloading("demo", Role::Server));
    }

    #[test]
    fn test_bus_failed_event_is_not_broadcast() {
        let bus = ConfigEventBus::new(8);
        let mut rx = bus.subscribe();
        bus.on_reloading(Arc::new(|e: &ConfigEvent| Err(SideconfError::UnsupportedRole(e.role))));

        assert!(bus.post(ConfigEvent::reloading("demo", Role::Common)).is_err());
        assert!(rx.try_recv().is_err());
    }
}
