use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use sideconf_config::ConfigTracker;
use sideconf_core::Result;

use crate::demo::DemoRegistry;

pub(super) async fn cmd_watch(
    tracker: Arc<ConfigTracker>,
    registry: DemoRegistry,
    json: bool,
) -> Result<()> {
    super::print_snapshot(&registry, json)?;

    let mut events = tracker.events().subscribe();
    // Dropping the watcher stops it.
    let _watcher = tracker.watch()?;
    println!(
        "Watching {} for changes. Press Ctrl-C to stop.",
        tracker.config_dir().display()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            res = &mut shutdown => {
                res?;
                info!("stopping config watcher");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    println!("\n# {} {} config for {}", event.phase, event.role, event.mod_id);
                    super::print_snapshot(&registry, json)?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "watcher fell behind, some reloads were not printed");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}
