//! `apctl watch`: run the polling coordinator in the foreground and print
//! the entity table every time a new snapshot is installed or a refresh
//! fails (entities then show as unavailable).

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::Tabled;

use apctl_core::{Coordinator, Entity, Snapshot, entities};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Serializable view of an [`Entity`] for structured output.
#[derive(Serialize)]
struct EntityView {
    unique_id: String,
    device: String,
    name: String,
    state: String,
    available: bool,
    attributes: Map<String, Value>,
}

impl From<&Entity> for EntityView {
    fn from(e: &Entity) -> Self {
        Self {
            unique_id: e.unique_id(),
            device: e.device_info().name.clone(),
            name: e.name(),
            state: e.state(),
            available: e.available(),
            attributes: e.attributes(),
        }
    }
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Entity")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "ID")]
    unique_id: String,
}

fn render(
    coordinator: &Coordinator,
    snapshot: &Snapshot,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    let color = output::should_color(&global.color);
    let views: Vec<EntityView> = entities(coordinator, snapshot)
        .iter()
        .map(EntityView::from)
        .collect();

    output::render_list(
        &global.output,
        &views,
        |v| EntityRow {
            device: v.device.clone(),
            name: v.name.clone(),
            state: output::paint_state(&v.state, color),
            unique_id: v.unique_id.clone(),
        },
        |v| format!("{}\t{}", v.unique_id, v.state),
    )
}

fn status_line(coordinator: &Coordinator) -> String {
    let status = coordinator.status();
    let when = status
        .last_refresh
        .map_or_else(
            || "never".into(),
            |t| t.with_timezone(&Local).format("%H:%M:%S").to_string(),
        );
    match status.last_error {
        Some(err) if !status.last_update_success => {
            format!("last refresh failed: {err} (last good {when})")
        }
        _ => format!("refreshed at {when}"),
    }
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator.start().await?;

    let mut snapshots = coordinator.subscribe();
    let mut statuses = coordinator.subscribe_status();
    let first = render(coordinator, &coordinator.snapshot(), global)?;
    output::print_output(&first, global.quiet);

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                tracing::info!("interrupted, stopping");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                print_update(coordinator, &snapshot, global)?;
            }
            changed = statuses.changed() => {
                if changed.is_err() {
                    break;
                }
                // Successful refreshes are printed from the snapshot channel.
                let failed = !statuses.borrow_and_update().last_update_success;
                if failed {
                    print_update(coordinator, &coordinator.snapshot(), global)?;
                }
            }
        }
    }
    Ok(())
}

fn print_update(
    coordinator: &Coordinator,
    snapshot: &Snapshot,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = render(coordinator, snapshot, global)?;
    if !global.quiet {
        eprintln!("── {} ──", status_line(coordinator));
    }
    output::print_output(&out, global.quiet);
    Ok(())
}
