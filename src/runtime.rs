//! Tokio driver for a [`MarkerMap`]
//!
//! [`MarkerMap`] never sleeps on its own; it is told the time and asked for
//! its next deadline. [`drive`] closes that loop on a tokio runtime: it feeds
//! commands in as they arrive, wakes up for due timers, and forwards every
//! outgoing [`ViewEvent`] over a channel.

use crate::{
    core::{map::MarkerMap, viewport::ViewportTarget},
    input::events::{MapEvent, MarkerInteraction, ViewEvent},
    layers::marker::MarkerDescriptor,
    prelude::Instant,
    traits::MapAdapter,
    MapError, Result,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Inputs accepted by a driven map
#[derive(Debug, Clone)]
pub enum MapCommand {
    SetMarkers(Vec<MarkerDescriptor>),
    SetTarget(ViewportTarget),
    Interaction(MarkerInteraction),
    MapEvent(MapEvent),
    InvalidateSize,
}

/// Cloneable sending side of a spawned driver
#[derive(Debug, Clone)]
pub struct MapHandle {
    commands: UnboundedSender<MapCommand>,
}

impl MapHandle {
    pub fn send(&self, command: MapCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| MapError::DriverStopped)
    }

    pub fn set_markers(&self, markers: Vec<MarkerDescriptor>) -> Result<()> {
        self.send(MapCommand::SetMarkers(markers))
    }

    pub fn set_target(&self, target: ViewportTarget) -> Result<()> {
        self.send(MapCommand::SetTarget(target))
    }

    pub fn interact(&self, interaction: MarkerInteraction) -> Result<()> {
        self.send(MapCommand::Interaction(interaction))
    }

    pub fn map_event(&self, event: MapEvent) -> Result<()> {
        self.send(MapCommand::MapEvent(event))
    }

    pub fn invalidate_size(&self) -> Result<()> {
        self.send(MapCommand::InvalidateSize)
    }
}

/// Spawns [`drive`] on the current runtime.
///
/// The task ends once every [`MapHandle`] is dropped and hands the map back
/// through its join handle.
pub fn spawn<A>(
    map: MarkerMap<A>,
) -> (
    MapHandle,
    UnboundedReceiver<ViewEvent>,
    JoinHandle<MarkerMap<A>>,
)
where
    A: MapAdapter + Send + 'static,
    A::Handle: Send + 'static,
{
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(drive(map, command_rx, event_tx));
    (
        MapHandle {
            commands: command_tx,
        },
        event_rx,
        task,
    )
}

/// Runs `map` until the command channel closes, then returns it
pub async fn drive<A: MapAdapter>(
    mut map: MarkerMap<A>,
    mut commands: UnboundedReceiver<MapCommand>,
    events: UnboundedSender<ViewEvent>,
) -> MarkerMap<A> {
    log::debug!("marker map driver started");

    loop {
        let deadline = map.next_deadline();
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                if let Err(e) = apply_command(&mut map, command, now()) {
                    log::warn!("map command rejected: {}", e);
                }
            }
            _ = sleep_until(deadline) => {
                if let Err(e) = map.update(now()) {
                    log::warn!("map update failed: {}", e);
                }
            }
        }

        for event in map.process_events() {
            if events.send(event).is_err() {
                log::trace!("view event dropped, no receiver");
            }
        }
    }

    log::debug!("marker map driver stopped");
    map
}

fn apply_command<A: MapAdapter>(
    map: &mut MarkerMap<A>,
    command: MapCommand,
    now: Instant,
) -> Result<()> {
    match command {
        MapCommand::SetMarkers(markers) => map.set_markers(markers),
        MapCommand::SetTarget(target) => map.set_target(target, now),
        MapCommand::Interaction(interaction) => map.handle_interaction(interaction),
        MapCommand::MapEvent(event) => map.handle_map_event(event, now),
        MapCommand::InvalidateSize => {
            map.invalidate_size(now);
            Ok(())
        }
    }
}

// Read through tokio so a paused test clock is honored
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}
