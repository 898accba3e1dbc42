use anyhow::{Context, Result};
use maplet_markers::{
    prelude::*,
    runtime::{self, MapHandle},
    AdapterOp,
};
use std::collections::BTreeMap;
use tokio::sync::mpsc::UnboundedReceiver;

const USAGE: &str = "usage: markers-app <markers.json> [options.json]";

/// Replays a marker list against a headless map and reports what the map
/// engine would have been asked to do
#[tokio::main]
async fn main() -> Result<()> {
    maplet_markers::init_logging();

    let mut args = std::env::args().skip(1);
    let markers_path = args.next().context(USAGE)?;
    let markers = load_markers(&markers_path)?;
    let options = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading options from {}", path))?;
            MarkerMapOptions::from_json_str(&json).context("parsing options")?
        }
        None => MarkerMapOptions::default(),
    };
    let timeout = options.view.transition_deadline() + options.view.debounce() * 2;

    let center = markers
        .first()
        .map(MarkerDescriptor::position)
        .unwrap_or_default();
    let adapter = HeadlessAdapter::new(center, 10.0, (1200.0, 800.0));
    let map = MarkerMap::with_options(adapter, options);
    let (handle, mut events, task) = runtime::spawn(map);

    handle.set_markers(markers.clone())?;
    println!("loaded {} markers from {}", markers.len(), markers_path);

    handle.set_target(ViewportTarget {
        center,
        zoom: 13.0,
    })?;
    report_next_event(&mut events, timeout).await?;

    if let Some(first) = markers.first() {
        hover_and_click(&handle, &first.id)?;
        report_next_event(&mut events, timeout).await?;
    }

    drop(handle);
    let mut map = task.await.context("map driver panicked")?;
    log::info!("driver stopped with {} markers rendered", map.store().len());
    print_summary(&mut map);
    Ok(())
}

fn load_markers(path: &str) -> Result<Vec<MarkerDescriptor>> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("reading markers from {}", path))?;
    serde_json::from_str(&json).with_context(|| format!("parsing markers from {}", path))
}

fn hover_and_click(handle: &MapHandle, id: &MarkerId) -> Result<()> {
    handle.interact(MarkerInteraction::HoverEnter(id.clone()))?;
    handle.interact(MarkerInteraction::Click(id.clone()))?;
    Ok(())
}

async fn report_next_event(
    events: &mut UnboundedReceiver<ViewEvent>,
    timeout: Duration,
) -> Result<()> {
    let event = tokio::time::timeout(timeout, events.recv())
        .await
        .context("timed out waiting for a view event")?
        .context("map driver stopped")?;

    match event {
        ViewEvent::ViewportChanged(snapshot) => println!(
            "viewport changed: center ({:.4}, {:.4}) zoom {} bounds {:?}",
            snapshot.center.lat, snapshot.center.lng, snapshot.zoom, snapshot.bounds
        ),
        ViewEvent::MarkerClicked(marker) => println!(
            "marker clicked: {} ({})",
            marker.id,
            marker.name.as_deref().unwrap_or(&marker.page_title)
        ),
    }
    Ok(())
}

fn print_summary(map: &mut MarkerMap<HeadlessAdapter>) {
    let mut ops: BTreeMap<&str, usize> = BTreeMap::new();
    for op in map.adapter_mut().take_ops() {
        let kind = match op {
            AdapterOp::Create { .. } => "create",
            AdapterOp::SetPosition { .. } => "move",
            AdapterOp::SetIcon { .. } => "restyle",
            AdapterOp::Attach { .. } => "attach",
            AdapterOp::Detach { .. } => "detach",
            AdapterOp::AnimateView { .. } => "fly-to",
            AdapterOp::InvalidateSize => "invalidate-size",
        };
        *ops.entry(kind).or_default() += 1;
    }

    println!("engine calls:");
    for (kind, count) in &ops {
        println!("  {:<16} {}", kind, count);
    }

    println!("live engine objects: {}", map.adapter().object_count());
    println!("rendered markers:");
    let mut rendered: Vec<_> = map.store().iter().collect();
    rendered.sort_by(|a, b| b.pane.z_index().cmp(&a.pane.z_index()).then(a.id().cmp(b.id())));
    for marker in rendered {
        println!(
            "  {:<10} {:<16} {:<9} {}",
            marker.id().to_string(),
            marker.pane.name(),
            marker.tier.to_string(),
            marker.icon.label.as_deref().unwrap_or("-")
        );
    }
}
