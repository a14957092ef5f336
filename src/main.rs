use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use wirekit::{init_logging, Config, ContainerConfig, LayoutKind, Wires, BUILD_DATE, VERSION};

/// Builds a small board, lays out a few cards on it and drags one of them.
fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("wirekit {} ({})", VERSION, BUILD_DATE);

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load_from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };
    config.validate()?;

    let mut wires = Wires::with_config(config);
    let board = wires.create_container(
        ContainerConfig::new()
            .with_id("board")
            .with_layout(LayoutKind::Flat {
                rows: 2,
                columns: 3,
            })
            .with_size(300.0, 200.0),
    )?;

    let mut cards = Vec::new();
    for i in 0..4 {
        let card = wires.create_shape(
            ContainerConfig::new().with_id(format!("card-{}", i)).interactive(true),
            80.0,
            40.0,
        )?;
        wires.add_at(board, card, None, None)?;
        cards.push(card);
    }
    wires.settle();

    for card in &cards {
        info!(
            "{} at {:?}",
            wires.uuid(*card)?.unwrap_or_default(),
            wires.location(*card)?
        );
    }

    let dragged = cards[0];
    wires.container(dragged)?.add_move_handler(|event| {
        info!("move {:?} -> {:?}", event.container(), event.location());
    })?;
    let group = wires.container(dragged)?.group();
    wires.begin_drag(group)?;
    for step in 1..=5 {
        wires.drag_to(group, step as f64 * 10.0, step as f64 * 5.0)?;
    }
    wires.end_drag(group)?;
    let passes = wires.settle();

    info!(
        "after drag: {:?} ({} settle passes)",
        wires.location(dragged)?,
        passes
    );
    Ok(())
}
