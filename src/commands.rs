//! What each subcommand prints
use std::io::Write;

use anyhow::Result;
use itertools::Itertools;
use tokio::select;
use tracing::{error, info};

use crate::{
    cli::Command,
    config::Config,
    context::AppContext,
    model::Direction,
    services::{lookup_arrival, lookup_arrivals, stop_eta, LocationSource},
    view::{render_arrival, render_bus_details, stop_label, NO_STOPS_TEXT, STOPS_FAILED_TEXT},
};

pub const ETA_UNAVAILABLE_TEXT: &str = "ETA no disponible.";

pub async fn run(command: Command, config: Config) -> Result<()> {
    let mut ctx = AppContext::new(config)?;

    match command {
        Command::Watch { hide_eta, .. } => return watch(ctx, hide_eta).await,
        Command::Buses { bus } => println!("{}", buses(&ctx, bus).await),
        Command::Stops {
            direction,
            arrivals,
            geojson,
        } => {
            println!("{}", stops(&mut ctx, direction, arrivals).await);
            if let Some(path) = geojson {
                ctx.map.write_geojson(&path)?;
            }
        }
        Command::Stop { id, eta } => println!("{}", stop(&ctx, id, eta).await?),
        Command::Route {
            lat,
            lng,
            direction,
            switch_to,
            geojson,
            collapsed,
        } => {
            let source = LocationSource::from_args(lat, lng);
            println!(
                "{}",
                route(&mut ctx, &source, direction, switch_to, collapsed).await
            );
            if let Some(path) = geojson {
                ctx.map.write_geojson(&path)?;
            }
        }
    }

    Ok(())
}

async fn watch(mut ctx: AppContext, hide_eta: bool) -> Result<()> {
    if hide_eta {
        ctx.eta().set_visible(false);
    }

    let timezone = ctx.config.timezone;
    let mut updates = ctx.start_eta_refresh();
    redraw(&updates.borrow_and_update().render(timezone))?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let panel = updates.borrow_and_update().clone();
                redraw(&panel.render(timezone))?;
            }
            res = &mut ctrl_c => {
                res?;
                info!("Ctrl-C received");
                break;
            }
        }
    }

    ctx.shutdown();
    Ok(())
}

fn redraw(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "\x1B[2J\x1B[H{text}")?;
    stdout.flush()?;
    Ok(())
}

/// One manual refresh, then the whole panel or the details of a single bus
async fn buses(ctx: &AppContext, bus_id: Option<i64>) -> String {
    ctx.eta().refresh().await;
    let panel = ctx.eta().panel();

    match bus_id {
        None => panel.render(ctx.config.timezone),
        Some(id) => match panel.bus(id) {
            Some(bus) => render_bus_details(bus),
            None => format!("El bus {id} no está activo."),
        },
    }
}

/// Places the stop markers and lists them, with the approaching bus of each one if `arrivals`
async fn stops(ctx: &mut AppContext, direction: Option<Direction>, arrivals: bool) -> String {
    let stops = match ctx.load_stop_markers(direction).await {
        Ok(stops) => stops,
        Err(e) => {
            error!("{:?}", anyhow::Error::from(e).context("error loading stop markers"));
            return STOPS_FAILED_TEXT.to_string();
        }
    };

    if stops.is_empty() {
        return NO_STOPS_TEXT.to_string();
    }

    if arrivals {
        lookup_arrivals(&ctx.backend, &stops)
            .await
            .into_iter()
            .map(|(stop, arrival)| {
                format!("{}\n{}\n", stop_label(stop), render_arrival(&arrival))
            })
            .join("\n")
    } else {
        stops
            .iter()
            .map(|stop| format!("{} ({})", stop_label(stop), stop.direction))
            .join("\n")
    }
}

async fn stop(ctx: &AppContext, stop_id: i64, eta: bool) -> Result<String> {
    let mut out = render_arrival(&lookup_arrival(&ctx.backend, stop_id).await);

    if eta {
        out.push('\n');
        match stop_eta(&ctx.backend, stop_id).await {
            Some(payload) => out.push_str(&serde_json::to_string_pretty(&payload)?),
            None => out.push_str(ETA_UNAVAILABLE_TEXT),
        }
    }

    Ok(out)
}

async fn route(
    ctx: &mut AppContext,
    source: &LocationSource,
    direction: Direction,
    switch_to: Option<Direction>,
    collapsed: bool,
) -> String {
    ctx.location_panel.set_direction(direction);
    ctx.share_location(source).await;
    if let Some(direction) = switch_to {
        ctx.change_direction(direction).await;
    }

    if collapsed {
        ctx.location_panel.hide();
    }

    ctx.location_panel.render()
}
