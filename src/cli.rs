use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::Direction;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Live bus positions, stop arrivals and walking routes from the LizardTrip backend"
)]
pub struct Cli {
    /// Overrides BACKEND_URL
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Overrides ROUTING_URL
    #[arg(long, global = true)]
    pub routing_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Keep the bus panel up to date until Ctrl-C
    Watch {
        /// Overrides REFRESH_INTERVAL_SECS
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: Option<u64>,

        /// Start with the bus panel collapsed
        #[arg(long)]
        hide_eta: bool,
    },

    /// Fetch the active buses once
    Buses {
        /// Only show the details of this bus
        #[arg(long)]
        bus: Option<i64>,
    },

    /// List the stops shown on the map
    Stops {
        #[arg(long)]
        direction: Option<Direction>,

        /// Look up the nearest approaching bus for every stop
        #[arg(long)]
        arrivals: bool,

        /// Write the map layers as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },

    /// Nearest approaching bus for one stop
    Stop {
        id: i64,

        /// Also print the raw ETA payload of the stop
        #[arg(long)]
        eta: bool,
    },

    /// Walking route from a location to the nearest stop
    Route {
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        #[arg(long, default_value = "ida")]
        direction: Direction,

        /// Change direction after the first route, recomputing it
        #[arg(long)]
        switch_to: Option<Direction>,

        /// Write the map layers as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,

        /// Only print the collapsed panel
        #[arg(long)]
        collapsed: bool,
    },
}
