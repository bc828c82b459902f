//! The "Mi Ubicación y Ruta" panel
use std::fmt::Write;

use crate::model::{Direction, UserLocation};

pub const STOPS_FAILED_TEXT: &str = "Error al cargar paraderos.";
pub const NO_STOPS_TEXT: &str = "No se encontraron paraderos.";

#[derive(Clone, Debug, PartialEq)]
pub enum LocationStatus {
    NotShared,
    Locating,
    Shared(UserLocation),
    Unsupported,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteInfo {
    Empty,
    Searching,
    StopsFailed,
    NoStops,
    NoNearestStop,
    Found {
        stop_name: String,
        /// Straight line meters to the stop
        distance: f64,
        walking: WalkingInfo,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum WalkingInfo {
    Drawn {
        /// Meters along the streets
        distance: f64,
        /// Seconds
        duration: f64,
    },
    NotFound,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocationPanel {
    pub direction: Direction,
    pub status: LocationStatus,
    pub route_info: RouteInfo,
    pub visible: bool,
}

impl Default for LocationPanel {
    fn default() -> Self {
        LocationPanel {
            direction: Direction::Outbound,
            status: LocationStatus::NotShared,
            route_info: RouteInfo::Empty,
            visible: true,
        }
    }
}

impl LocationPanel {
    pub fn location(&self) -> Option<UserLocation> {
        match self.status {
            LocationStatus::Shared(location) => Some(location),
            _ => None,
        }
    }

    /// Returns true when the route has to be searched again for the new direction
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let changed = self.direction != direction;
        self.direction = direction;

        changed && self.location().is_some()
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn render(&self) -> String {
        if !self.visible {
            return "[📍]".to_string();
        }

        let mut out = String::from("📍 Mi Ubicación y Ruta\n");

        for direction in [Direction::Outbound, Direction::Return] {
            let mark = if direction == self.direction { "(•)" } else { "( )" };
            _ = write!(out, "{mark} {} ", direction_label(direction));
        }
        out.push('\n');

        _ = writeln!(out, "{}", status_text(&self.status));

        for line in route_info_lines(&self.route_info) {
            _ = writeln!(out, "{line}");
        }

        out
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Outbound => "Ida (U → Dante Nava)",
        Direction::Return => "Vuelta (Dante Nava → U)",
    }
}

fn status_text(status: &LocationStatus) -> String {
    match status {
        LocationStatus::NotShared => "Ubicación no compartida".to_string(),
        LocationStatus::Locating => "Obteniendo ubicación...".to_string(),
        LocationStatus::Shared(location) => {
            format!("Ubicación compartida: {}", location.position)
        }
        LocationStatus::Unsupported => "Geolocalización no soportada".to_string(),
        LocationStatus::Failed => "No se pudo obtener la ubicación".to_string(),
    }
}

fn route_info_lines(info: &RouteInfo) -> Vec<String> {
    match info {
        RouteInfo::Empty => vec![],
        RouteInfo::Searching => vec!["Buscando paradero más cercano...".to_string()],
        RouteInfo::StopsFailed => vec![STOPS_FAILED_TEXT.to_string()],
        RouteInfo::NoStops => vec![NO_STOPS_TEXT.to_string()],
        RouteInfo::NoNearestStop => vec!["No se encontró paradero cercano.".to_string()],
        RouteInfo::Found {
            stop_name,
            distance,
            walking,
        } => {
            let found = format!("Paradero más cercano: {stop_name} ({distance:.0} m)");
            let walking = match walking {
                WalkingInfo::Drawn { distance, duration } => format!(
                    "Ruta caminando: {distance:.0} m, ~{} min",
                    (duration / 60.0).ceil().max(1.0)
                ),
                WalkingInfo::NotFound => "No se pudo calcular la ruta caminando.".to_string(),
                WalkingInfo::Failed => "Error al consultar OSRM.".to_string(),
            };

            vec![found, walking]
        }
    }
}
