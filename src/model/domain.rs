use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::api_model::{ApiBus, ApiStop, StopInfoResponse};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// GeoJSON and OSRM order
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn from_lng_lat([lng, lat]: [f64; 2]) -> Self {
        Coordinate { lat, lng }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Which way along the route a stop or bus is travelling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// "ida": university towards Dante Nava
    #[serde(rename = "ida")]
    Outbound,
    /// "vuelta": Dante Nava back to the university
    #[serde(rename = "vuelta")]
    Return,
}

impl Direction {
    /// The tag the backend uses
    pub fn api_tag(self) -> &'static str {
        match self {
            Direction::Outbound => "ida",
            Direction::Return => "vuelta",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => f.write_str("Ida"),
            Direction::Return => f.write_str("Vuelta"),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown direction \"{0}\", expected \"ida\" or \"vuelta\"")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ida" | "outbound" => Ok(Direction::Outbound),
            "vuelta" | "return" => Ok(Direction::Return),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stop {
    pub id: i64,
    pub name: String,
    pub position: Coordinate,
    pub direction: Direction,
    /// Position along the route for its direction
    pub order: i32,
}

impl TryFrom<ApiStop> for Stop {
    type Error = ParseDirectionError;

    fn try_from(value: ApiStop) -> Result<Self, Self::Error> {
        Ok(Stop {
            id: value.id,
            direction: value.orientacion.parse()?,
            name: value.nombre,
            position: Coordinate::new(value.lat, value.lng),
            order: value.orden,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NextStop {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bus {
    pub id: i64,
    pub name: String,
    pub route: Option<String>,
    /// None when the backend couldn't tell which way the bus is going
    pub direction: Option<Direction>,
    pub direction_icon: Option<String>,
    pub next_stop: Option<NextStop>,
}

impl From<ApiBus> for Bus {
    fn from(value: ApiBus) -> Self {
        Bus {
            id: value.bus_id,
            name: value.nombre,
            route: value.ruta.filter(|r| !r.is_empty()),
            direction: value.orientacion.and_then(|o| o.parse().ok()),
            direction_icon: value.orientacion_icono.filter(|i| !i.is_empty()),
            next_stop: value.proximo_paradero.map(|p| NextStop { name: p.nombre }),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UserLocation {
    pub position: Coordinate,
    pub captured_at: DateTime<Utc>,
}

impl UserLocation {
    pub fn now(position: Coordinate) -> Self {
        UserLocation {
            position,
            captured_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WalkingRoute {
    pub path: Vec<Coordinate>,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
}

/// The nearest bus that hasn't passed a stop yet, as reported by the backend.
#[derive(Clone, Debug, PartialEq)]
pub enum StopArrival {
    Approaching {
        bus_name: String,
        minutes: i64,
        distance_m: Option<f64>,
    },
    Unavailable {
        message: String,
    },
}

impl From<StopInfoResponse> for StopArrival {
    fn from(value: StopInfoResponse) -> Self {
        match (value.success, value.bus) {
            (true, Some(bus)) => StopArrival::Approaching {
                bus_name: bus.nombre,
                minutes: value.tiempo_minutos.unwrap_or(0),
                distance_m: value.distancia_metros,
            },
            _ => StopArrival::Unavailable {
                message: value
                    .message
                    .unwrap_or_else(|| "No se pudo determinar un bus cercano.".to_string()),
            },
        }
    }
}
