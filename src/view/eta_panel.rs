//! The "Información de Buses" panel
use std::fmt::Write;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::model::Bus;

pub const LOADING_TEXT: &str = "Cargando información...";
pub const NO_BUSES_TEXT: &str = "No hay buses activos en este momento";
pub const FETCH_ERROR_TEXT: &str = "Error al cargar información de buses";

#[derive(Clone, Debug, PartialEq)]
pub enum EtaContent {
    Loading,
    Buses(Vec<Bus>),
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EtaPanel {
    pub content: EtaContent,
    pub visible: bool,
    /// Sequence number of the poll currently shown. 0 before the first one.
    pub shown_sequence: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for EtaPanel {
    fn default() -> Self {
        EtaPanel {
            content: EtaContent::Loading,
            visible: true,
            shown_sequence: 0,
            updated_at: None,
        }
    }
}

impl EtaPanel {
    /// Shows the result of poll number `sequence`.
    ///
    /// Polls can finish out of order. A result older than the one already shown is dropped
    /// and false is returned.
    pub fn apply<E>(&mut self, sequence: u64, result: Result<Vec<Bus>, E>) -> bool {
        if sequence < self.shown_sequence {
            return false;
        }

        self.content = match result {
            Ok(buses) => EtaContent::Buses(buses),
            Err(_) => EtaContent::Error(FETCH_ERROR_TEXT.to_string()),
        };
        self.shown_sequence = sequence;
        self.updated_at = Some(Utc::now());

        true
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn bus(&self, bus_id: i64) -> Option<&Bus> {
        match &self.content {
            EtaContent::Buses(buses) => buses.iter().find(|b| b.id == bus_id),
            _ => None,
        }
    }

    pub fn render(&self, timezone: Tz) -> String {
        if !self.visible {
            return "[🚌]".to_string();
        }

        let mut out = String::from("🚌 Información de Buses\n");

        match &self.content {
            EtaContent::Loading => {
                out.push_str(LOADING_TEXT);
                out.push('\n');
            }
            EtaContent::Error(message) => {
                _ = writeln!(out, "❌ {message}");
            }
            EtaContent::Buses(buses) if buses.is_empty() => {
                out.push_str(NO_BUSES_TEXT);
                out.push('\n');
            }
            EtaContent::Buses(buses) => {
                for bus in buses {
                    out.push_str(&render_bus_item(bus));
                }
            }
        }

        if let Some(updated_at) = self.updated_at {
            _ = writeln!(
                out,
                "Actualizado: {}",
                updated_at.with_timezone(&timezone).format("%H:%M:%S")
            );
        }

        out
    }
}

fn render_bus_item(bus: &Bus) -> String {
    let mut out = String::new();

    _ = write!(out, "{}", bus.name);
    if let Some(direction) = bus.direction {
        match &bus.direction_icon {
            Some(icon) => {
                _ = write!(out, "  {icon} {direction}");
            }
            None => {
                _ = write!(out, "  {direction}");
            }
        }
    }
    out.push('\n');

    _ = writeln!(out, "  🛣️ {}", bus.route.as_deref().unwrap_or_default());
    _ = writeln!(out, "  {}", next_stop_line(bus));

    out
}

fn next_stop_line(bus: &Bus) -> String {
    match &bus.next_stop {
        Some(next) => format!("📍 Próximo: {}", next.name),
        None => "Sin próximo paradero".to_string(),
    }
}

/// What clicking a bus in the panel shows
pub fn render_bus_details(bus: &Bus) -> String {
    format!("Bus: {}\n{}", bus.name, next_stop_line(bus))
}
