use crate::model::{Stop, StopArrival};

pub fn stop_label(stop: &Stop) -> String {
    format!("Paradero {}: {}", stop.order, stop.name)
}

pub fn render_arrival(arrival: &StopArrival) -> String {
    match arrival {
        StopArrival::Approaching {
            bus_name, minutes, ..
        } => format!("🚌 Bus más cercano: {bus_name}\n🕒 Tiempo estimado: {minutes} min"),
        StopArrival::Unavailable { message } => message.clone(),
    }
}
