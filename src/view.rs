pub mod eta_panel;
pub mod location_panel;
pub mod stop_popup;

pub use eta_panel::*;
pub use location_panel::*;
pub use stop_popup::*;
