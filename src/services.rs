pub mod eta_refresh;
pub mod geolocation;
pub mod nearest_stop;
pub mod stop_markers;
pub mod walking_route;

pub use eta_refresh::*;
pub use geolocation::*;
pub use nearest_stop::*;
pub use stop_markers::*;
pub use walking_route::*;
