pub mod api_model;
pub mod domain;

pub use domain::*;
