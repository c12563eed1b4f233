pub mod airline;
pub mod common;
pub mod flight;
pub mod flight_data;
pub mod passenger;

pub use airline::*;
pub use common::*;
pub use flight::*;
pub use flight_data::*;
pub use passenger::*;
