pub mod error;
pub mod resolve;
pub mod tracker;
pub mod validate;

pub use error::*;
pub use resolve::{find_existing, find_or_create, CopyFields, Lookup, Resolved};
pub use tracker::*;
pub use validate::*;
