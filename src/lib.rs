pub mod classify;
pub mod error;
pub mod shape_structs;
pub mod table;

pub use error::{Result, ShapeError};
