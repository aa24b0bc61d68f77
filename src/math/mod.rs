pub mod path;
pub mod rotation;

pub use rotation::{normalize, rotate_around, rotation_matrix};
