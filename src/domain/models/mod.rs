// Domain models (business entities)
// Pure Rust, no framework dependencies

pub mod message;
pub mod file;
pub mod generation;

pub use message::{Role, Turn};
pub use file::*;
pub use generation::*;
