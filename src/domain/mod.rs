// Domain layer
// Pure Rust types shared by the browser and the relay

pub mod models;
