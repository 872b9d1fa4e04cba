//! HTTP relay between the browser and the generative provider

pub mod error;
pub mod files;
pub mod form;
pub mod generate;
pub mod router;
pub mod state;
pub mod upload;

pub use error::ApiError;
pub use files::{delete_file_handler, list_files_handler};
pub use generate::{generate_handler, generate_multimodal_handler};
pub use router::{health_handler, relay_router};
pub use state::RelayState;
pub use upload::upload_file_handler;
