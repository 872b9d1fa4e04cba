// Session state kept by the relay

pub mod file_store;

pub use file_store::{FileStore, InMemoryFileStore};
