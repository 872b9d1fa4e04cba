// Infrastructure layer (server-only adapters)
// Provider client and session file store

pub mod provider;
pub mod storage;
