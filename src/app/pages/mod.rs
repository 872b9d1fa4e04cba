pub mod root;

// Chat page uses WASM-only features (fetch streaming, clipboard, file reading)
#[cfg(target_arch = "wasm32")]
pub mod chat;

#[cfg(target_arch = "wasm32")]
pub use chat::ChatPage;

pub use root::App;
