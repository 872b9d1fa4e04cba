// Client services
// Chat session plus the HTTP transports it runs on

pub mod chat_session;
pub mod transport;

#[cfg(target_arch = "wasm32")]
pub mod fetch_transport;

#[cfg(not(target_arch = "wasm32"))]
pub mod http_transport;

pub use chat_session::{AttachmentMode, ChatSession};
pub use transport::{ChatTransport, MultimodalRequest};

#[cfg(target_arch = "wasm32")]
pub use fetch_transport::FetchTransport;

#[cfg(not(target_arch = "wasm32"))]
pub use http_transport::HttpTransport;
