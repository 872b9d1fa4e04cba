// Custom Dioxus hooks
pub mod use_toast;

// Chat state drives the fetch transport (browser only)
#[cfg(target_arch = "wasm32")]
pub mod use_chat_state;

pub use use_toast::{TOAST_DURATION_MS, Toast, ToastKind, ToastState, use_toast};

#[cfg(target_arch = "wasm32")]
pub use use_chat_state::{ChatState, use_chat_state};
