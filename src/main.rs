//! Gemini chat - main entry point
//!
//! Serves the Dioxus app together with the relay routes.
//! Uses dioxus::serve() pattern for dx serve compatibility.

use gemini_chat_relay::app::App;

// Server entry point - NO #[tokio::main], dioxus::serve() creates its own runtime
#[cfg(feature = "server")]
fn main() {
    use gemini_chat_relay::config::RelayConfig;
    use gemini_chat_relay::handlers::{RelayState, relay_router};

    // Initialize tracing BEFORE dioxus::serve
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Gemini chat...");

    dioxus::serve(|| async move {
        let router = dioxus::server::router(App);

        // Without a usable key the page still loads; relay calls will 404
        let state = RelayConfig::from_env()
            .map_err(|e| e.to_string())
            .and_then(|config| RelayState::from_config(&config).map_err(|e| e.to_string()));

        match state {
            Ok(state) => {
                tracing::info!("Relay routes enabled");
                Ok(router.merge(relay_router(state)))
            }
            Err(e) => {
                tracing::warn!("Relay disabled: {}", e);
                Ok(router)
            }
        }
    });
}

// WASM entry point (browser) - no server feature
#[cfg(all(not(feature = "server"), target_arch = "wasm32"))]
fn main() {
    web_sys::console::log_1(&"[WASM] Gemini chat - WASM initialized!".into());
    dioxus::launch(App);
}

// Native client (desktop) - no server feature, not WASM
#[cfg(all(not(feature = "server"), not(target_arch = "wasm32")))]
fn main() {
    dioxus::launch(App);
}
