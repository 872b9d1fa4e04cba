use dioxus::document;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::app::pages::ChatPage;

// Stub ChatPage for server-side rendering; the real page hydrates in the browser
#[cfg(not(target_arch = "wasm32"))]
#[component]
fn ChatPage() -> Element {
    rsx! {
        div { class: "chat-page-placeholder",
            div { class: "loading-spinner", "✨" }
            p { "Loading chat interface..." }
        }
    }
}

#[component]
pub fn App() -> Element {
    // Use asset!() macro to ensure CSS is bundled and served correctly
    const BUNDLE_CSS: Asset = asset!("/assets/dist/bundle.css");

    use_effect(|| {
        tracing::info!("Gemini chat app initialized");
    });

    rsx! {
        document::Title { "Gemini Chat" }
        document::Link { rel: "stylesheet", href: BUNDLE_CSS }
        div { class: "c-layout",
            header { class: "c-navbar",
                span { class: "c-navbar__logo", "✨ Gemini Chat" }
            }
            main { class: "c-layout__main",
                ChatPage {}
            }
        }
    }
}
