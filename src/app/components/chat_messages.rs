use dioxus::prelude::*;

use crate::app::components::MessageItem;
use crate::shared::state::Transcript;

#[cfg(target_arch = "wasm32")]
use js_sys::eval as js_eval;

#[component]
pub fn ChatMessages(transcript: Signal<Transcript>, on_copy: EventHandler<usize>) -> Element {
    // Auto-scroll to bottom whenever the transcript changes
    use_effect(move || {
        let has_entries = !transcript.read().is_empty();
        if has_entries {
            #[cfg(target_arch = "wasm32")]
            {
                let script = r#"
                    setTimeout(() => {
                        const messagesEnd = document.getElementById('messages-end');
                        if (messagesEnd) {
                            messagesEnd.scrollIntoView({ behavior: 'smooth' });
                        }
                    }, 50);
                "#;
                let _ = js_eval(script);
            }
        }
    });

    rsx! {
        div { class: "chat-messages",
            if transcript.read().is_empty() {
                EmptyState {}
            } else {
                ul { class: "chat-messages__list",
                    for entry in transcript.read().entries().iter() {
                        MessageItem { key: "{entry.id}", entry: entry.clone(), on_copy }
                    }
                }
                div { id: "messages-end" }
            }
        }
    }
}

#[component]
fn EmptyState() -> Element {
    rsx! {
        div { class: "empty-state",
            div { class: "empty-state__icon", "✨" }
            h2 { class: "empty-state__title", "Ask anything or upload a file" }
            p { class: "empty-state__description",
                "Images, audio and documents can be attached or pasted"
            }
        }
    }
}
