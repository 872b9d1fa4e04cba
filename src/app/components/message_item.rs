//! Message rendering component
//!
//! Displays one transcript entry. AI replies carry pre-rendered markdown.

use dioxus::prelude::*;

use crate::shared::state::{Attachment, EntryKind, TranscriptEntry};

/// Renders a single transcript entry
#[component]
pub fn MessageItem(entry: TranscriptEntry, on_copy: EventHandler<usize>) -> Element {
    let id = entry.id;
    let html = entry.html.clone();

    match entry.kind {
        EntryKind::User => rsx! {
            li { class: "c-chat-message c-chat-message--user animate-fade-in",
                span { class: "c-avatar c-avatar--user", "You" }
                div { class: "c-chat-bubble c-chat-bubble--user",
                    if let Some(attachment) = entry.attachment.clone() {
                        AttachmentView { attachment }
                    }
                    div { class: "c-chat-bubble__content",
                        div { class: "u-whitespace-pre-wrap", {entry.text.clone()} }
                    }
                }
            }
        },
        EntryKind::Ai => rsx! {
            li { class: "c-chat-message c-chat-message--assistant animate-fade-in",
                span { class: "c-avatar c-avatar--ai", "AI" }
                div { class: "c-chat-bubble c-chat-bubble--assistant",
                    if entry.is_waiting() {
                        div { class: "c-typing",
                            span { class: "c-typing__dot" }
                            span { class: "c-typing__dot" }
                            span { class: "c-typing__dot" }
                        }
                    } else {
                        div { class: "c-chat-bubble__content",
                            div {
                                class: "c-prose c-prose--sm",
                                dangerous_inner_html: "{html}"
                            }
                        }
                    }
                    if !entry.streaming && !entry.text.is_empty() {
                        button {
                            class: "c-chat-bubble__copy",
                            title: "Copy",
                            onclick: move |_| on_copy.call(id),
                            "Copy"
                        }
                    }
                }
            }
        },
    }
}

#[component]
fn AttachmentView(attachment: Attachment) -> Element {
    match attachment {
        Attachment::Image { name, data_url } => rsx! {
            div { class: "c-chat-bubble__images",
                img { class: "c-chat-bubble__image", src: "{data_url}", alt: "{name}" }
            }
        },
        Attachment::Card { name, size, mime_type } => rsx! {
            div { class: "c-file-card",
                span { class: "c-file-card__icon", "📄" }
                div { class: "c-file-card__meta",
                    span { class: "c-file-card__name", "{name}" }
                    span { class: "c-file-card__details", "{size} · {mime_type}" }
                }
            }
        },
    }
}
