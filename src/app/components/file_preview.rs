//! Pending attachment shown above the input

use dioxus::prelude::*;

use crate::shared::state::Attachment;

#[component]
pub fn FilePreview(attachment: Attachment, on_remove: EventHandler<()>) -> Element {
    let (name, detail) = match &attachment {
        Attachment::Image { name, .. } => (name.clone(), None),
        Attachment::Card { name, size, mime_type } => {
            (name.clone(), Some(format!("{} · {}", size, mime_type)))
        }
    };

    rsx! {
        div { class: "file-preview",
            if let Attachment::Image { data_url, name } = &attachment {
                img { class: "file-preview__thumb", src: "{data_url}", alt: "{name}" }
            } else {
                span { class: "file-preview__icon", "📄" }
            }
            div { class: "file-preview__meta",
                span { class: "file-preview__name", "{name}" }
                if let Some(detail) = detail {
                    span { class: "file-preview__detail", "{detail}" }
                }
            }
            button {
                class: "file-preview__remove",
                title: "Remove file",
                onclick: move |_| on_remove.call(()),
                "✕"
            }
        }
    }
}
