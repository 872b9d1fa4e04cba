//! Chat input: prompt, temperature, attachment controls

use dioxus::prelude::*;

use crate::shared::services::AttachmentMode;

#[cfg(target_arch = "wasm32")]
use js_sys::eval as js_eval;

/// Id of the hidden `<input type="file">` read by the page
pub const FILE_INPUT_ID: &str = "file-input";

/// Id of the prompt textarea, also the paste target
pub const PROMPT_INPUT_ID: &str = "chat-input";

#[component]
pub fn ChatInput(
    input: Signal<String>,
    temperature: Signal<f32>,
    mode: Signal<AttachmentMode>,
    is_loading: Signal<bool>,
    on_submit: EventHandler<()>,
    on_file_change: EventHandler<()>,
    on_mode_change: EventHandler<AttachmentMode>,
    on_clear: EventHandler<()>,
) -> Element {
    let mut is_composing = use_signal(|| false);

    // Refocus the prompt once a reply is done
    use_effect(move || {
        if !*is_loading.read() {
            #[cfg(target_arch = "wasm32")]
            {
                let script = format!(
                    "setTimeout(() => {{ const el = document.getElementById('{}'); if (el) el.focus(); }}, 100);",
                    PROMPT_INPUT_ID
                );
                let _ = js_eval(&script);
            }
        }
    });

    // Enter sends, Shift+Enter inserts a newline
    let handle_keypress = move |evt: Event<KeyboardData>| {
        if evt.key() == Key::Enter
            && !evt.modifiers().contains(Modifiers::SHIFT)
            && !*is_composing.read()
        {
            evt.prevent_default();
            if !*is_loading.read() {
                on_submit.call(());
            }
        }
    };

    let placeholder = if *is_loading.read() {
        "Generating..."
    } else {
        "Ask anything... (Enter to send, Shift+Enter for new line)"
    };
    let has_content = !input().trim().is_empty();
    let temperature_label = format!("{:.1}", temperature());
    let inline = mode() == AttachmentMode::Inline;

    rsx! {
        div {
            id: "chat-input-container",
            class: "chat-input",

            textarea {
                id: PROMPT_INPUT_ID,
                class: "chat-input__textarea",
                value: "{input}",
                placeholder: "{placeholder}",
                disabled: *is_loading.read(),
                rows: "2",
                oninput: move |evt| input.set(evt.value()),
                onkeypress: handle_keypress,
                oncompositionstart: move |_| is_composing.set(true),
                oncompositionend: move |_| is_composing.set(false),
            }

            div { class: "chat-input__actions-row",
                div { class: "chat-input__left-actions",
                    label { class: "btn btn--ghost", r#for: FILE_INPUT_ID, title: "Attach a file", "📎" }
                    input {
                        id: FILE_INPUT_ID,
                        r#type: "file",
                        class: "u-hidden",
                        accept: "image/*,audio/*,.pdf,.txt,.md,.csv,.json",
                        onchange: move |_| on_file_change.call(()),
                    }

                    label { class: "chat-input__toggle", title: "Send the file inline with the prompt",
                        input {
                            r#type: "checkbox",
                            checked: inline,
                            onchange: move |evt| {
                                let next = if evt.checked() { AttachmentMode::Inline } else { AttachmentMode::Upload };
                                on_mode_change.call(next);
                            },
                        }
                        span { "Inline" }
                    }

                    label { class: "chat-input__temperature",
                        span { "Temperature {temperature_label}" }
                        input {
                            r#type: "range",
                            min: "0",
                            max: "2",
                            step: "0.1",
                            value: "{temperature}",
                            oninput: move |evt| {
                                if let Ok(value) = evt.value().parse::<f32>() {
                                    temperature.set(value);
                                }
                            },
                        }
                    }
                }

                div { class: "chat-input__right-actions",
                    button {
                        class: "btn btn--ghost",
                        disabled: *is_loading.read(),
                        title: "Clear chat",
                        onclick: move |_| on_clear.call(()),
                        "Clear"
                    }
                    button {
                        class: "btn btn--send btn--icon-only",
                        disabled: !has_content || *is_loading.read(),
                        onclick: move |_| on_submit.call(()),
                        if *is_loading.read() {
                            span { class: "btn__spinner", "..." }
                        } else {
                            span { class: "btn__icon", "➤" }
                        }
                    }
                }
            }
        }
    }
}
