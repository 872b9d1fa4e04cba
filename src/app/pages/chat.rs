use dioxus::prelude::*;
use js_sys::eval as js_eval;
use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlInputElement;

use crate::app::components::{
    ChatInput, ChatMessages, FILE_INPUT_ID, FilePreview, PROMPT_INPUT_ID, ToastView,
};
use crate::domain::models::{PendingFile, infer_mime_type};
use crate::shared::hooks::{ChatState, use_chat_state};
use crate::shared::services::AttachmentMode;
use crate::shared::utils::pasted_image_name;

/// Copy a browser `File` into memory
async fn read_file(file: &web_sys::File, name: String) -> Result<PendingFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", name, e))?;
    let bytes = Uint8Array::new(&buffer).to_vec();

    let mime_type = match file.type_() {
        declared if !declared.is_empty() => declared,
        _ => infer_mime_type(&name).to_string(),
    };
    Ok(PendingFile::new(name, mime_type, bytes))
}

/// Take the file chosen in the hidden input, resetting it so the same file
/// can be picked again
fn take_selected_file() -> Option<web_sys::File> {
    let input: HtmlInputElement = web_sys::window()?
        .document()?
        .get_element_by_id(FILE_INPUT_ID)?
        .dyn_into()
        .ok()?;
    let file = input.files()?.get(0);
    input.set_value("");
    file
}

fn attach(mut state: ChatState, file: web_sys::File, name: String) {
    spawn_local(async move {
        match read_file(&file, name).await {
            Ok(pending) => state.select_file(pending),
            Err(e) => {
                tracing::error!("{}", e);
                state.toast.error(e);
            }
        }
    });
}

/// Setup the JavaScript bridge for pasted files
fn setup_paste_bridge(state: ChatState) {
    // Create callback for JS to call when a file is pasted into the prompt
    let callback = Closure::wrap(Box::new(move |file: JsValue| {
        match file.dyn_into::<web_sys::File>() {
            Ok(file) => attach(state.clone(), file, pasted_image_name()),
            Err(e) => tracing::warn!("Pasted item is not a file: {:?}", e),
        }
    }) as Box<dyn FnMut(JsValue)>);

    // Register callback with window
    if let Some(window) = web_sys::window() {
        let _ = js_sys::Reflect::set(
            &window,
            &JsValue::from_str("__onFilePasted"),
            callback.as_ref(),
        );
    }
    callback.forget(); // Keep closure alive

    // Listen on the textarea (with small delay for DOM to be ready)
    let script = format!(
        r#"
        setTimeout(function() {{
            var el = document.getElementById('{}');
            if (!el || el.__pasteBound) return;
            el.__pasteBound = true;
            el.addEventListener('paste', function(e) {{
                var items = (e.clipboardData && e.clipboardData.items) || [];
                for (var i = 0; i < items.length; i++) {{
                    if (items[i].kind !== 'file') continue;
                    var file = items[i].getAsFile();
                    if (file && window.__onFilePasted) {{
                        e.preventDefault();
                        window.__onFilePasted(file);
                    }}
                    break;
                }}
            }});
        }}, 100);
        "#,
        PROMPT_INPUT_ID
    );
    let _ = js_eval(&script);
}

#[component]
pub fn ChatPage() -> Element {
    let state = use_chat_state();

    // Paste bridge is installed once per page
    {
        let state = state.clone();
        use_hook(move || setup_paste_bridge(state));
    }

    let on_submit = {
        let state = state.clone();
        move |_: ()| {
            spawn(state.clone().submit());
        }
    };
    let on_copy = {
        let state = state.clone();
        move |id: usize| {
            spawn(state.clone().copy(id));
        }
    };
    let on_file_change = {
        let state = state.clone();
        move |_: ()| {
            if let Some(file) = take_selected_file() {
                let name = file.name();
                attach(state.clone(), file, name);
            }
        }
    };
    let on_mode_change = {
        let mut state = state.clone();
        move |mode: AttachmentMode| state.set_mode(mode)
    };
    let on_clear = {
        let mut state = state.clone();
        move |_: ()| state.clear()
    };
    let on_remove = {
        let mut state = state.clone();
        move |_: ()| state.remove_file()
    };

    let pending = state.pending.read().clone();

    rsx! {
        div { class: "chat-page",
            ChatMessages { transcript: state.transcript, on_copy }
            div { class: "chat-page__footer",
                ToastView { state: state.toast }
                if let Some(attachment) = pending {
                    FilePreview { attachment, on_remove }
                }
                ChatInput {
                    input: state.input,
                    temperature: state.temperature,
                    mode: state.mode,
                    is_loading: state.is_loading,
                    on_submit,
                    on_file_change,
                    on_mode_change,
                    on_clear,
                }
            }
        }
    }
}
