use dioxus::prelude::*;

use crate::shared::hooks::ToastState;

/// Current toast, hidden again after `TOAST_DURATION_MS`
#[component]
pub fn ToastView(state: ToastState) -> Element {
    let current = state.current.read().clone();
    let kind_class = current.as_ref().map(|toast| toast.kind.class()).unwrap_or_default();

    #[cfg(target_arch = "wasm32")]
    {
        let mut state = state;
        use_effect(move || {
            if let Some(toast) = state.current.read().clone() {
                spawn(async move {
                    gloo_timers::future::TimeoutFuture::new(crate::shared::hooks::TOAST_DURATION_MS).await;
                    state.dismiss(toast.id);
                });
            }
        });
    }

    rsx! {
        if let Some(toast) = current {
            div { class: "toast {kind_class}", role: "status", "{toast.text}" }
        }
    }
}
