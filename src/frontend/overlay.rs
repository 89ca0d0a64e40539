use crate::overlay::{OverlayPhase, OverlayState};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, KeyboardEvent};
use yew::prelude::*;

const FRAME_SANDBOX: &str = "allow-scripts allow-same-origin allow-forms allow-popups";

#[derive(Properties, PartialEq)]
pub struct PreviewOverlayProps {
    pub state: OverlayState,
    pub on_close: Callback<()>,
    pub on_frame_load: Callback<()>,
}

/// Renders nothing without a project; during the closing phase it keeps
/// showing the outgoing project while the exit transition runs.
#[function_component(PreviewOverlay)]
pub fn preview_overlay(props: &PreviewOverlayProps) -> Html {
    let is_open = props.state.is_open;

    {
        let on_close = props.on_close.clone();
        use_effect_with(is_open, move |is_open| {
            let listener = is_open.then(|| {
                Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                    if event.key() == "Escape" {
                        on_close.emit(());
                    }
                })
            });
            let document = window().and_then(|w| w.document());

            if let (Some(document), Some(listener)) = (document.as_ref(), listener.as_ref()) {
                let _ = document
                    .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
            }

            move || {
                if let (Some(document), Some(listener)) = (document, listener) {
                    let _ = document.remove_event_listener_with_callback(
                        "keydown",
                        listener.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    let Some(project) = props.state.target_project.clone() else {
        return html! {};
    };

    let on_backdrop = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let on_close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_close.emit(());
        })
    };
    let keep_open = Callback::from(|event: MouseEvent| event.stop_propagation());
    let on_load = {
        let on_frame_load = props.on_frame_load.clone();
        Callback::from(move |_: Event| on_frame_load.emit(()))
    };

    let closing = props.state.phase() == OverlayPhase::Closing;

    html! {
        <div
            class={classes!(
                "preview-overlay",
                is_open.then_some("is-open"),
                closing.then_some("is-closing"),
            )}
            role="dialog"
            aria-modal="true"
            aria-label={format!("Podgląd strony {}", project.title)}
            onclick={on_backdrop}
        >
            <div class="preview-panel" onclick={keep_open}>
                <header class="preview-header">
                    <div class="preview-heading">
                        <p class="preview-category">{project.category.clone()}</p>
                        <h2>{project.title.clone()}</h2>
                    </div>
                    <a
                        class="preview-external"
                        href={project.url.clone()}
                        target="_blank"
                        rel="noopener noreferrer"
                    >
                        {"Otwórz w nowej karcie"}
                        <span class="external-mark" aria-hidden="true">{"↗"}</span>
                    </a>
                    <button
                        class="preview-close"
                        type="button"
                        aria-label="Zamknij podgląd"
                        onclick={on_close_button}
                    >
                        <span aria-hidden="true">{"×"}</span>
                    </button>
                </header>
                <div class="preview-frame-wrap">
                    if props.state.is_frame_loading {
                        <div class="preview-spinner" role="status">
                            <span class="sr-only">{"Ładowanie podglądu…"}</span>
                        </div>
                    }
                    if is_open {
                        <iframe
                            key={props.state.generation.to_string()}
                            class="preview-frame"
                            src={project.url.clone()}
                            title={project.title.clone()}
                            sandbox={FRAME_SANDBOX}
                            onload={on_load}
                        />
                    }
                </div>
            </div>
        </div>
    }
}
