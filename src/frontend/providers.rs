use crate::{
    scroll::{BrowserScroll, ScrollHandle, ScrollOptions, ScrollTarget},
    viewport::Viewport,
};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::window;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ProviderProps {
    pub children: Html,
}

fn current_viewport() -> Viewport {
    let Some(win) = window() else {
        return Viewport::default();
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::NAN);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::NAN);

    Viewport::new(width, height)
}

/// The one resize listener on the page.
#[function_component(ViewportProvider)]
pub fn viewport_provider(props: &ProviderProps) -> Html {
    let viewport = use_state_eq(current_viewport);

    {
        let viewport = viewport.clone();
        use_effect_with((), move |_| {
            let listener = Closure::<dyn FnMut()>::new(move || viewport.set(current_viewport()));
            let win = window();

            if let Some(win) = win.as_ref() {
                if win
                    .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
                    .is_err()
                {
                    log::warn!("resize listener unavailable, layout fixed at first render");
                }
            }

            move || {
                if let Some(win) = win {
                    let _ = win.remove_event_listener_with_callback(
                        "resize",
                        listener.as_ref().unchecked_ref(),
                    );
                }
                drop(listener);
            }
        });
    }

    html! {
        <ContextProvider<Viewport> context={*viewport}>
            {props.children.clone()}
        </ContextProvider<Viewport>>
    }
}

#[function_component(ScrollProvider)]
pub fn scroll_provider(props: &ProviderProps) -> Html {
    let handle = use_memo((), |_| ScrollHandle::new(Rc::new(BrowserScroll)));

    html! {
        <ContextProvider<ScrollHandle> context={(*handle).clone()}>
            {props.children.clone()}
        </ContextProvider<ScrollHandle>>
    }
}

/// Jumps to the top of the page whenever the route changes.
#[function_component(ScrollRestoration)]
pub fn scroll_restoration() -> Html {
    let location = use_location();
    let scroll = use_context::<ScrollHandle>();
    let path = location
        .map(|location| location.path().to_string())
        .unwrap_or_default();

    use_effect_with(path, move |_| {
        if let Some(scroll) = scroll {
            scroll.scroll_to(ScrollTarget::Top, ScrollOptions::instant());
        }
        || ()
    });

    html! {}
}
