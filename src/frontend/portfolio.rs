use super::overlay::PreviewOverlay;
use crate::{
    card::placeholder_image,
    catalog::{Catalog, Project},
    overlay::OverlayController,
    scheduler::BrowserScheduler,
    scroll_contain::{normalize_wheel_delta, ScrollContainment, ScrollMetrics, WheelOutcome},
};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, AddEventListenerOptions, HtmlElement, ResizeObserver, WheelEvent};
use yew::prelude::*;

fn measure(element: &HtmlElement) -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: f64::from(element.scroll_top()),
        scroll_height: f64::from(element.scroll_height()),
        client_height: f64::from(element.client_height()),
    }
}

fn schedule_flush(state: Rc<RefCell<ScrollContainment>>, element: HtmlElement) {
    let Some(win) = window() else {
        return;
    };

    let fallback = state.clone();
    let flush = Closure::once_into_js(move || {
        if let Some(offset) = state.borrow_mut().flush_frame() {
            element.set_scroll_top(offset.round() as i32);
        }
    });
    if win.request_animation_frame(flush.unchecked_ref()).is_err() {
        // Drops the batch rather than leaving the frame flag stuck.
        fallback.borrow_mut().flush_frame();
    }
}

/// Listeners and observer attached to one screenshot region; detached on drop.
struct ContainmentBinding {
    element: HtmlElement,
    observer: Option<ResizeObserver>,
    _on_resize: Closure<dyn FnMut(JsValue)>,
    on_wheel: Closure<dyn FnMut(WheelEvent)>,
    on_scroll: Closure<dyn FnMut(Event)>,
}

impl ContainmentBinding {
    fn attach(element: HtmlElement) -> Self {
        let state = Rc::new(RefCell::new(ScrollContainment::new(measure(&element))));

        let on_resize = {
            let state = state.clone();
            let element = element.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |_entries: JsValue| {
                let metrics = measure(&element);
                state
                    .borrow_mut()
                    .resize(metrics.scroll_height, metrics.client_height);
            })
        };
        let on_wheel = {
            let state = state.clone();
            let element = element.clone();
            Closure::<dyn FnMut(WheelEvent)>::new(move |event: WheelEvent| {
                let delta = normalize_wheel_delta(
                    event.delta_y(),
                    event.delta_mode(),
                    f64::from(element.client_height()),
                );
                let outcome = state.borrow_mut().on_wheel(delta);
                if let WheelOutcome::Intercept { request_frame } = outcome {
                    event.prevent_default();
                    event.stop_propagation();
                    if request_frame {
                        schedule_flush(state.clone(), element.clone());
                    }
                }
            })
        };
        let on_scroll = {
            let element = element.clone();
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                state.borrow_mut().sync_offset(f64::from(element.scroll_top()));
            })
        };

        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref()).ok();
        match observer.as_ref() {
            Some(observer) => {
                observer.observe(&element);
                // The screenshot's height changes when it finishes loading.
                if let Some(image) = element.first_element_child() {
                    observer.observe(&image);
                }
            }
            None => log::debug!("ResizeObserver unavailable, scroll extents cached once"),
        }

        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        if element
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                on_wheel.as_ref().unchecked_ref(),
                &options,
            )
            .is_err()
        {
            log::warn!("wheel containment unavailable");
        }
        let _ = element
            .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());

        Self {
            element,
            observer,
            _on_resize: on_resize,
            on_wheel,
            on_scroll,
        }
    }
}

impl Drop for ContainmentBinding {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        let _ = self
            .element
            .remove_event_listener_with_callback("wheel", self.on_wheel.as_ref().unchecked_ref());
        let _ = self
            .element
            .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
    }
}

#[hook]
pub fn use_scroll_containment(target: NodeRef) {
    use_effect_with(target, |target| {
        let binding = target.cast::<HtmlElement>().map(ContainmentBinding::attach);
        move || drop(binding)
    });
}

#[derive(Properties, PartialEq)]
pub struct PortfolioTileProps {
    pub project: Project,
    #[prop_or_default]
    pub on_open: Callback<Project>,
}

#[function_component(PortfolioTile)]
pub fn portfolio_tile(props: &PortfolioTileProps) -> Html {
    let screen_ref = use_node_ref();
    let image_failed = use_state_eq(|| false);
    use_scroll_containment(screen_ref.clone());

    let project = &props.project;
    let src = match project.images.first() {
        Some(image) if !*image_failed => image.clone(),
        _ => placeholder_image(&project.title),
    };
    let onerror = {
        let image_failed = image_failed.clone();
        Callback::from(move |_: Event| image_failed.set(true))
    };
    let onclick = {
        let on_open = props.on_open.clone();
        let project = project.clone();
        Callback::from(move |_: MouseEvent| on_open.emit(project.clone()))
    };

    html! {
        <article class="portfolio-tile">
            <div class="tile-screen" ref={screen_ref}>
                <img
                    src={src}
                    alt={format!("Zrzut ekranu strony {}", project.title)}
                    loading="lazy"
                    {onerror}
                />
            </div>
            <div class="tile-copy">
                <p class="tile-category">{project.category.clone()}</p>
                <h3>{project.title.clone()}</h3>
                if let Some(description) = project.description.clone() {
                    <p class="muted">{description}</p>
                }
                if project.has_preview() {
                    <button class="tile-preview" type="button" {onclick}>
                        {"Podgląd na żywo"}
                    </button>
                }
            </div>
        </article>
    }
}

#[derive(Properties, PartialEq)]
pub struct PortfolioPageProps {
    pub catalog: Rc<Catalog>,
    #[prop_or_default]
    pub on_modal_change: Callback<bool>,
}

#[function_component(PortfolioPage)]
pub fn portfolio_page(props: &PortfolioPageProps) -> Html {
    let redraw = use_force_update();
    let linger_ms = props.catalog.timings.overlay_linger_ms;
    let overlay = use_memo((), move |_| {
        OverlayController::new(BrowserScheduler, linger_ms, Rc::new(move || redraw.force_update()))
    });

    {
        let overlay = overlay.clone();
        let on_modal_change = props.on_modal_change.clone();
        use_effect_with((), move |_| {
            move || {
                if overlay.state().is_open {
                    on_modal_change.emit(false);
                }
                overlay.teardown();
            }
        });
    }

    let on_open = {
        let overlay = overlay.clone();
        let on_modal_change = props.on_modal_change.clone();
        Callback::from(move |project: Project| match overlay.open(project) {
            Ok(()) => on_modal_change.emit(true),
            Err(error) => log::warn!("{error}"),
        })
    };
    let on_close = {
        let overlay = overlay.clone();
        let on_modal_change = props.on_modal_change.clone();
        Callback::from(move |_: ()| {
            if overlay.state().is_open {
                overlay.close();
                on_modal_change.emit(false);
            }
        })
    };
    let on_frame_load = {
        let overlay = overlay.clone();
        Callback::from(move |_: ()| overlay.frame_loaded())
    };

    html! {
        <section class="portfolio-page" aria-labelledby="portfolio-heading">
            <h1 id="portfolio-heading">{"Portfolio"}</h1>
            <p class="lead">
                {"Strony, które zaprojektowaliśmy i wdrożyliśmy dla lokalnych firm. "}
                {"Przewiń zrzut ekranu, aby zobaczyć całą stronę."}
            </p>
            <div class="portfolio-grid">
                { for props.catalog.projects.iter().map(|project| html! {
                    <PortfolioTile
                        key={project.id.clone()}
                        project={project.clone()}
                        on_open={on_open.clone()}
                    />
                }) }
            </div>
            <PreviewOverlay state={overlay.state()} {on_close} {on_frame_load} />
        </section>
    }
}
