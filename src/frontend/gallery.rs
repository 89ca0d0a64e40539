use super::overlay::PreviewOverlay;
use crate::{
    card::{placeholder_image, CardController},
    catalog::{Catalog, GalleryTimings, Project},
    gallery::{GalleryController, SwipeTracker},
    overlay::OverlayController,
    scheduler::BrowserScheduler,
    viewport::Viewport,
};
use std::rc::Rc;
use web_sys::HtmlElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct MockupCardProps {
    pub project: Project,
    pub is_active: bool,
    pub timings: GalleryTimings,
    #[prop_or_default]
    pub on_hover: Callback<Project>,
    #[prop_or_default]
    pub on_leave: Callback<()>,
    #[prop_or_default]
    pub on_click: Callback<Project>,
}

#[function_component(MockupCard)]
pub fn mockup_card(props: &MockupCardProps) -> Html {
    let viewport = use_context::<Viewport>().unwrap_or_default();
    let redraw = use_force_update();
    let screen_ref = use_node_ref();
    let image_count = props.project.image_count();

    let card = {
        let timings = props.timings;
        use_memo((), move |_| {
            CardController::new(
                BrowserScheduler,
                image_count,
                timings,
                Rc::new(move || redraw.force_update()),
            )
        })
    };

    {
        let card = card.clone();
        use_effect_with((props.project.id.clone(), image_count), move |(_, count)| {
            card.set_project(*count);
            || ()
        });
    }
    {
        let card = card.clone();
        use_effect_with(props.is_active, move |active| {
            card.set_active(*active);
            || ()
        });
    }
    {
        let card = card.clone();
        use_effect_with((), move |_| move || card.teardown());
    }

    let state = card.state();

    {
        let screen_ref = screen_ref.clone();
        use_effect_with(state.scroll_reveal_progress, move |progress| {
            if let Some(screen) = screen_ref.cast::<HtmlElement>() {
                let extent = (screen.scroll_height() - screen.client_height()).max(0);
                screen.set_scroll_top((f64::from(extent) * progress / 100.0).round() as i32);
            }
            || ()
        });
    }

    let is_mobile = viewport.is_mobile();
    let onmouseenter = {
        let card = card.clone();
        let project = props.project.clone();
        let on_hover = props.on_hover.clone();
        Callback::from(move |_: MouseEvent| {
            if is_mobile {
                return;
            }
            card.pointer_enter();
            on_hover.emit(project.clone());
        })
    };
    let onmouseleave = {
        let card = card.clone();
        let on_leave = props.on_leave.clone();
        Callback::from(move |_: MouseEvent| {
            if is_mobile {
                return;
            }
            card.pointer_leave();
            on_leave.emit(());
        })
    };
    let activate = {
        let card = card.clone();
        let project = props.project.clone();
        let on_click = props.on_click.clone();
        Rc::new(move || {
            card.activate();
            on_click.emit(project.clone());
            // Nothing opens for a project without a preview url.
            if !project.has_preview() {
                card.resume();
            }
        })
    };
    let onclick = {
        let activate = activate.clone();
        Callback::from(move |_: MouseEvent| activate())
    };
    let onkeydown = Callback::from(move |event: KeyboardEvent| {
        if event.key() == "Enter" || event.key() == " " {
            event.prevent_default();
            activate();
        }
    });
    let onerror = {
        let card = card.clone();
        Callback::from(move |_: Event| card.image_failed())
    };

    let project = &props.project;
    let src = if state.image_failed {
        placeholder_image(&project.title)
    } else {
        project
            .images
            .get(state.current_image_index)
            .cloned()
            .unwrap_or_else(|| placeholder_image(&project.title))
    };

    let indicators = card.show_indicators().then(|| {
        html! {
            <div class="mockup-indicators">
                { for (0..image_count).map(|index| {
                    let card = card.clone();
                    let onclick = Callback::from(move |event: MouseEvent| {
                        event.stop_propagation();
                        card.select_image(index);
                    });
                    html! {
                        <button
                            type="button"
                            class={classes!(
                                "mockup-dot",
                                (index == state.current_image_index).then_some("is-active"),
                            )}
                            aria-label={format!("Zrzut ekranu {}", index + 1)}
                            {onclick}
                        />
                    }
                }) }
            </div>
        }
    });

    html! {
        <article
            class={classes!(
                "mockup-card",
                props.is_active.then_some("is-active"),
                state.is_hovered.then_some("is-hovered"),
            )}
            role="button"
            tabindex="0"
            aria-label={format!("Podgląd realizacji {}", project.title)}
            {onmouseenter}
            {onmouseleave}
            {onclick}
            {onkeydown}
        >
            <div class="mockup-browser-bar" aria-hidden="true">
                <span></span><span></span><span></span>
            </div>
            <div class="mockup-screen" ref={screen_ref}>
                <img src={src} alt={project.title.clone()} loading="lazy" {onerror} />
            </div>
            <div class="mockup-caption">
                <p class="mockup-category">{project.category.clone()}</p>
                <h3>{project.title.clone()}</h3>
                if let Some(description) = project.description.clone() {
                    <p class="muted">{description}</p>
                }
            </div>
            {indicators.unwrap_or_default()}
        </article>
    }
}

#[derive(Properties, PartialEq)]
pub struct MockupGalleryProps {
    pub catalog: Rc<Catalog>,
    #[prop_or_default]
    pub on_modal_change: Callback<bool>,
}

#[function_component(MockupGallery)]
pub fn mockup_gallery(props: &MockupGalleryProps) -> Html {
    let viewport = use_context::<Viewport>().unwrap_or_default();
    let redraw = use_force_update();
    let swipe = use_mut_ref(SwipeTracker::default);
    let timings = props.catalog.timings;
    let project_count = props.catalog.len();

    let overlay = {
        let redraw = redraw.clone();
        use_memo((), move |_| {
            OverlayController::new(
                BrowserScheduler,
                timings.overlay_linger_ms,
                Rc::new(move || redraw.force_update()),
            )
        })
    };
    let gallery = {
        let on_modal_change = props.on_modal_change.clone();
        use_memo(project_count, move |count| {
            GalleryController::new(
                BrowserScheduler,
                *count,
                timings,
                Rc::new(move || redraw.force_update()),
                Rc::new(move |open| on_modal_change.emit(open)),
            )
        })
    };

    {
        let gallery = gallery.clone();
        let overlay = overlay.clone();
        use_effect_with((), move |_| {
            move || {
                gallery.teardown();
                overlay.teardown();
            }
        });
    }

    let state = gallery.state();
    let Some(project) = props.catalog.get(state.active_project_index).cloned() else {
        return html! {};
    };
    let card_key = project.id.clone();

    let on_hover = {
        let gallery = gallery.clone();
        let index = state.active_project_index;
        Callback::from(move |_: Project| gallery.hover(index))
    };
    let on_leave = {
        let gallery = gallery.clone();
        Callback::from(move |_: ()| gallery.leave())
    };
    let on_click = {
        let gallery = gallery.clone();
        let overlay = overlay.clone();
        Callback::from(move |project: Project| {
            if let Err(error) = gallery.open_preview(&project, &overlay) {
                log::warn!("{error}");
            }
        })
    };
    let on_close = {
        let gallery = gallery.clone();
        let overlay = overlay.clone();
        Callback::from(move |_: ()| gallery.close_preview(&overlay))
    };
    let on_frame_load = {
        let overlay = overlay.clone();
        Callback::from(move |_: ()| overlay.frame_loaded())
    };

    let ontouchstart = {
        let swipe = swipe.clone();
        Callback::from(move |event: TouchEvent| {
            if let Some(touch) = event.touches().get(0) {
                swipe.borrow_mut().begin(
                    f64::from(touch.client_x()),
                    f64::from(touch.client_y()),
                    event.time_stamp(),
                );
            }
        })
    };
    let ontouchend = {
        let swipe = swipe.clone();
        let gallery = gallery.clone();
        Callback::from(move |event: TouchEvent| {
            let Some(touch) = event.changed_touches().get(0) else {
                swipe.borrow_mut().cancel();
                return;
            };
            let direction = swipe.borrow_mut().finish(
                f64::from(touch.client_x()),
                f64::from(touch.client_y()),
                event.time_stamp(),
                &timings,
            );
            if let Some(direction) = direction {
                gallery.swipe(direction);
            }
        })
    };
    let ontouchcancel = {
        let swipe = swipe.clone();
        Callback::from(move |_: TouchEvent| swipe.borrow_mut().cancel())
    };

    let dots = (0..project_count).map(|index| {
        let gallery = gallery.clone();
        let title = props
            .catalog
            .get(index)
            .map(|project| project.title.clone())
            .unwrap_or_default();
        let onclick = Callback::from(move |_: MouseEvent| {
            gallery.select(index);
        });
        let selected = index == state.active_project_index;
        html! {
            <button
                type="button"
                role="tab"
                class={classes!("gallery-dot", selected.then_some("is-active"))}
                aria-selected={selected.to_string()}
                aria-label={title}
                {onclick}
            />
        }
    });

    html! {
        <>
            <section
                class={classes!("mockup-gallery", viewport.is_mobile().then_some("is-mobile"))}
                aria-roledescription="karuzela"
                aria-label="Nasze realizacje"
                {ontouchstart}
                {ontouchend}
                {ontouchcancel}
            >
                <MockupCard
                    key={card_key}
                    project={project}
                    is_active={!state.preview_open}
                    timings={timings}
                    {on_hover}
                    {on_leave}
                    {on_click}
                />
                if project_count > 1 {
                    <div class="gallery-dots" role="tablist">
                        { for dots }
                    </div>
                }
            </section>
            // Kept outside the section so its touches never reach the swipe handlers.
            <PreviewOverlay state={overlay.state()} {on_close} {on_frame_load} />
        </>
    }
}
