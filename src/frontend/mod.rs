mod gallery;
mod overlay;
mod portfolio;
mod providers;

use crate::{
    catalog::Catalog,
    consent::{persist_consent, read_stored_consent, ConsentChoice},
    scroll::{ScrollHandle, ScrollOptions, ScrollTarget, NAV_OFFSET_PX},
};
use gallery::MockupGallery;
use portfolio::PortfolioPage;
use providers::{ScrollProvider, ScrollRestoration, ViewportProvider};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlScriptElement};
use yew::prelude::*;
use yew_router::prelude::*;

const ANALYTICS_ID: Option<&str> = option_env!("STALOWE_ANALYTICS_ID");
const ANALYTICS_SCRIPT_ID: &str = "analytics-gtag";

#[derive(Clone, Routable, PartialEq)]
enum Route {
    #[at("/")]
    Home,
    #[at("/portfolio")]
    Portfolio,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Injects the analytics tag once, and only after consent.
fn load_analytics() {
    let Some(measurement_id) = ANALYTICS_ID else {
        log::debug!("no analytics id configured");
        return;
    };
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };
    if document.get_element_by_id(ANALYTICS_SCRIPT_ID).is_some() {
        return;
    }
    let Some(head) = document.head() else {
        return;
    };

    let loader = document
        .create_element("script")
        .ok()
        .and_then(|element| element.dyn_into::<HtmlScriptElement>().ok());
    let bootstrap = document
        .create_element("script")
        .ok()
        .and_then(|element| element.dyn_into::<HtmlScriptElement>().ok());
    let (Some(loader), Some(bootstrap)) = (loader, bootstrap) else {
        log::warn!("could not create analytics script");
        return;
    };

    loader.set_id(ANALYTICS_SCRIPT_ID);
    loader.set_async(true);
    loader.set_src(&format!("https://www.googletagmanager.com/gtag/js?id={measurement_id}"));
    let _ = bootstrap.set_text(&format!(
        concat!(
            "window.dataLayer=window.dataLayer||[];",
            "function gtag(){{dataLayer.push(arguments);}}",
            "gtag('js',new Date());gtag('config','{0}');",
        ),
        measurement_id
    ));

    if head.append_child(&loader).is_err() || head.append_child(&bootstrap).is_err() {
        log::warn!("could not attach analytics script");
        return;
    }
    log::info!("analytics enabled");
}

#[derive(Properties, PartialEq)]
struct SiteNavProps {
    hidden: bool,
}

#[function_component(SiteNav)]
fn site_nav(props: &SiteNavProps) -> Html {
    html! {
        <header
            class={classes!("site-nav", props.hidden.then_some("is-hidden"))}
            aria-hidden={props.hidden.to_string()}
        >
            <Link<Route> classes="brand" to={Route::Home}>{"Stalowe Witryny"}</Link<Route>>
            <nav aria-label="Główna nawigacja">
                <Link<Route> to={Route::Home}>{"Start"}</Link<Route>>
                <Link<Route> to={Route::Portfolio}>{"Portfolio"}</Link<Route>>
            </nav>
        </header>
    }
}

#[function_component(SiteFooter)]
fn site_footer() -> Html {
    let scroll = use_context::<ScrollHandle>();
    let on_top = Callback::from(move |_: MouseEvent| {
        if let Some(scroll) = scroll.as_ref() {
            scroll.to_top();
        }
    });

    html! {
        <footer class="site-footer">
            <p class="muted">{"© Stalowe Witryny. Strony internetowe dla małych firm."}</p>
            <button class="back-to-top" type="button" onclick={on_top}>
                {"Do góry"}
                <span aria-hidden="true">{" ↑"}</span>
            </button>
        </footer>
    }
}

#[derive(Properties, PartialEq)]
struct CookieBannerProps {
    on_choice: Callback<ConsentChoice>,
}

#[function_component(CookieBanner)]
fn cookie_banner(props: &CookieBannerProps) -> Html {
    let accept = {
        let on_choice = props.on_choice.clone();
        Callback::from(move |_: MouseEvent| on_choice.emit(ConsentChoice::Accepted))
    };
    let reject = {
        let on_choice = props.on_choice.clone();
        Callback::from(move |_: MouseEvent| on_choice.emit(ConsentChoice::Rejected))
    };

    html! {
        <aside class="cookie-banner" role="region" aria-label="Zgoda na pliki cookie">
            <p>
                {"Używamy plików cookie do anonimowych statystyk odwiedzin. "}
                {"Możesz się na to zgodzić lub odmówić."}
            </p>
            <div class="cookie-actions">
                <button type="button" class="button-secondary" onclick={reject}>
                    {"Odrzuć"}
                </button>
                <button type="button" class="button-primary" onclick={accept}>
                    {"Akceptuję"}
                </button>
            </div>
        </aside>
    }
}

#[derive(Properties, PartialEq)]
struct HomePageProps {
    catalog: Rc<Catalog>,
    on_modal_change: Callback<bool>,
}

#[function_component(HomePage)]
fn home_page(props: &HomePageProps) -> Html {
    let scroll = use_context::<ScrollHandle>();
    let to_gallery = Callback::from(move |_: MouseEvent| {
        if let Some(scroll) = scroll.as_ref() {
            scroll.scroll_to(
                ScrollTarget::Element("realizacje".to_string()),
                ScrollOptions::smooth().with_offset(NAV_OFFSET_PX),
            );
        }
    });

    html! {
        <>
            <section class="hero" aria-labelledby="hero-heading">
                <h1 id="hero-heading">{"Strony internetowe, które pracują na Twoją firmę"}</h1>
                <p class="lead">
                    {"Projektujemy szybkie, czytelne witryny dla lokalnych usługodawców. "}
                    {"Zobacz, jak wyglądają nasze realizacje."}
                </p>
                <button class="button-primary" type="button" onclick={to_gallery}>
                    {"Zobacz realizacje"}
                </button>
            </section>
            <section id="realizacje" class="section-block" aria-labelledby="gallery-heading">
                <h2 id="gallery-heading">{"Realizacje"}</h2>
                <MockupGallery
                    catalog={props.catalog.clone()}
                    on_modal_change={props.on_modal_change.clone()}
                />
                <Link<Route> classes="section-link" to={Route::Portfolio}>
                    {"Wszystkie projekty →"}
                </Link<Route>>
            </section>
        </>
    }
}

#[function_component(NotFoundPage)]
fn not_found_page() -> Html {
    html! {
        <section class="section-block not-found">
            <h1>{"Nie znaleziono strony"}</h1>
            <Link<Route> to={Route::Home}>{"Wróć na stronę główną"}</Link<Route>>
        </section>
    }
}

fn switch(route: Route, catalog: Rc<Catalog>, on_modal_change: Callback<bool>) -> Html {
    match route {
        Route::Home => html! { <HomePage {catalog} {on_modal_change} /> },
        Route::Portfolio => html! { <PortfolioPage {catalog} {on_modal_change} /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

#[function_component(App)]
fn app() -> Html {
    let catalog = use_memo((), |_| Catalog::embedded().map(Rc::new));
    let modal_open = use_state_eq(|| false);
    let consent = use_state_eq(read_stored_consent);

    use_effect_with(*consent, |consent| {
        if consent.is_some_and(ConsentChoice::allows_analytics) {
            load_analytics();
        }
        || ()
    });

    let on_modal_change = {
        let modal_open = modal_open.clone();
        Callback::from(move |open: bool| modal_open.set(open))
    };
    let on_consent = {
        let consent = consent.clone();
        Callback::from(move |choice: ConsentChoice| {
            persist_consent(choice);
            consent.set(Some(choice));
        })
    };

    let catalog = match &*catalog {
        Ok(catalog) => catalog.clone(),
        Err(error) => {
            log::error!("{error}");
            return html! {
                <main class="load-error">
                    <p>{"Nie udało się wczytać listy realizacji."}</p>
                </main>
            };
        }
    };

    let render = move |route: Route| switch(route, catalog.clone(), on_modal_change.clone());

    html! {
        <ViewportProvider>
            <ScrollProvider>
                <BrowserRouter>
                    <ScrollRestoration />
                    <a class="skip-link" href="#content">{"Przejdź do treści"}</a>
                    <SiteNav hidden={*modal_open} />
                    <main id="content" class="page-shell">
                        <Switch<Route> {render} />
                    </main>
                    <SiteFooter />
                    if consent.is_none() {
                        <CookieBanner on_choice={on_consent} />
                    }
                </BrowserRouter>
            </ScrollProvider>
        </ViewportProvider>
    }
}

pub fn run() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
    log::info!("starting showcase");

    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
