#[cfg(any(target_arch = "wasm32", test))]
mod render_plan;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use helpdesk_client_core::{AppState, ApiClient, ClientConfig, HelpdeskApp};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use crate::render_plan::{RenderMarks, RenderPlan};
    use crate::wasm_constants::*;

    mod dom;
    mod events;
    mod logging;
    mod network;
    mod storage;

    use dom::*;
    use events::install_event_handlers;
    use network::GlooTransport;
    use storage::LocalStorageSessionStore;

    type WebApp = HelpdeskApp<GlooTransport, LocalStorageSessionStore>;

    thread_local! {
        static APP: RefCell<Option<Rc<WebApp>>> = const { RefCell::new(None) };
        static LAST_RENDER: Cell<Option<RenderMarks>> = const { Cell::new(None) };
        static EVENT_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        logging::init();
        if let Err(error) = mount() {
            tracing::error!(%error, "helpdesk shell failed to start");
        }
    }

    /// Current state as a debug string, for poking at from the devtools console.
    #[wasm_bindgen]
    pub fn app_state_debug() -> String {
        current_app().map_or_else(String::new, |app| format!("{:#?}", app.state()))
    }

    fn mount() -> Result<(), String> {
        let config = resolve_config()?;
        tracing::info!(base_url = %config.base_url, "starting helpdesk shell");

        mount_shell_markup()?;

        let client = ApiClient::new(&config, GlooTransport::new(), LocalStorageSessionStore);
        let app = Rc::new(HelpdeskApp::new(client));
        app.subscribe(render_state);
        APP.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&app)));

        install_event_handlers()?;
        render_state(&app.state());

        spawn_local(async move {
            app.boot().await;
        });
        Ok(())
    }

    /// A `<meta name="helpdesk-api-base-url">` tag wins; otherwise the API is
    /// served under the page origin.
    fn resolve_config() -> Result<ClientConfig, String> {
        let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
        let configured = window
            .document()
            .and_then(|document| {
                document
                    .query_selector(&format!("meta[name=\"{API_BASE_URL_META_NAME}\"]"))
                    .ok()
                    .flatten()
            })
            .and_then(|meta| meta.get_attribute("content"))
            .filter(|value| !value.trim().is_empty());
        let config = match configured {
            Some(base_url) => ClientConfig::new(&base_url),
            None => {
                let origin = window
                    .location()
                    .origin()
                    .map_err(|_| "page origin is unavailable".to_string())?;
                ClientConfig::for_origin(&origin)
            }
        };
        config.map_err(|error| format!("invalid api base url: {error}"))
    }

    fn current_app() -> Option<Rc<WebApp>> {
        APP.with(|slot| slot.borrow().clone())
    }

    /// Runs `task` against the app on the browser's microtask queue.
    fn spawn_with_app<F, Fut>(task: F)
    where
        F: FnOnce(Rc<WebApp>) -> Fut + 'static,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        let Some(app) = current_app() else {
            tracing::warn!("event fired before the app was mounted");
            return;
        };
        spawn_local(task(app));
    }

    fn render_state(state: &AppState) {
        let previous = LAST_RENDER.with(Cell::get);
        let plan = RenderPlan::between(previous, state);
        if let Err(error) = apply_render_plan(plan) {
            tracing::warn!(%error, "failed to update the page");
        }
        LAST_RENDER.with(|slot| slot.set(Some(RenderMarks::of(state))));
    }
}
