//! Widget root component and the bundle's mount entry.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bundle installs its console hooks on start. The loader's
//! `initChatbot` then calls `mount_page` once the container exists; pages
//! that load the bundle directly call `mountChatbot` instead, which creates
//! the container with the default config when it is missing.

use leptos::prelude::*;

use crate::components::chat_widget::ChatWidget;
use crate::config::ChatbotConfig;
use crate::state::session::SessionState;

/// Root component. `on_send` runs one send cycle for the current draft.
#[component]
pub fn ChatbotApp(config: ChatbotConfig, session: RwSignal<SessionState>, on_send: Callback<()>) -> impl IntoView {
    let site_id = config.site_id.clone();
    view! {
        <div class="chatbot" data-site-id=site_id>
            <ChatWidget config session on_send/>
        </div>
    }
}

/// Runs once when the bundle is instantiated: panic hook and console logger.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::debug_warn!("console logger already set: {e}");
    }
}

/// Mount without the loader, for pages that import the bundle directly.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = mountChatbot)]
pub fn mount_chatbot() {
    let mounted = crate::loader::document().and_then(|document| mount_page(&document));
    if let Err(e) = mounted {
        leptos::logging::warn!("chatbot mount skipped: {e}");
    }
}

/// Mount the widget into the loader's container, creating it if missing.
///
/// # Errors
///
/// Returns [`crate::loader::LoaderError`] when the container cannot be
/// created or is not an HTML element.
#[cfg(feature = "csr")]
pub(crate) fn mount_page(document: &web_sys::Document) -> Result<(), crate::loader::LoaderError> {
    use std::rc::Rc;

    use wasm_bindgen::JsCast;

    use crate::config::ApiConfig;
    use crate::loader::{CONFIG_ATTRIBUTE, CONTAINER_ID, LoaderError, MOUNTED_ATTRIBUTE};
    use crate::net::api::HttpChatBackend;
    use crate::state::controller::SessionController;
    use crate::util::storage::{BrowserStorage, KeyValueStore, MemoryStorage};

    let container = match document.get_element_by_id(CONTAINER_ID) {
        Some(el) => el,
        None => {
            let el = document.create_element("div")?;
            el.set_id(CONTAINER_ID);
            document.body().ok_or(LoaderError::MissingDom("body"))?.append_child(&el)?;
            el
        }
    };
    if container.has_attribute(MOUNTED_ATTRIBUTE) {
        log::debug!("chatbot already mounted");
        return Ok(());
    }
    container.set_attribute(MOUNTED_ATTRIBUTE, "true")?;

    let config = read_container_config(container.get_attribute(CONFIG_ATTRIBUTE).as_deref());
    let store: Box<dyn KeyValueStore> = match BrowserStorage::local() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            leptos::logging::warn!("{e}; chat history will not survive a reload");
            Box::new(MemoryStorage::new())
        }
    };
    let backend = HttpChatBackend::new(&ApiConfig::from_build_env());
    log::debug!("chatbot for site {} talking to {}", config.site_id, backend.endpoint());
    let controller = Rc::new(SessionController::new(config.site_id.clone(), backend, store));

    let parent = container
        .dyn_into::<web_sys::HtmlElement>()
        .map_err(|_| LoaderError::Dom("container is not an HTML element".to_owned()))?;

    leptos::mount::mount_to(parent, move || {
        let session = RwSignal::new(controller.mount());
        let controller = StoredValue::new_local(controller);
        let on_send = Callback::new(move |()| {
            let controller = controller.get_value();
            leptos::task::spawn_local(async move {
                controller.send(&session).await;
            });
        });
        view! { <ChatbotApp config session on_send/> }
    })
    .forget();
    Ok(())
}

/// Config stored by the loader, or the defaults when the bundle was loaded
/// without it.
#[cfg(feature = "csr")]
fn read_container_config(raw: Option<&str>) -> ChatbotConfig {
    match crate::loader::resolve_config(raw) {
        Ok(config) => config,
        Err(e) => {
            leptos::logging::warn!("{e}; using default chatbot config");
            ChatbotConfig::default()
        }
    }
}
