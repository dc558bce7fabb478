//! Host-page loader: `initChatbot(config?)`.
//!
//! SYSTEM CONTEXT
//! ==============
//! A third-party page includes `public/widget.js` and calls
//! `window.initChatbot` once. That script imports the bundle
//! (`assets/index.js`) from its own directory and hands the config and its
//! own URL to `init_chatbot`, which stores the config on a container
//! element, links `assets/index.css` and mounts the widget.
//!
//! Calling `initChatbot` twice is harmless: initialization checks for the
//! container element instead of relying on a global flag.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

use crate::config::{ChatbotConfig, ConfigError};

pub const CONTAINER_ID: &str = "chatbot-container";
pub const CONFIG_ATTRIBUTE: &str = "data-chatbot-config";
pub const MOUNTED_ATTRIBUTE: &str = "data-chatbot-mounted";
pub const STYLESHEET_PATH: &str = "assets/index.css";
pub const SCRIPT_PATH: &str = "assets/index.js";

/// Everything up to and including the last `/` of the loader's script URL.
///
/// A src without any `/` yields an empty base, so assets resolve relative to
/// the host page.
pub fn base_url_from_script_src(src: &str) -> &str {
    src.rfind('/').map_or("", |idx| &src[..=idx])
}

/// Stylesheet and script URLs of the widget bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetUrls {
    pub stylesheet: String,
    pub script: String,
}

impl AssetUrls {
    pub fn from_base(base_url: &str) -> Self {
        Self {
            stylesheet: format!("{base_url}{STYLESHEET_PATH}"),
            script: format!("{base_url}{SCRIPT_PATH}"),
        }
    }
}

/// Resolve the host-supplied config; absent config means the default tuple.
///
/// # Errors
///
/// Returns [`ConfigError`] when a config object was given but is invalid.
pub fn resolve_config(raw: Option<&str>) -> Result<ChatbotConfig, ConfigError> {
    match raw {
        None => Ok(ChatbotConfig::default()),
        Some(json) => ChatbotConfig::from_json(json),
    }
}

/// Errors raised while touching the host page's DOM.
#[cfg(feature = "csr")]
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// No `window`/`document`/`body`/`head` to work with.
    #[error("page is missing {0}")]
    MissingDom(&'static str),

    /// A DOM call threw.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// The host-supplied config could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(feature = "csr")]
impl From<wasm_bindgen::JsValue> for LoaderError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Dom(format!("{value:?}"))
    }
}

/// Bundle entry behind the loader script's `window.initChatbot`.
///
/// `config` may be `undefined`/`null` for the defaults. `loader_src` is the
/// loader script's own URL; without it the last `<script>` on the page is
/// used.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = initChatbot)]
pub fn init_chatbot(config: wasm_bindgen::JsValue, loader_src: Option<String>) {
    if let Err(e) = init_page(&config, loader_src) {
        leptos::logging::warn!("chatbot init skipped: {e}");
    }
}

#[cfg(feature = "csr")]
fn init_page(config: &wasm_bindgen::JsValue, loader_src: Option<String>) -> Result<(), LoaderError> {
    let document = document()?;
    if document.get_element_by_id(CONTAINER_ID).is_some() {
        log::debug!("chatbot already initialized on this page");
        return Ok(());
    }

    let raw = config_json(config)?;
    let config = resolve_config(raw.as_deref())?;
    let src = loader_src.filter(|s| !s.is_empty()).unwrap_or_else(|| last_script_src(&document));
    let assets = AssetUrls::from_base(base_url_from_script_src(&src));

    let body = document.body().ok_or(LoaderError::MissingDom("body"))?;
    let container = document.create_element("div")?;
    container.set_id(CONTAINER_ID);
    container.set_attribute(CONFIG_ATTRIBUTE, &config.to_json()?)?;
    body.append_child(&container)?;

    inject_stylesheet(&document, &assets.stylesheet)?;
    log::debug!("chatbot bundle {} initialized for site {}", assets.script, config.site_id);
    crate::app::mount_page(&document)
}

#[cfg(feature = "csr")]
pub(crate) fn document() -> Result<web_sys::Document, LoaderError> {
    web_sys::window()
        .ok_or(LoaderError::MissingDom("window"))?
        .document()
        .ok_or(LoaderError::MissingDom("document"))
}

/// `JSON.stringify` the host's config, `None` for `undefined`/`null`.
#[cfg(feature = "csr")]
fn config_json(config: &wasm_bindgen::JsValue) -> Result<Option<String>, LoaderError> {
    if config.is_undefined() || config.is_null() {
        return Ok(None);
    }
    let json = js_sys::JSON::stringify(config)?;
    Ok(json.as_string())
}

/// `src` of the last `<script>` on the page, empty if there is none.
#[cfg(feature = "csr")]
fn last_script_src(document: &web_sys::Document) -> String {
    use wasm_bindgen::JsCast;

    let scripts = document.get_elements_by_tag_name("script");
    let script = scripts.length().checked_sub(1).and_then(|last| scripts.item(last));
    match script.map(|el| el.dyn_into::<web_sys::HtmlScriptElement>()) {
        Some(Ok(el)) => el.src(),
        _ => String::new(),
    }
}

#[cfg(feature = "csr")]
fn inject_stylesheet(document: &web_sys::Document, href: &str) -> Result<(), LoaderError> {
    let head = document.head().ok_or(LoaderError::MissingDom("head"))?;
    let link = document.create_element("link")?;
    link.set_attribute("rel", "stylesheet")?;
    link.set_attribute("href", href)?;
    head.append_child(&link)?;
    Ok(())
}
