//! Browser entry point.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page loads the wasm bundle and `html2canvas`, then calls
//! `startFeedbackWidget()`. Configuration comes from
//! `<meta name="FEEDBACK_*" content="...">` tags, the document id from the
//! page URL, and reports go to the serving origin unless a base URL is set.

use js_sys::Array;
use leptos::prelude::*;
use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Document, Element, MutationObserver, MutationObserverInit, Window};

use crate::components::feedback_widget::FeedbackWidget;
use crate::config::{ConfigError, WidgetConfig};
use crate::net::api::HttpSubmissionClient;
use crate::state::panel::FeedbackPanel;
use crate::translation::{RootSnapshot, TranslationWatcher};

/// Event dispatched on `document` when the page is machine-translated.
/// `detail` carries the target language, or `null`.
pub const TRANSLATED_EVENT: &str = "feedback:translated";

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn init_logging() {
    use tracing_subscriber::layer::SubscriberExt;

    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let layer = tracing_wasm::WASMLayer::new(tracing_wasm::WASMLayerConfigBuilder::new().set_max_level(level).build());
    let subscriber = tracing_subscriber::Registry::default().with(layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        debug!("tracing subscriber already installed");
    }
}

fn meta_content(document: &Document, name: &str) -> Option<String> {
    let selector = format!("meta[name=\"{name}\"]");
    document.query_selector(&selector).ok().flatten()?.get_attribute("content")
}

fn page_config(window: &Window, document: &Document) -> Result<WidgetConfig, ConfigError> {
    let origin = window.location().origin().unwrap_or_default();
    WidgetConfig::for_origin(&origin, |key| meta_content(document, key))
}

fn root_snapshot(root: &Element) -> RootSnapshot {
    RootSnapshot::new(root.class_name(), root.get_attribute("lang").as_deref())
}

fn announce_translation(document: &Document, language: Option<&str>) {
    let init = CustomEventInit::new();
    init.set_detail(&language.map_or(JsValue::NULL, JsValue::from_str));
    match CustomEvent::new_with_event_init_dict(TRANSLATED_EVENT, &init) {
        Ok(event) => {
            if let Err(e) = document.dispatch_event(&event) {
                debug!(error = ?e, "translation event not dispatched");
            }
        }
        Err(e) => debug!(error = ?e, "translation event not created"),
    }
}

/// Observe `class`/`lang` changes on the root element for the page's lifetime.
fn watch_translation(document: &Document) -> Result<(), JsValue> {
    let root = document
        .document_element()
        .ok_or_else(|| JsValue::from_str("document has no root element"))?;
    let observed = root.clone();
    let target = document.clone();
    let mut watcher = TranslationWatcher::new();
    let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(move |_records: Array, _observer: MutationObserver| {
        if let Some(event) = watcher.observe(&root_snapshot(&observed)) {
            announce_translation(&target, event.language.as_deref());
        }
    });
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    init.set_attribute_filter(&Array::of2(&JsValue::from_str("class"), &JsValue::from_str("lang")));
    observer.observe_with_options(&root, &init)?;
    callback.forget();
    Ok(())
}

/// Mount the widget onto the current page.
///
/// # Errors
///
/// Fails when there is no window or document, the `<meta>` configuration is
/// invalid, the page URL carries no document id, or the HTTP client cannot
/// be built.
#[wasm_bindgen(js_name = startFeedbackWidget)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    init_logging();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let config = page_config(&window, &document).map_err(js_error)?;
    let href = window.location().href()?;
    let panel = FeedbackPanel::for_location(&href, config.panel).map_err(js_error)?;
    let client = HttpSubmissionClient::new(&config.endpoint).map_err(js_error)?;
    info!(document_id = panel.document_id(), url = client.url(), "feedback widget starting");

    if let Err(e) = watch_translation(&document) {
        warn!(error = ?e, "translation watcher unavailable");
    }

    leptos::mount::mount_to_body(move || {
        view! { <FeedbackWidget panel=panel client=client window=window document=document /> }
    });
    Ok(())
}
