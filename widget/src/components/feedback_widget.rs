//! Stateful widget host.
//!
//! ARCHITECTURE
//! ============
//! The panel lives in a signal so the modal re-renders from its
//! [`PanelView`](crate::state::view::PanelView). The capture controller and
//! the client are browser objects and stay behind `Rc`; screenshot and
//! submit flows run on the local executor, and no `RefCell` borrow is held
//! across an await.

use std::cell::RefCell;
use std::rc::Rc;

use capture::controller::{CaptureController, CaptureResult};
use capture::dom::{DomSurface, Html2CanvasRasterizer, attach_listeners};
use leptos::callback::UnsyncCallback;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{debug, warn};
use web_sys::{Document, Window};

use crate::components::feedback_lip::FeedbackLip;
use crate::components::feedback_modal::FeedbackModal;
use crate::net::api::{HttpSubmissionClient, SubmissionClient};
use crate::state::panel::FeedbackPanel;
use crate::state::view::screenshot_data_url;

/// Take a finished capture into the panel and refresh the preview image.
fn attach_capture(panel: RwSignal<FeedbackPanel>, preview: RwSignal<Option<String>>, result: CaptureResult) {
    let captured = result.is_ok();
    panel.update(|p| p.attach_screenshot(result));
    if !captured {
        return;
    }
    let encoded = panel.with_untracked(|p| {
        p.screenshot()
            .map(|image| screenshot_data_url(image, p.config().jpeg_quality))
    });
    match encoded {
        Some(Ok(url)) => preview.set(Some(url)),
        Some(Err(e)) => warn!(error = %e, "screenshot preview failed"),
        None => {}
    }
}

/// Lip button plus modal, wired to the page's capture and submission.
#[component]
pub fn FeedbackWidget(
    panel: FeedbackPanel,
    client: HttpSubmissionClient,
    window: Window,
    document: Document,
) -> impl IntoView {
    let panel = RwSignal::new(panel);
    let preview = RwSignal::new(None::<String>);
    let panel_view = Memo::new(move |_| panel.with(FeedbackPanel::view));

    let controller = Rc::new(RefCell::new(CaptureController::new(DomSurface::new(document.clone()))));
    let rasterizer = Rc::new(Html2CanvasRasterizer::new(document));
    let client = Rc::new(client);

    let on_open = UnsyncCallback::new(move |()| panel.update(FeedbackPanel::open));
    let on_close = UnsyncCallback::new(move |()| panel.update(FeedbackPanel::close));
    let on_describe = UnsyncCallback::new(move |text: String| panel.update(|p| p.set_description(text)));

    let on_screenshot = UnsyncCallback::new(move |()| {
        let handle = panel
            .try_update(|p| p.request_screenshot(&mut *controller.borrow_mut()))
            .flatten();
        let Some(handle) = handle else {
            return;
        };
        // Listeners only live for this capture; dropping them detaches them.
        let listeners = match attach_listeners(&window, Rc::clone(&controller), Rc::clone(&rasterizer)) {
            Ok(listeners) => Some(listeners),
            Err(e) => {
                warn!(error = ?e, "failed to attach capture listeners");
                controller.borrow_mut().cancel();
                None
            }
        };
        spawn_local(async move {
            let result = handle.await;
            drop(listeners);
            attach_capture(panel, preview, result);
        });
    });

    let on_submit = UnsyncCallback::new(move |()| {
        let Some(begun) = panel.try_update(FeedbackPanel::begin_submit) else {
            return;
        };
        let request = match begun {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, code = e.error_code(), "submission not started");
                return;
            }
        };
        let client = Rc::clone(&client);
        spawn_local(async move {
            let result = client.submit(&request).await;
            panel.update(|p| {
                if let Err(e) = p.finish_submit(result) {
                    debug!(error = %e, "submission finished with error");
                }
            });
        });
    });

    view! {
        <FeedbackLip on_open=on_open />
        <FeedbackModal
            panel_view=panel_view
            preview=preview.read_only()
            on_close=on_close
            on_describe=on_describe
            on_screenshot=on_screenshot
            on_submit=on_submit
        />
    }
}
