//! Report modal: description, screenshot controls, notices, and the issue
//! link that replaces the form once the report is filed.
//!
//! Every section stays mounted and is toggled with `hidden`, so typing into
//! the description never rebuilds the textarea.

use leptos::callback::{Callable, UnsyncCallback};
use leptos::prelude::*;

use crate::state::view::{
    CLOSE_LABEL, DESCRIBE_LABEL, FOLLOW_LABEL, PanelView, REPORTED_MESSAGE, SCREENSHOT_CAVEAT, SCREENSHOT_HINT,
    SCREENSHOT_LABEL, TITLE,
};

/// Modal dialog rendering a [`PanelView`].
#[component]
pub fn FeedbackModal(
    panel_view: Memo<PanelView>,
    preview: ReadSignal<Option<String>>,
    on_close: UnsyncCallback<()>,
    on_describe: UnsyncCallback<String>,
    on_screenshot: UnsyncCallback<()>,
    on_submit: UnsyncCallback<()>,
) -> impl IntoView {
    let closed = move || !panel_view.with(|v| v.visible);
    let form_hidden = move || !panel_view.with(|v| v.form_shown);
    let notice = move || panel_view.with(|v| v.notice.as_ref().map(|n| n.message.clone()));
    let issue_url = move || panel_view.with(|v| v.issue.as_ref().map(|i| i.url.clone()).unwrap_or_default());
    let preview_hidden = move || panel_view.with(|v| v.screenshot.is_none()) || preview.with(Option::is_none);
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            on_close.run(());
        }
    };

    view! {
        <div class="feedback-modal" role="dialog" aria-labelledby="feedback-modal-title" hidden=closed>
            <div class="feedback-modal__backdrop" on:click=move |_| on_close.run(())></div>
            <div class="feedback-modal__dialog modal-content" tabindex="-1" on:keydown=on_keydown>
                <div class="modal-header">
                    <h5 class="modal-title" id="feedback-modal-title">{TITLE}</h5>
                    <button type="button" class="close" aria-label=CLOSE_LABEL on:click=move |_| on_close.run(())>
                        <span aria-hidden="true">"×"</span>
                    </button>
                </div>
                <div class="modal-body">
                    <div class="alert alert-warning feedback-notice" role="alert" hidden=move || notice().is_none()>
                        {move || notice().unwrap_or_default()}
                    </div>
                    <div class="feedback-form" hidden=form_hidden>
                        <div class="form-group">
                            <label for="feedback-text">{DESCRIBE_LABEL}</label>
                            <textarea
                                id="feedback-text"
                                class="form-control"
                                rows="5"
                                prop:value=move || panel_view.with(|v| v.description.clone())
                                on:input=move |ev| on_describe.run(event_target_value(&ev))
                            ></textarea>
                        </div>
                        <p>{SCREENSHOT_HINT}</p>
                        <p>
                            <button
                                type="button"
                                class="btn btn-secondary feedback-screenshot-button"
                                on:click=move |_| on_screenshot.run(())
                            >
                                {SCREENSHOT_LABEL}
                            </button>
                        </p>
                        <p class="feedback-current-screenshot" hidden=preview_hidden>
                            <img alt="Screenshot" src=move || preview.get().unwrap_or_default() />
                        </p>
                        <p>{SCREENSHOT_CAVEAT}</p>
                    </div>
                    <div class="feedback-issue" hidden=move || !form_hidden()>
                        {REPORTED_MESSAGE}
                        " "
                        <a href=issue_url target="_blank" rel="noopener">{FOLLOW_LABEL}</a>
                    </div>
                </div>
                <div class="modal-footer">
                    <button type="button" class="btn btn-secondary" on:click=move |_| on_close.run(())>
                        {CLOSE_LABEL}
                    </button>
                    <button
                        type="button"
                        class="btn btn-primary feedback-submit-button"
                        hidden=move || !panel_view.with(|v| v.submit.present)
                        disabled=move || !panel_view.with(|v| v.submit.enabled)
                        on:click=move |_| on_submit.run(())
                    >
                        {move || panel_view.with(|v| v.submit.label)}
                    </button>
                </div>
            </div>
        </div>
    }
}
