//! Floating button that opens the report modal.

use leptos::callback::{Callable, UnsyncCallback};
use leptos::prelude::*;

use crate::state::view::TITLE;

#[component]
pub fn FeedbackLip(on_open: UnsyncCallback<()>) -> impl IntoView {
    view! {
        <button type="button" class="feedback-lip-button btn btn-primary" on:click=move |_| on_open.run(())>
            {TITLE}
        </button>
    }
}
