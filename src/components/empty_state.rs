//! Empty State Component

use leptos::prelude::*;

#[component]
pub fn EmptyState() -> impl IntoView {
    view! {
        <div class="empty-state">
            <p>"No todos yet"</p>
            <p class="hint">"Add one above to get started."</p>
        </div>
    }
}
