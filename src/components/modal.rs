//! Modal Dialog Component

use leptos::prelude::*;

/// Centered dialog over a dimmed backdrop. Clicking the backdrop or the
/// close button calls `on_close`.
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: Signal<String>,
    #[prop(optional, into)] description: Option<String>,
    #[prop(into)] on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let description = StoredValue::new(description);

    view! {
        <Show when=move || open.get()>
            <div class="modal-backdrop" on:click=move |_| on_close.run(())>
                <div class="modal" role="dialog" on:click=|ev| ev.stop_propagation()>
                    <div class="modal-header">
                        <h3 class="modal-title">{move || title.get()}</h3>
                        <button class="modal-close" on:click=move |_| on_close.run(())>"×"</button>
                    </div>
                    {description.get_value().map(|text| view! { <p class="modal-description">{text}</p> })}
                    {children()}
                </div>
            </div>
        </Show>
    }
}
