//! Top navigation bar shared by all pages

use leptos::prelude::*;
use leptos_router::components::A;

use crate::ui::auth::use_auth_context;

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth_context();

    view! {
        <header class="app-header">
            <A href="/" attr:class="app-logo">"Book Reviews"</A>
            <nav class="app-nav">
                <Show
                    when=move || auth.authorized()
                    fallback=|| view! { <A href="/login" attr:class="nav-link">"Login"</A> }
                >
                    <A href="/me" attr:class="nav-link">
                        {move || auth.me().map(|user| user.login).unwrap_or_default()}
                    </A>
                </Show>
            </nav>
        </header>
    }
}
