//! Not found page component
//!
//! A 404 error page displayed when a route is not found.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::ui::header::Header;

/// Not found (404) page component
#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="page">
            <Header />
            <main class="page-content page-centered">
                <h1 class="error-code">"404"</h1>
                <h2>"Page Not Found"</h2>
                <p>"The page you're looking for doesn't exist."</p>
                <A href="/" attr:class="btn btn-primary">"Search books"</A>
            </main>
        </div>
    }
}
