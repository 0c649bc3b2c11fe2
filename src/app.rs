use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::ui::auth::{RequireAuth, provide_auth_context};
use crate::ui::pages::{BookPage, HomePage, LoginPage, NotFoundPage, ProfilePage};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    // One auth store for the whole application
    provide_auth_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/book-review-web.css"/>
        <Title text="Book Reviews"/>

        <Router>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=path!("/") view=HomePage/>
                <Route path=path!("/login") view=LoginPage/>
                <Route
                    path=path!("/me")
                    view=|| view! { <RequireAuth><ProfilePage/></RequireAuth> }
                />
                <Route path=path!("/book/:book_id") view=BookPage/>
            </Routes>
        </Router>
    }
}
