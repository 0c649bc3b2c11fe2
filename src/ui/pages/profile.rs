//! User profile page
//!
//! Shows the signed-in user and their reviews. Rendered inside `RequireAuth`.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::ui::auth::use_auth_context;
use crate::ui::common::{ErrorMessage, LoadingSpinner};
use crate::ui::header::Header;
use crate::ui::reviews::ReviewList;

/// Profile page component
#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth_context();

    let reviews = LocalResource::new(move || async move {
        auth.client().current_user_reviews().await
    });

    let handle_logout = move |_| {
        auth.logout();
        let navigate = use_navigate();
        navigate("/", Default::default());
    };

    view! {
        <div class="page">
            <Header />
            <main class="page-content">
                {move || auth.me().map(|user| view! {
                    <section class="profile-card">
                        <h1 class="profile-login">{user.login}</h1>
                        <p class="profile-since">
                            "Member since " {user.created_at.format("%Y-%m-%d").to_string()}
                        </p>
                        <button class="btn btn-secondary" on:click=handle_logout>
                            "Logout"
                        </button>
                    </section>
                })}

                <h2>"My reviews"</h2>
                <Suspense fallback=|| view! { <LoadingSpinner /> }>
                    {move || {
                        reviews.get().map(|result| match result {
                            Ok(reviews) => view! { <ReviewList reviews=reviews link_books=true /> }.into_any(),
                            Err(e) => {
                                let error = Signal::derive(move || Some(e.to_string()));
                                view! { <ErrorMessage error=error /> }.into_any()
                            }
                        })
                    }}
                </Suspense>
            </main>
        </div>
    }
}
