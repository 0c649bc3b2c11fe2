//! Home page: book search

use leptos::prelude::*;
use leptos_router::components::A;

use crate::core::api::BookPreview;
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ErrorMessage, LoadingSpinner};
use crate::ui::header::Header;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth_context();

    let draft = RwSignal::new(String::new());
    let query = RwSignal::new(String::new());

    let results = LocalResource::new(move || {
        let query = query.get();
        async move {
            if query.is_empty() {
                return Ok(Vec::new());
            }
            auth.client().search_books(&query).await
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        query.set(draft.get_untracked().trim().to_string());
    };

    view! {
        <div class="page">
            <Header />
            <main class="page-content">
                <form on:submit=on_submit class="search-form">
                    <input
                        type="search"
                        placeholder="Search books by title"
                        class="form-input"
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    />
                    <button type="submit" class="btn btn-primary">"Search"</button>
                </form>

                <Suspense fallback=|| view! { <LoadingSpinner /> }>
                    {move || {
                        results.get().map(|result| match result {
                            Ok(books) => view! { <BookResults books=books /> }.into_any(),
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

#[component]
fn BookResults(books: Vec<BookPreview>) -> impl IntoView {
    view! {
        <ul class="book-results">
            {books
                .into_iter()
                .map(|book| {
                    let authors = book
                        .authors
                        .iter()
                        .map(|author| author.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    let year = book
                        .first_publishment_date
                        .map(|date| date.format("%Y").to_string());
                    view! {
                        <li class="book-result">
                            <A href=format!("/book/{}", book.id) attr:class="book-title">
                                {book.title}
                            </A>
                            <span class="book-authors">{authors}</span>
                            {year.map(|year| view! { <span class="book-year">{year}</span> })}
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
}
