//! Book details page
//!
//! Shows the book, its author and its reviews. Signed-in users get a review
//! editor for their own review.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::core::api::{Book, ReviewQuery};
use crate::ui::auth::use_auth_context;
use crate::ui::common::{ErrorMessage, LoadingSpinner};
use crate::ui::header::Header;
use crate::ui::reviews::{ReviewEditor, ReviewList};

#[component]
pub fn BookPage() -> impl IntoView {
    let auth = use_auth_context();
    let params = use_params_map();
    let book_id = move || params.with(|p| p.get("book_id").unwrap_or_default());

    let book = LocalResource::new(move || {
        let id = book_id();
        async move { auth.client().book(&id).await }
    });

    let reviews = LocalResource::new(move || {
        let query = ReviewQuery {
            book_id: Some(book_id()),
            user_id: None,
        };
        async move { auth.client().find_reviews(&query).await }
    });

    view! {
        <div class="page">
            <Header />
            <main class="page-content">
                <Suspense fallback=|| view! { <LoadingSpinner /> }>
                    {move || {
                        book.get().map(|result| match result {
                            Ok(book) => view! { <BookDetails book=book /> }.into_any(),
                            Err(e) => {
                                let error = Signal::derive(move || Some(e.to_string()));
                                view! { <ErrorMessage error=error /> }.into_any()
                            }
                        })
                    }}
                </Suspense>

                <h2>"Reviews"</h2>
                <Suspense fallback=|| view! { <LoadingSpinner /> }>
                    {move || {
                        reviews.get().map(|result| match result {
                            Ok(list) => {
                                let own = auth.me().and_then(|user| {
                                    list.iter().find(|review| review.user_id == user.id).cloned()
                                });
                                let editor = auth.authorized().then(|| view! {
                                    <ReviewEditor
                                        book_id=book_id()
                                        existing=own
                                        on_change=move |_| reviews.refetch()
                                    />
                                });
                                view! {
                                    {editor}
                                    <ReviewList reviews=list />
                                }
                                .into_any()
                            }
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
fn BookDetails(book: Book) -> impl IntoView {
    let auth = use_auth_context();

    let author = book.author_id.clone().map(|author_id| {
        let author = LocalResource::new(move || {
            let author_id = author_id.clone();
            async move { auth.client().author(&author_id).await }
        });
        view! {
            <Suspense fallback=|| ()>
                {move || {
                    author
                        .get()
                        .and_then(Result::ok)
                        .map(|author| view! { <p class="book-author">"by " {author.name}</p> })
                }}
            </Suspense>
        }
    });

    let subjects = book.subjects.join(", ");

    view! {
        <article class="book-details">
            <h1 class="book-title">{book.title}</h1>
            {author}
            {book.description.map(|text| view! { <p class="book-description">{text}</p> })}
            {(!subjects.is_empty()).then(|| view! { <p class="book-subjects">{subjects}</p> })}
        </article>
    }
}
