//! Review list and review editor components

use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::core::api::{BookId, Review, ReviewRequest};
use crate::ui::auth::use_auth_context;
use crate::ui::common::ErrorMessage;

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;

/// Render a rating as filled and empty stars
fn stars(rating: i32) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(MAX_RATING as usize - filled)
    )
}

/// List of reviews.
///
/// With `link_books` each entry links to the reviewed book, which suits lists
/// spanning several books.
#[component]
pub fn ReviewList(
    reviews: Vec<Review>,
    #[prop(default = false)]
    link_books: bool,
) -> impl IntoView {
    if reviews.is_empty() {
        return view! { <p class="empty-state">"No reviews yet."</p> }.into_any();
    }

    view! {
        <ul class="review-list">
            {reviews
                .into_iter()
                .map(|review| {
                    let book_link = link_books.then(|| {
                        let href = format!("/book/{}", review.book_id);
                        view! { <A href=href attr:class="review-book">{review.book_id.clone()}</A> }
                    });
                    view! {
                        <li class="review-item">
                            {book_link}
                            <span class="review-rating">{stars(review.rating)}</span>
                            <span class="review-date">
                                {review.created_at.format("%Y-%m-%d").to_string()}
                            </span>
                            <p class="review-commentary">{review.commentary.unwrap_or_default()}</p>
                        </li>
                    }
                })
                .collect_view()}
        </ul>
    }
    .into_any()
}

/// Create, update or delete the current user's review of a book
#[component]
pub fn ReviewEditor(
    book_id: BookId,
    /// The current user's existing review, if any
    existing: Option<Review>,
    /// Called after the review was saved or deleted
    #[prop(into)]
    on_change: Callback<()>,
) -> impl IntoView {
    let auth = use_auth_context();

    let has_review = existing.is_some();
    let rating = RwSignal::new(existing.as_ref().map_or(MAX_RATING, |r| r.rating));
    let commentary = RwSignal::new(
        existing
            .and_then(|r| r.commentary)
            .unwrap_or_default(),
    );
    let saving = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let book_id = StoredValue::new(book_id);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = commentary.get_untracked().trim().to_string();
        let request = ReviewRequest {
            book_id: book_id.get_value(),
            rating: rating.get_untracked(),
            commentary: (!text.is_empty()).then_some(text),
        };

        saving.set(true);
        error.set(None);
        spawn_local(async move {
            let result = auth.client().create_or_update_review(&request).await;
            saving.set(false);
            match result {
                Ok(()) => on_change.run(()),
                Err(e) => {
                    warn!("Saving review failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let on_delete = move |_| {
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            let result = auth.client().delete_review(&book_id.get_value()).await;
            saving.set(false);
            match result {
                Ok(()) => on_change.run(()),
                Err(e) => {
                    warn!("Deleting review failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    view! {
        <form on:submit=on_submit class="review-editor">
            <h3>{if has_review { "Your review" } else { "Write a review" }}</h3>

            <ErrorMessage error=error />

            <label for="rating" class="form-label">"Rating"</label>
            <select
                id="rating"
                class="form-input"
                prop:value=move || rating.get().to_string()
                on:change=move |ev| {
                    if let Ok(value) = event_target_value(&ev).parse::<i32>() {
                        rating.set(value);
                    }
                }
            >
                {(MIN_RATING..=MAX_RATING)
                    .rev()
                    .map(|value| view! { <option value=value.to_string()>{stars(value)}</option> })
                    .collect_view()}
            </select>

            <label for="commentary" class="form-label">"Commentary"</label>
            <textarea
                id="commentary"
                class="form-input"
                prop:value=move || commentary.get()
                on:input=move |ev| commentary.set(event_target_value(&ev))
            ></textarea>

            <div class="form-actions">
                <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                    "Save review"
                </button>
                {has_review.then(|| view! {
                    <button
                        type="button"
                        class="btn btn-danger"
                        disabled=move || saving.get()
                        on:click=on_delete
                    >
                        "Delete review"
                    </button>
                })}
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(5), "★★★★★");
        assert_eq!(stars(0), "☆☆☆☆☆");
    }

    #[test]
    fn test_stars_clamps_out_of_range() {
        assert_eq!(stars(9), "★★★★★");
        assert_eq!(stars(-2), "☆☆☆☆☆");
    }
}
