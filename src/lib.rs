//! Book Review Web - front-end for the Book Review REST API
//!
//! Search books, read reviews and manage your own, built with Leptos and
//! WebAssembly. The session layer in [`core::session`] keeps the access token,
//! the signed-in user and the derived authorization state.

#![recursion_limit = "256"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
