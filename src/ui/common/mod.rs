//! Common reusable UI components

pub mod message;
pub mod spinner;

pub use message::ErrorMessage;
pub use spinner::{LoadingSpinner, Spinner, SpinnerSize};
