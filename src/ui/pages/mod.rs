//! Application pages module
//!
//! This module contains the page components for the application:
//! - Home page (book search)
//! - Login page
//! - Profile page
//! - Book page
//! - Not found page

mod book;
mod home;
mod login;
mod not_found;
mod profile;

pub use book::BookPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use profile::ProfilePage;
