//! Book Review REST API client
//!
//! This module provides:
//! - Wire models of the API
//! - The error taxonomy used for retry decisions
//! - A transport seam with browser and server implementations
//! - The typed, token-signing `ApiClient`

pub mod client;
pub mod error;
pub mod models;
pub mod retry;
pub mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{
    Author, AuthorId, AuthorPreview, Book, BookId, BookPreview, CoverId, CoverSize,
    HttpValidationError, Review, ReviewQuery, ReviewRequest, SingleUserQuery, Token, TokenRequest,
    User, UserId,
};
pub use retry::RetryPolicy;
#[cfg(not(feature = "ssr"))]
pub use transport::GlooTransport;
#[cfg(feature = "ssr")]
pub use transport::ReqwestTransport;
pub use transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
