//! Typed client for the Book Review REST API
//!
//! `ApiClient` is the request-signing layer: every request it sends carries
//! `Authorization: Bearer <token>` when the token store holds a token.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::core::api::models::{
    Author, Book, BookPreview, CoverId, CoverSize, Review, ReviewQuery, ReviewRequest,
    SingleUserQuery, Token, TokenRequest, User,
};
use crate::core::api::transport::{ApiRequest, ApiResponse, Transport};
use crate::core::api::ApiError;
use crate::core::session::TokenStore;

/// API client shared by the session layer and the views
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static, tokens: TokenStore) -> Self {
        Self {
            transport: Arc::new(transport),
            tokens,
        }
    }

    /// Token store used to sign requests
    pub fn tokens(&self) -> TokenStore {
        self.tokens
    }

    /// Sign and send a request; non-success statuses become errors
    async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Some(token) = self.tokens.get() {
            request.bearer = Some(token);
        }
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_response(response.status, &response.body))
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.execute(request).await?.json()
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<String, ApiError> {
        self.fetch_json(ApiRequest::get("/health")).await
    }

    /// `POST /token`
    pub async fn issue_token(&self, request: &TokenRequest) -> Result<Token, ApiError> {
        self.fetch_json(ApiRequest::post("/token").form(request.form_fields()))
            .await
    }

    /// `GET /users/me`
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.fetch_json(ApiRequest::get("/users/me")).await
    }

    /// `GET /users/me/reviews`
    pub async fn current_user_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.fetch_json(ApiRequest::get("/users/me/reviews")).await
    }

    /// `GET /users`
    pub async fn users(&self, login: Option<&str>) -> Result<Vec<User>, ApiError> {
        self.fetch_json(ApiRequest::get("/users").query_opt("login", login))
            .await
    }

    /// `GET /users/single`
    pub async fn single_user(&self, query: &SingleUserQuery) -> Result<User, ApiError> {
        let request = ApiRequest::get("/users/single")
            .query_opt("id", query.id)
            .query_opt("login", query.login.as_deref());
        self.fetch_json(request).await
    }

    /// `POST /users`; the API takes the new user's credentials as query parameters
    pub async fn create_user(&self, login: &str, password: &str) -> Result<User, ApiError> {
        let request = ApiRequest::post("/users")
            .query("login", login)
            .query("password", password);
        self.fetch_json(request).await
    }

    /// `GET /reviews`
    pub async fn find_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>, ApiError> {
        let request = ApiRequest::get("/reviews")
            .query_opt("book_id", query.book_id.as_deref())
            .query_opt("user_id", query.user_id);
        self.fetch_json(request).await
    }

    /// `POST /reviews`
    pub async fn create_or_update_review(&self, review: &ReviewRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(review).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.execute(ApiRequest::post("/reviews").json(body))
            .await
            .map(|_| ())
    }

    /// `DELETE /reviews`
    pub async fn delete_review(&self, book_id: &str) -> Result<(), ApiError> {
        self.execute(ApiRequest::delete("/reviews").query("book_id", book_id))
            .await
            .map(|_| ())
    }

    /// `GET /books`
    pub async fn search_books(&self, query: &str) -> Result<Vec<BookPreview>, ApiError> {
        self.fetch_json(ApiRequest::get("/books").query("query", query))
            .await
    }

    /// `GET /books/{id}`
    pub async fn book(&self, id: &str) -> Result<Book, ApiError> {
        self.fetch_json(ApiRequest::get(format!("/books/{}", urlencoding::encode(id))))
            .await
    }

    /// `GET /authors/{id}`
    pub async fn author(&self, id: &str) -> Result<Author, ApiError> {
        self.fetch_json(ApiRequest::get(format!(
            "/authors/{}",
            urlencoding::encode(id)
        )))
        .await
    }

    /// `GET /covers/{id}`, JPEG bytes
    pub async fn cover(&self, id: CoverId, size: CoverSize) -> Result<Vec<u8>, ApiError> {
        let request = ApiRequest::get(format!("/covers/{}", id)).query("size", size.as_str());
        Ok(self.execute(request).await?.body)
    }
}
