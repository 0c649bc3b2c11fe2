//! Request and response models of the Book Review REST API.
//!
//! Field names follow the JSON wire format of the API.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type BookId = String;
pub type AuthorId = String;
pub type CoverId = i64;

/// User as returned by `/users` endpoints, including `/users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub login: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
}

/// Access token issued by `POST /token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Form body of `POST /token` (OAuth2 password grant)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    pub grant_type: Option<String>,
    pub scope: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl TokenRequest {
    /// Password grant with only the mandatory fields
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Form fields in wire order; unset optional fields are omitted
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("username".to_string(), self.username.clone()),
            ("password".to_string(), self.password.clone()),
        ];
        let optional = [
            ("grant_type", &self.grant_type),
            ("scope", &self.scope),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                fields.push((name.to_string(), value.clone()));
            }
        }
        fields
    }
}

/// Review written by a user for a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: UserId,
    pub book_id: BookId,
    pub rating: i32,
    pub commentary: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: NaiveDateTime,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Body of `POST /reviews`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub book_id: BookId,
    pub rating: i32,
    pub commentary: Option<String>,
}

/// Query of `GET /reviews`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewQuery {
    pub book_id: Option<BookId>,
    pub user_id: Option<UserId>,
}

/// Query of `GET /users/single`; the API requires one of the two
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleUserQuery {
    pub id: Option<UserId>,
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPreview {
    pub id: AuthorId,
    pub name: String,
}

/// Search result entry of `GET /books`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPreview {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<AuthorPreview>,
    #[serde(default)]
    pub first_publishment_date: Option<NaiveDate>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// Book details of `GET /books/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub author_id: Option<AuthorId>,
    #[serde(default)]
    pub covers: Vec<CoverId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

/// Author details of `GET /authors/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub wikipedia: Option<String>,
}

/// Cover image size accepted by `GET /covers/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoverSize {
    #[default]
    S,
    M,
    L,
}

impl CoverSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverSize::S => "S",
            CoverSize::M => "M",
            CoverSize::L => "L",
        }
    }
}

/// One path segment of a validation error location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationItem {
    Field(String),
    Index(i64),
}

impl fmt::Display for LocationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationItem::Field(name) => f.write_str(name),
            LocationItem::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub loc: Vec<LocationItem>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `422` response envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpValidationError {
    #[serde(default)]
    pub detail: Vec<ValidationIssue>,
}

impl fmt::Display for HttpValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            return f.write_str("invalid request");
        }
        let issues: Vec<String> = self
            .detail
            .iter()
            .map(|issue| {
                let location: Vec<String> = issue.loc.iter().map(ToString::to_string).collect();
                format!("{}: {}", location.join("."), issue.msg)
            })
            .collect();
        f.write_str(&issues.join("; "))
    }
}

/// The API emits naive ISO-8601 timestamps; RFC 3339 with an offset is accepted too.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(datetime) => Ok(datetime.naive_utc()),
            Err(_) => NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
