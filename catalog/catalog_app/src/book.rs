use std::fmt::{Display, Formatter};

/// A catalog entry, as returned by the Catalog API.
///
/// The list and search endpoints do not include the publication year, only the add endpoints do.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub borrowed: bool,
}

impl Book {
    pub fn availability(&self) -> Availability {
        match self.borrowed {
            true => Availability::Borrowed,
            false => Availability::Available,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    Available,
    Borrowed,
}

impl Display for Availability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Available => f.write_str("available"),
            Availability::Borrowed => f.write_str("borrowed"),
        }
    }
}

/// Aggregate counts, always computed by the backend.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    #[serde(rename = "toplam_kitap", alias = "total_books")]
    pub total_books: u32,
    #[serde(rename = "mevcut_kitap", alias = "available_books")]
    pub available_books: u32,
    #[serde(rename = "ödünç_kitap", alias = "borrowed_books")]
    pub borrowed_books: u32,
    #[serde(rename = "kütüphane", alias = "library_name")]
    pub library_name: String,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total_books: 0,
            available_books: 0,
            borrowed_books: 0,
            library_name: "Library Web Demo".to_string(),
        }
    }
}

/// Body of `POST /books`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: i32,
}

/// Response of `POST /books` and `POST /books/isbn`.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct BookAddedResponse {
    pub message: String,
    #[serde(rename = "kitap", alias = "book")]
    pub book: Book,
}

/// Response of the delete, borrow and return endpoints.
#[derive(serde::Deserialize, Debug)]
pub(crate) struct MessageResponse {
    pub message: String,
}
