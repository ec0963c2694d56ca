use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::runtime::Runtime;

pub const NINETEEN_EIGHTY_FOUR: &str = "9780451524935";
pub const DUNE: &str = "9780441172719";
pub const ANIMAL_FARM: &str = "9780451526342";

/// Build a command for the binary under test, pointed at `base_url`.
pub fn catalog_cli(base_url: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog_cli"));
    cmd.env_remove("CATALOG_API_BASE")
        .args(["--base-url", base_url]);
    cmd
}

#[derive(Debug, Clone, Serialize)]
struct StubBook {
    title: String,
    author: String,
    isbn: String,
    publication_year: i32,
    borrowed: bool,
}

impl StubBook {
    fn new(title: &str, author: &str, isbn: &str, publication_year: i32, borrowed: bool) -> Self {
        Self {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            publication_year,
            borrowed,
        }
    }

    /// The list and search endpoints leave out the publication year.
    fn summary(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "author": self.author,
            "isbn": self.isbn,
            "borrowed": self.borrowed,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NewBookBody {
    title: String,
    author: String,
    isbn: String,
    publication_year: i32,
}

#[derive(Debug, Deserialize)]
struct IsbnBody {
    isbn: String,
}

type Library = Arc<Mutex<Vec<StubBook>>>;

/// An in-memory Catalog API, served on an ephemeral port until dropped.
///
/// Starts with '1984' (available) and 'Dune' (borrowed).
pub struct StubCatalog {
    pub base_url: String,
    _runtime: Runtime,
}

impl StubCatalog {
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let address = listener.local_addr().unwrap();

        let library: Library = Arc::new(Mutex::new(vec![
            StubBook::new("1984", "George Orwell", NINETEEN_EIGHTY_FOUR, 1949, false),
            StubBook::new("Dune", "Frank Herbert", DUNE, 1965, true),
        ]));

        runtime.spawn(async move {
            axum::serve(listener, router(library))
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{}", address),
            _runtime: runtime,
        }
    }
}

fn router(library: Library) -> Router {
    Router::new()
        .route("/books", get(list_books).post(add_book))
        .route("/books/isbn", post(add_book_by_isbn))
        .route("/books/search", get(search_books))
        .route("/books/{isbn}", delete(remove_book))
        .route("/books/{isbn}/borrow", patch(borrow_book))
        .route("/books/{isbn}/return", patch(return_book))
        .route("/stats", get(stats))
        .with_state(library)
}

fn detail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "Kitap bulunamadı")
}

async fn list_books(State(library): State<Library>) -> Response {
    let books = library.lock().unwrap();
    let summaries: Vec<_> = books
        .iter()
        .map(StubBook::summary)
        .collect();
    Json(summaries).into_response()
}

async fn add_book(State(library): State<Library>, Json(body): Json<NewBookBody>) -> Response {
    let mut books = library.lock().unwrap();
    if books
        .iter()
        .any(|book| book.isbn == body.isbn)
    {
        return detail(StatusCode::BAD_REQUEST, "ISBN already exists");
    }

    let book = StubBook::new(&body.title, &body.author, &body.isbn, body.publication_year, false);
    books.push(book.clone());

    Json(json!({ "message": "Book added", "kitap": book })).into_response()
}

async fn add_book_by_isbn(State(library): State<Library>, Json(body): Json<IsbnBody>) -> Response {
    if body.isbn != ANIMAL_FARM {
        return detail(StatusCode::BAD_REQUEST, "No book found for this ISBN");
    }

    let book = StubBook::new("Animal Farm", "George Orwell", ANIMAL_FARM, 1945, false);
    library.lock().unwrap().push(book.clone());

    Json(json!({ "message": "Book added by ISBN", "kitap": book })).into_response()
}

async fn search_books(State(library): State<Library>, Query(query): Query<HashMap<String, String>>) -> Response {
    let contains = |value: &str, key: &str| {
        query
            .get(key)
            .map_or(true, |needle| value.to_lowercase().contains(&needle.to_lowercase()))
    };

    let books = library.lock().unwrap();
    let found = books.iter().find(|book| {
        contains(&book.title, "title")
            && contains(&book.author, "author")
            && query
                .get("isbn")
                .map_or(true, |isbn| *isbn == book.isbn)
    });

    match found {
        Some(book) => Json(book.summary()).into_response(),
        None => not_found(),
    }
}

async fn remove_book(State(library): State<Library>, Path(isbn): Path<String>) -> Response {
    let mut books = library.lock().unwrap();
    match books
        .iter()
        .position(|book| book.isbn == isbn)
    {
        Some(index) => {
            let book = books.remove(index);
            Json(json!({ "message": format!("Book removed: '{}'", book.title) })).into_response()
        }
        None => not_found(),
    }
}

async fn borrow_book(State(library): State<Library>, Path(isbn): Path<String>) -> Response {
    set_borrowed(&library, &isbn, true)
}

async fn return_book(State(library): State<Library>, Path(isbn): Path<String>) -> Response {
    set_borrowed(&library, &isbn, false)
}

fn set_borrowed(library: &Library, isbn: &str, borrowed: bool) -> Response {
    let mut books = library.lock().unwrap();
    let Some(book) = books
        .iter_mut()
        .find(|book| book.isbn == isbn)
    else {
        return not_found();
    };

    match (book.borrowed, borrowed) {
        (true, true) => detail(StatusCode::BAD_REQUEST, "Book is already borrowed"),
        (false, false) => detail(StatusCode::BAD_REQUEST, "Book is not borrowed"),
        (_, true) => {
            book.borrowed = true;
            Json(json!({ "message": format!("'{}' borrowed", book.title) })).into_response()
        }
        (_, false) => {
            book.borrowed = false;
            Json(json!({ "message": format!("'{}' returned", book.title) })).into_response()
        }
    }
}

async fn stats(State(library): State<Library>) -> Response {
    let books = library.lock().unwrap();
    let borrowed = books
        .iter()
        .filter(|book| book.borrowed)
        .count();

    Json(json!({
        "kütüphane": "Stub Library",
        "toplam_kitap": books.len(),
        "mevcut_kitap": books.len() - borrowed,
        "ödünç_kitap": borrowed,
    }))
    .into_response()
}
