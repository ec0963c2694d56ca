use crux_core::macros::effect;
use crux_core::render::RenderOperation;
pub use crux_core::Core;
use crux_core::{render, App, Command};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

pub use crate::api::{ApiError, CatalogRequest};
pub use crate::book::{Availability, Book, NewBook, Stats};
use crate::book::{BookAddedResponse, MessageResponse};
use crate::effects::confirm::{ConfirmOperation, ConfirmResult};
use crate::effects::http::{HttpOperation, HttpResult};
use crate::effects::timer::{TimerId, TimerOperation, TimerOutput};
use crate::effects::{confirm, http, timer};
use crate::forms::non_blank;
pub use crate::forms::{BookForm, BookInput, IsbnForm, SearchCriteria, SearchForm, ValidationError};
use crate::message::ActiveMessage;
pub use crate::message::{Message, MessageKind, AUTO_CLEAR_DELAY};

pub mod api;
pub mod book;
pub mod effects;
pub mod forms;
pub mod message;

pub const REMOVE_BOOK_PROMPT: &str = "Are you sure you want to delete this book?";
pub const ISBN_LOOKUP_IN_PROGRESS: &str =
    "Fetching book details from OpenLibrary... (this can take up to 15 seconds)";

#[derive(Default)]
pub struct Catalog;

#[derive(Default)]
pub struct Model {
    /// Last fetched copy of the backend's books, replaced wholesale on every fetch.
    books: Vec<Book>,
    stats: Stats,

    book_form: BookForm,
    isbn_form: IsbnForm,
    search_form: SearchForm,

    search_results: Vec<Book>,
    /// Distinguishes "not searched yet" from "searched, nothing found".
    search_performed: bool,

    message: Option<ActiveMessage>,
    last_timer_id: TimerId,
}

impl Model {
    /// Replace the active message, cancelling the auto-clear of the previous one.
    fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) -> Command<Effect, Event> {
        let cancel = self.clear_message();

        let message = Message {
            text: text.into(),
            kind,
        };
        debug!("showing message. kind: {}, text: {}", kind, message.text);

        let (timer, start) = match kind.auto_clears() {
            true => {
                self.last_timer_id += 1;
                let id = self.last_timer_id;
                (Some(id), timer::start(id, AUTO_CLEAR_DELAY, Event::MessageTimerElapsed))
            }
            false => (None, Command::done()),
        };

        self.message.replace(ActiveMessage {
            message,
            timer,
        });

        Command::all([cancel, start])
    }

    fn clear_message(&mut self) -> Command<Effect, Event> {
        match self
            .message
            .take()
            .and_then(|active| active.timer)
        {
            Some(id) => timer::cancel(id),
            None => Command::done(),
        }
    }

    fn has_error_message(&self) -> bool {
        self.message
            .as_ref()
            .is_some_and(|active| active.message.kind == MessageKind::Error)
    }
}

#[effect]
pub enum Effect {
    Render(RenderOperation),
    Http(HttpOperation),
    Timer(TimerOperation),
    Confirm(ConfirmOperation),
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorrowAction {
    Borrow,
    Return,
}

impl BorrowAction {
    /// A borrowed book can only be returned, an available one can only be borrowed.
    pub fn for_state(currently_borrowed: bool) -> Self {
        match currently_borrowed {
            true => BorrowAction::Return,
            false => BorrowAction::Borrow,
        }
    }

    fn request(&self, isbn: String) -> CatalogRequest {
        match self {
            BorrowAction::Borrow => CatalogRequest::BorrowBook {
                isbn,
            },
            BorrowAction::Return => CatalogRequest::ReturnBook {
                isbn,
            },
        }
    }

    fn error(&self, cause: ApiError) -> AppError {
        match self {
            BorrowAction::Borrow => AppError::BorrowBook(cause),
            BorrowAction::Return => AppError::ReturnBook(cause),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Default, PartialEq, Debug, Clone)]
pub struct CatalogViewModel {
    pub books: Vec<Book>,
    pub stats: Stats,
    /// e.g. `Total: 3 | Available: 2 | Borrowed: 1`
    pub stats_text: String,
    pub message: Option<Message>,

    pub book_form: BookForm,
    pub isbn_form: IsbnForm,
    pub search_form: SearchForm,

    pub search_results: Vec<Book>,
    pub search_performed: bool,
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub enum Event {
    None,
    /// Load books and stats, then greet.
    ///
    /// The greeting is skipped when either load failed, so it never replaces the error.
    Init,
    LoadBooks,
    LoadStats,
    AddBook(BookInput),
    AddBookByIsbn {
        isbn: String,
    },
    /// Asks for confirmation first.
    RemoveBook {
        isbn: String,
    },
    ToggleBorrow {
        isbn: String,
        currently_borrowed: bool,
    },
    SearchBooks(SearchCriteria),
    ClearSearch,
    DismissMessage,

    //
    // Shell responses
    //
    #[serde(skip)]
    Ready,
    #[serde(skip)]
    BooksFetched(HttpResult),
    #[serde(skip)]
    StatsFetched(HttpResult),
    #[serde(skip)]
    BookAdded(HttpResult),
    #[serde(skip)]
    BookAddedByIsbn(HttpResult),
    #[serde(skip)]
    IsbnRefreshCompleted,
    #[serde(skip)]
    RemoveConfirmed {
        isbn: String,
        result: ConfirmResult,
    },
    #[serde(skip)]
    BookRemoved(HttpResult),
    #[serde(skip)]
    BorrowToggled {
        action: BorrowAction,
        result: HttpResult,
    },
    #[serde(skip)]
    SearchCompleted(HttpResult),
    #[serde(skip)]
    MessageTimerElapsed(TimerOutput),
}

impl Catalog {
    fn update_inner(&self, event: Event, model: &mut Model) -> Result<Command<Effect, Event>, AppError> {
        match event {
            Event::None => Ok(Command::done()),
            Event::Init => Ok(Self::refresh(Some(Event::Ready))),
            Event::Ready => match model.has_error_message() {
                true => Ok(Command::done()),
                false => Ok(model.show_message("Library loaded", MessageKind::Success)),
            },
            Event::LoadBooks => Ok(http::request(
                CatalogRequest::ListBooks.into_operation(),
                Event::BooksFetched,
            )),
            Event::LoadStats => Ok(http::request(
                CatalogRequest::GetStats.into_operation(),
                Event::StatsFetched,
            )),
            Event::BooksFetched(result) => {
                let books: Vec<Book> = api::decode(result).map_err(AppError::LoadBooks)?;
                debug!("fetched books. count: {}", books.len());
                model.books = books;
                Ok(Command::done())
            }
            Event::StatsFetched(result) => {
                model.stats = api::decode(result).map_err(AppError::LoadStats)?;
                Ok(Command::done())
            }
            Event::AddBook(input) => {
                if model.book_form.loading {
                    debug!("add book ignored, a submission is in progress");
                    return Ok(Command::done());
                }

                model.book_form.set_input(input);
                let new_book = model.book_form.to_new_book()?;

                info!("Adding book. isbn: {}", new_book.isbn);
                model.book_form.loading = true;

                Ok(http::request(
                    CatalogRequest::AddBook(new_book).into_operation(),
                    Event::BookAdded,
                ))
            }
            Event::BookAdded(result) => {
                model.book_form.loading = false;

                let response: BookAddedResponse = api::decode(result).map_err(AppError::AddBook)?;
                model.book_form = BookForm::default();

                let message = format!("{}: \"{}\"", response.message, response.book.title);
                Ok(Command::all([
                    model.show_message(message, MessageKind::Success),
                    Self::refresh(None),
                ]))
            }
            Event::AddBookByIsbn {
                isbn,
            } => {
                if model.isbn_form.loading {
                    debug!("add book by isbn ignored, a submission is in progress");
                    return Ok(Command::done());
                }

                model.isbn_form.isbn = isbn;
                let isbn = non_blank(&model.isbn_form.isbn).ok_or(ValidationError::IsbnRequired)?;

                info!("Adding book by isbn. isbn: {}", isbn);
                model.isbn_form.loading = true;

                Ok(Command::all([
                    model.show_message(ISBN_LOOKUP_IN_PROGRESS, MessageKind::Info),
                    http::request(
                        CatalogRequest::AddBookByIsbn {
                            isbn,
                        }
                        .into_operation(),
                        Event::BookAddedByIsbn,
                    ),
                ]))
            }
            Event::BookAddedByIsbn(result) => {
                let response: BookAddedResponse = match api::decode(result) {
                    Ok(response) => response,
                    Err(cause) => {
                        model.isbn_form.loading = false;
                        return Err(AppError::AddBookByIsbn(cause));
                    }
                };
                model.isbn_form.isbn.clear();

                let message = format!(
                    "{}: \"{}\" - {}",
                    response.message, response.book.title, response.book.author
                );
                // the form stays locked until the refresh is done
                Ok(Command::all([
                    model.show_message(message, MessageKind::Success),
                    Self::refresh(Some(Event::IsbnRefreshCompleted)),
                ]))
            }
            Event::IsbnRefreshCompleted => {
                model.isbn_form.loading = false;
                Ok(Command::done())
            }
            Event::RemoveBook {
                isbn,
            } => Ok(confirm::confirm(REMOVE_BOOK_PROMPT, move |result| Event::RemoveConfirmed {
                isbn,
                result,
            })),
            Event::RemoveConfirmed {
                isbn,
                result,
            } => match result {
                ConfirmResult::Declined => {
                    debug!("removal declined. isbn: {}", isbn);
                    Ok(Command::done())
                }
                ConfirmResult::Confirmed => {
                    info!("Removing book. isbn: {}", isbn);
                    Ok(http::request(
                        CatalogRequest::DeleteBook {
                            isbn,
                        }
                        .into_operation(),
                        Event::BookRemoved,
                    ))
                }
            },
            Event::BookRemoved(result) => {
                let response: MessageResponse = api::decode(result).map_err(AppError::RemoveBook)?;

                Ok(Command::all([
                    model.show_message(response.message, MessageKind::Success),
                    Self::refresh(None),
                ]))
            }
            Event::ToggleBorrow {
                isbn,
                currently_borrowed,
            } => {
                let action = BorrowAction::for_state(currently_borrowed);
                info!("Toggling borrow state. isbn: {}, action: {:?}", isbn, action);

                Ok(http::request(
                    action.request(isbn).into_operation(),
                    move |result| Event::BorrowToggled {
                        action,
                        result,
                    },
                ))
            }
            Event::BorrowToggled {
                action,
                result,
            } => {
                let response: MessageResponse = api::decode(result).map_err(|cause| action.error(cause))?;

                Ok(Command::all([
                    model.show_message(response.message, MessageKind::Success),
                    Self::refresh(None),
                ]))
            }
            Event::SearchBooks(criteria) => {
                if model.search_form.loading {
                    debug!("search ignored, a search is in progress");
                    return Ok(Command::done());
                }

                model.search_form.set_criteria(criteria);
                let query = model.search_form.to_query()?;

                info!("Searching. query: {:?}", query);
                model.search_form.loading = true;
                model.search_performed = false;

                Ok(http::request(
                    CatalogRequest::SearchBooks(query).into_operation(),
                    Event::SearchCompleted,
                ))
            }
            Event::SearchCompleted(result) => {
                model.search_form.loading = false;
                model.search_performed = true;

                match api::decode_optional::<Book>(result) {
                    Ok(book) => {
                        model.search_results = book.into_iter().collect();

                        let command = match model.search_results.len() {
                            0 => model.show_message("No books matched the search criteria", MessageKind::Info),
                            count => model.show_message(format!("{} book(s) found", count), MessageKind::Success),
                        };
                        Ok(command)
                    }
                    Err(cause) => {
                        model.search_results.clear();
                        Err(AppError::Search(cause))
                    }
                }
            }
            Event::ClearSearch => {
                model.search_form = SearchForm::default();
                model.search_results.clear();
                model.search_performed = false;

                Ok(model.show_message("Search cleared", MessageKind::Info))
            }
            Event::DismissMessage => Ok(model.clear_message()),
            Event::MessageTimerElapsed(output) => {
                match output {
                    TimerOutput::Elapsed {
                        id,
                    } => {
                        let current = model
                            .message
                            .as_ref()
                            .and_then(|active| active.timer);
                        match current == Some(id) {
                            true => {
                                trace!("message expired. timer: {}", id);
                                model.message = None;
                            }
                            false => debug!("ignoring stale message timer. timer: {}", id),
                        }
                    }
                    TimerOutput::Cancelled {
                        id,
                    } => trace!("message timer cancelled. timer: {}", id),
                }
                Ok(Command::done())
            }
        }
    }

    /// Re-fetch books, then stats, then send `then`, if any.
    ///
    /// Mutations never patch the local copies, the backend is the only source of the books and counts.
    fn refresh(then: Option<Event>) -> Command<Effect, Event> {
        Command::new(|ctx| async move {
            let books = ctx
                .request_from_shell(CatalogRequest::ListBooks.into_operation())
                .await;
            ctx.send_event(Event::BooksFetched(books));

            let stats = ctx
                .request_from_shell(CatalogRequest::GetStats.into_operation())
                .await;
            ctx.send_event(Event::StatsFetched(stats));

            if let Some(event) = then {
                ctx.send_event(event);
            }
        })
    }
}

impl App for Catalog {
    type Event = Event;
    type Model = Model;
    type ViewModel = CatalogViewModel;
    type Capabilities = ();
    type Effect = Effect;

    fn update(
        &self,
        event: Self::Event,
        model: &mut Self::Model,
        _caps: &Self::Capabilities,
    ) -> Command<Self::Effect, Self::Event> {
        trace!("event: {:?}", event);

        let command = match self.update_inner(event, model) {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                model.show_message(e.to_string(), MessageKind::Error)
            }
        };

        Command::all([command, render::render()])
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        let view_model = CatalogViewModel {
            books: model.books.clone(),
            stats: model.stats.clone(),
            stats_text: stats_text(&model.stats),
            message: model
                .message
                .as_ref()
                .map(|active| active.message.clone()),
            book_form: model.book_form.clone(),
            isbn_form: model.isbn_form.clone(),
            search_form: model.search_form.clone(),
            search_results: model.search_results.clone(),
            search_performed: model.search_performed,
        };

        trace!("view model: {:?}", view_model);

        view_model
    }
}

pub fn stats_text(stats: &Stats) -> String {
    format!(
        "Total: {} | Available: {} | Borrowed: {}",
        stats.total_books, stats.available_books, stats.borrowed_books
    )
}

#[derive(Error, Debug)]
enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Error while loading books: {0}")]
    LoadBooks(ApiError),
    #[error("Error while loading stats: {0}")]
    LoadStats(ApiError),
    #[error("Error while adding book: {0}")]
    AddBook(ApiError),
    #[error("Error while adding book by ISBN: {0}")]
    AddBookByIsbn(ApiError),
    #[error("Error while removing book: {0}")]
    RemoveBook(ApiError),
    #[error("Error while borrowing book: {0}")]
    BorrowBook(ApiError),
    #[error("Error while returning book: {0}")]
    ReturnBook(ApiError),
    #[error("Error while searching: {0}")]
    Search(ApiError),
}
