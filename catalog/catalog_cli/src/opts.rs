#![deny(missing_docs)]

use std::path::PathBuf;

use catalog_app::{BookForm, BookInput, Event, SearchCriteria};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cli::parsers::BaseUrlParser;

#[derive(Parser, Debug)]
#[command(name = "catalog_cli")]
#[command(bin_name = "catalog_cli")]
#[command(version, about, long_about = None)]
pub(crate) struct Opts {
    #[command(subcommand)]
    pub(crate) command: CatalogCommand,

    /// Base url of the Catalog API
    #[arg(
        long,
        env = "CATALOG_API_BASE",
        default_value = "http://localhost:8000",
        value_parser = BaseUrlParser::default()
    )]
    pub(crate) base_url: String,

    /// Trace log file
    #[arg(long, num_args = 0..=1, default_missing_value = "trace.log")]
    pub(crate) trace: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CatalogCommand {
    /// List all books and the library statistics
    List,

    /// Show the library statistics
    Stats,

    /// Add a book
    Add {
        /// Title, e.g. 'The Hobbit'
        #[arg(long)]
        title: String,

        /// Author, e.g. 'J.R.R. Tolkien'
        #[arg(long)]
        author: String,

        /// ISBN, must be unique in the catalog
        #[arg(long)]
        isbn: String,

        /// Publication year, defaults to the current year
        #[arg(long, value_name = "YEAR")]
        year: Option<String>,
    },

    /// Add a book by ISBN, the details are looked up by the backend
    AddIsbn {
        /// ISBN, e.g. '9780451524935'
        isbn: String,
    },

    /// Remove a book, asks for confirmation
    Remove {
        /// ISBN of the book to remove
        isbn: String,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Borrow an available book
    Borrow {
        /// ISBN of the book to borrow
        isbn: String,
    },

    /// Return a borrowed book
    Return {
        /// ISBN of the book to return
        isbn: String,
    },

    /// Search for a book, at least one criterion is required
    Search {
        /// Part of the title
        #[arg(long, default_value = "")]
        title: String,

        /// Part of the author's name
        #[arg(long, default_value = "")]
        author: String,

        /// ISBN
        #[arg(long, default_value = "")]
        isbn: String,
    },
}

impl From<CatalogCommand> for Event {
    fn from(command: CatalogCommand) -> Self {
        match command {
            CatalogCommand::List => Event::Init,
            CatalogCommand::Stats => Event::LoadStats,
            CatalogCommand::Add {
                title,
                author,
                isbn,
                year,
            } => Event::AddBook(BookInput {
                title,
                author,
                isbn,
                publication_year: year.unwrap_or_else(|| BookForm::default().publication_year),
            }),
            CatalogCommand::AddIsbn {
                isbn,
            } => Event::AddBookByIsbn {
                isbn,
            },
            CatalogCommand::Remove {
                isbn, ..
            } => Event::RemoveBook {
                isbn,
            },
            CatalogCommand::Borrow {
                isbn,
            } => Event::ToggleBorrow {
                isbn,
                currently_borrowed: false,
            },
            CatalogCommand::Return {
                isbn,
            } => Event::ToggleBorrow {
                isbn,
                currently_borrowed: true,
            },
            CatalogCommand::Search {
                title,
                author,
                isbn,
            } => Event::SearchBooks(SearchCriteria {
                title,
                author,
                isbn,
            }),
        }
    }
}
