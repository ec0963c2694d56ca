use catalog_app::{Availability, Book, CatalogViewModel, Message, MessageKind};
use owo_colors::OwoColorize;

use crate::opts::CatalogCommand;

/// Prints each new message once, errors are kept and reported when the command finishes.
#[derive(Default)]
pub(crate) struct Printer {
    last_message: Option<Message>,
    errors: Vec<String>,
    /// A success message was shown, even if it has since been cleared.
    succeeded: bool,
}

pub(crate) struct RunOutcome {
    pub errors: Vec<String>,
    pub succeeded: bool,
}

impl Printer {
    pub fn render(&mut self, view: &CatalogViewModel) {
        if view.message == self.last_message {
            return;
        }
        self.last_message = view.message.clone();

        let Some(message) = &view.message else {
            return;
        };

        match message.kind {
            MessageKind::Success => {
                self.succeeded = true;
                println!("{} {}", "✓".green().bold(), message.text)
            }
            MessageKind::Info => println!("{} {}", "i".cyan().bold(), message.text),
            MessageKind::Warning => println!("{} {}", "!".yellow().bold(), message.text),
            MessageKind::Error => self.errors.push(message.text.clone()),
        }
    }

    pub fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            errors: self.errors,
            succeeded: self.succeeded,
        }
    }
}

/// What to print once a command has run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Summary {
    BooksAndStats,
    Stats,
    /// Only once a change went through, the stats are never fetched otherwise.
    StatsAfterChange,
    SearchResults,
}

impl Summary {
    pub fn for_command(command: &CatalogCommand) -> Self {
        match command {
            CatalogCommand::List => Summary::BooksAndStats,
            CatalogCommand::Stats => Summary::Stats,
            CatalogCommand::Search {
                ..
            } => Summary::SearchResults,
            _ => Summary::StatsAfterChange,
        }
    }

    pub fn print(&self, view: &CatalogViewModel, succeeded: bool) {
        match self {
            Summary::BooksAndStats => {
                print_books(&view.books);
                print_stats(view);
            }
            Summary::Stats => print_stats(view),
            Summary::StatsAfterChange => {
                if succeeded {
                    print_stats(view)
                }
            }
            Summary::SearchResults => print_books(&view.search_results),
        }
    }
}

fn print_books(books: &[Book]) {
    for book in books {
        let availability = match book.availability() {
            Availability::Available => book.availability().green().to_string(),
            Availability::Borrowed => book.availability().yellow().to_string(),
        };

        let year = book
            .publication_year
            .map(|year| format!(" ({})", year))
            .unwrap_or_default();

        println!(
            "{:<14} {} - {}{} [{}]",
            book.isbn,
            book.title.bold(),
            book.author,
            year,
            availability
        );
    }
}

fn print_stats(view: &CatalogViewModel) {
    println!("{}: {}", view.stats.library_name.bold(), view.stats_text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(message: Option<Message>) -> CatalogViewModel {
        CatalogViewModel {
            message,
            ..CatalogViewModel::default()
        }
    }

    #[test]
    fn success_is_remembered_after_the_message_clears() {
        // given
        let mut printer = Printer::default();
        printer.render(&view_with(Some(Message {
            text: "'1984' borrowed".to_string(),
            kind: MessageKind::Success,
        })));

        // when
        printer.render(&view_with(None));

        // then
        let outcome = printer.into_outcome();
        assert!(outcome.succeeded);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn errors_are_collected_in_order() {
        // given
        let mut printer = Printer::default();

        // when
        for text in ["Error while loading books: boom", "Error while loading stats: boom"] {
            printer.render(&view_with(Some(Message {
                text: text.to_string(),
                kind: MessageKind::Error,
            })));
        }

        // then
        let outcome = printer.into_outcome();
        assert!(!outcome.succeeded);
        assert_eq!(outcome.errors, vec![
            "Error while loading books: boom".to_string(),
            "Error while loading stats: boom".to_string(),
        ]);
    }

    #[test]
    fn info_message_is_not_a_success() {
        let mut printer = Printer::default();

        printer.render(&view_with(Some(Message {
            text: "Search cleared".to_string(),
            kind: MessageKind::Info,
        })));

        assert!(!printer.into_outcome().succeeded);
    }
}
