use chrono::Datelike;
use thiserror::Error;

use crate::book::NewBook;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ISBN is required")]
    IsbnRequired,
    #[error("Enter at least one search criterion")]
    SearchCriteriaRequired,
    #[error("Publication year must be a whole number, found: '{0}'")]
    InvalidPublicationYear(String),
}

/// The values a user typed into the "add book" form.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: String,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Kept as typed, parsed on submission.
    pub publication_year: String,
    pub loading: bool,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            isbn: String::new(),
            publication_year: current_year().to_string(),
            loading: false,
        }
    }
}

impl BookForm {
    pub fn set_input(&mut self, input: BookInput) {
        self.title = input.title;
        self.author = input.author;
        self.isbn = input.isbn;
        self.publication_year = input.publication_year;
    }

    pub fn to_new_book(&self) -> Result<NewBook, ValidationError> {
        let year = self.publication_year.trim();
        let publication_year = year
            .parse::<i32>()
            .map_err(|_| ValidationError::InvalidPublicationYear(year.to_string()))?;

        Ok(NewBook {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            publication_year,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct IsbnForm {
    pub isbn: String,
    pub loading: bool,
}

/// The values a user typed into the search form.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub loading: bool,
}

impl SearchForm {
    pub fn set_criteria(&mut self, criteria: SearchCriteria) {
        self.title = criteria.title;
        self.author = criteria.author;
        self.isbn = criteria.isbn;
    }

    /// Only the non-blank, trimmed fields end up in the query.
    pub fn to_query(&self) -> Result<SearchQuery, ValidationError> {
        let query = SearchQuery {
            title: non_blank(&self.title),
            author: non_blank(&self.author),
            isbn: non_blank(&self.isbn),
        };

        if query.is_empty() {
            return Err(ValidationError::SearchCriteriaRequired);
        }

        Ok(query)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        [("title", self.title), ("author", self.author), ("isbn", self.isbn)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
            .collect()
    }
}

pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    match trimmed.is_empty() {
        true => None,
        false => Some(trimmed.to_string()),
    }
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn book_form_defaults_to_current_year() {
        let form = BookForm::default();

        assert_eq!(form.publication_year, current_year().to_string());
        assert!(form.title.is_empty());
        assert!(!form.loading);
    }

    #[test]
    fn new_book_is_trimmed() {
        // given
        let mut form = BookForm::default();
        form.set_input(BookInput {
            title: "  The Hobbit ".to_string(),
            author: " J.R.R. Tolkien".to_string(),
            isbn: "9780261102217 ".to_string(),
            publication_year: " 1937 ".to_string(),
        });

        // when
        let new_book = form.to_new_book().unwrap();

        // then
        assert_eq!(new_book, NewBook {
            title: "The Hobbit".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            isbn: "9780261102217".to_string(),
            publication_year: 1937,
        });
    }

    #[rstest]
    #[case("")]
    #[case("nineteen")]
    #[case("19.5")]
    fn invalid_year_is_rejected(#[case] year: &str) {
        let form = BookForm {
            publication_year: year.to_string(),
            ..BookForm::default()
        };

        assert_eq!(
            form.to_new_book(),
            Err(ValidationError::InvalidPublicationYear(year.to_string()))
        );
    }

    #[rstest]
    #[case("", "", "")]
    #[case("  ", "\t", " ")]
    fn blank_search_is_rejected(#[case] title: &str, #[case] author: &str, #[case] isbn: &str) {
        let mut form = SearchForm::default();
        form.set_criteria(SearchCriteria {
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
        });

        assert_eq!(form.to_query(), Err(ValidationError::SearchCriteriaRequired));
    }
}
