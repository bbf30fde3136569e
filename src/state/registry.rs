// Film registry
// Contains the in-memory film and user collections and all operations on them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced by registry operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A user with the same name is already registered
    #[error("user already exists")]
    UserExists,
    /// A film with the same (name, year) pair is already registered
    #[error("film already exists")]
    FilmExists,
    /// No film matches the given (name, year) pair
    #[error("film not found")]
    FilmNotFound,
    /// Mark value is outside the inclusive [0, 10] range
    #[error("mark out of range")]
    MarkOutOfRange,
}

/// Lowest accepted mark value
pub const MIN_MARK: i64 = 0;
/// Highest accepted mark value
pub const MAX_MARK: i64 = 10;

/// Film record
///
/// Identified by the case-sensitive (name, year) pair. Marks and reviews only
/// ever grow; films are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Film {
    /// Film title, compared case-sensitively
    pub name: String,
    /// Release year
    pub year: i64,
    /// Free-text reviews in submission order
    pub reviews: Vec<String>,
    /// Integer marks in [0, 10], in submission order
    pub marks: Vec<u8>,
}

impl Film {
    /// Create a film with empty marks and reviews
    pub fn new(name: String, year: i64) -> Self {
        Self {
            name,
            year,
            reviews: Vec::new(),
            marks: Vec::new(),
        }
    }

    /// Arithmetic mean of the marks
    ///
    /// Exactly 0.0 when no marks have been submitted; never NaN.
    pub fn average(&self) -> f64 {
        if self.marks.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.marks.iter().map(|&m| f64::from(m)).sum();
        sum / self.marks.len() as f64
    }

    /// Number of submitted reviews
    pub fn count_reviews(&self) -> usize {
        self.reviews.len()
    }

    /// Number of submitted marks
    pub fn count_marks(&self) -> usize {
        self.marks.len()
    }
}

/// The last value a user submitted for a film: either a mark or a review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ReviewEntry {
    /// Integer mark in [0, 10]
    Mark(u8),
    /// Free-text review
    Review(String),
}

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Username, unique and case-sensitive
    pub name: String,
    /// bcrypt hash of the password; the plaintext is never stored
    pub password_hash: String,
    /// Last submitted mark or review per film, keyed by name + year
    pub reviews: HashMap<String, ReviewEntry>,
}

impl User {
    /// Create a user with an empty submission history
    pub fn new(name: String, password_hash: String) -> Self {
        Self {
            name,
            password_hash,
            reviews: HashMap::new(),
        }
    }
}

/// Composite key a user's submissions are recorded under
fn film_key(name: &str, year: i64) -> String {
    format!("{}{}", name, year)
}

/// In-memory store of films and users
///
/// Films keep insertion order (the list endpoint and substring search report
/// them in registry order); a side index keyed by (name, year) gives O(1)
/// lookup. Users live in a map keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    films: Vec<Film>,
    film_index: HashMap<(String, i64), usize>,
    users: HashMap<String, User>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a user by exact, case-sensitive name
    pub fn find_user(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    /// Look up a film by exact, case-sensitive name and year
    pub fn find_film(&self, name: &str, year: i64) -> Option<&Film> {
        self.film_index
            .get(&(name.to_owned(), year))
            .map(|&i| &self.films[i])
    }

    /// Register a new user
    ///
    /// # Arguments
    /// * `name` - Username, must not already be registered
    /// * `password_hash` - bcrypt hash of the chosen password
    pub fn add_user(&mut self, name: &str, password_hash: String) -> Result<(), RegistryError> {
        if self.users.contains_key(name) {
            return Err(RegistryError::UserExists);
        }
        self.users
            .insert(name.to_owned(), User::new(name.to_owned(), password_hash));
        Ok(())
    }

    /// Add a new film with empty marks and reviews
    ///
    /// # Returns
    /// * `Ok(&Film)` - The created film
    /// * `Err(RegistryError::FilmExists)` - A film with this (name, year) already exists
    pub fn add_film(&mut self, name: &str, year: i64) -> Result<&Film, RegistryError> {
        let key = (name.to_owned(), year);
        if self.film_index.contains_key(&key) {
            return Err(RegistryError::FilmExists);
        }
        let index = self.films.len();
        self.films.push(Film::new(name.to_owned(), year));
        self.film_index.insert(key, index);
        Ok(&self.films[index])
    }

    /// Append a mark to a film and record it in the user's history
    ///
    /// The film must exist; the range check happens after the lookup, so a
    /// missing film wins over an out-of-range mark.
    pub fn add_mark(
        &mut self,
        username: &str,
        name: &str,
        year: i64,
        mark: i64,
    ) -> Result<&Film, RegistryError> {
        let &index = self
            .film_index
            .get(&(name.to_owned(), year))
            .ok_or(RegistryError::FilmNotFound)?;
        if !(MIN_MARK..=MAX_MARK).contains(&mark) {
            return Err(RegistryError::MarkOutOfRange);
        }
        let mark = mark as u8;
        self.films[index].marks.push(mark);
        if let Some(user) = self.users.get_mut(username) {
            user.reviews
                .insert(film_key(name, year), ReviewEntry::Mark(mark));
        }
        Ok(&self.films[index])
    }

    /// Append a review to a film and record it in the user's history
    pub fn add_review(
        &mut self,
        username: &str,
        name: &str,
        year: i64,
        text: String,
    ) -> Result<&Film, RegistryError> {
        let &index = self
            .film_index
            .get(&(name.to_owned(), year))
            .ok_or(RegistryError::FilmNotFound)?;
        self.films[index].reviews.push(text.clone());
        if let Some(user) = self.users.get_mut(username) {
            user.reviews
                .insert(film_key(name, year), ReviewEntry::Review(text));
        }
        Ok(&self.films[index])
    }

    /// All films in registry order
    pub fn films(&self) -> &[Film] {
        &self.films
    }

    /// Names of films whose name contains `substring`, in registry order
    pub fn films_matching_substring(&self, substring: &str) -> Vec<&str> {
        self.films
            .iter()
            .filter(|film| film.name.contains(substring))
            .map(|film| film.name.as_str())
            .collect()
    }

    /// Names of films whose average mark equals `average` exactly
    ///
    /// Exact f64 comparison, no tolerance. Two films whose averages differ in
    /// the last bit compare unequal.
    pub fn films_matching_average(&self, average: f64) -> Vec<&str> {
        self.films
            .iter()
            .filter(|film| film.average() == average)
            .map(|film| film.name.as_str())
            .collect()
    }
}
