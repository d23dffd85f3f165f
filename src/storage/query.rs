//! Bound SQL statements
//!
//! Every statement the service sends to the store is a [`BoundQuery`]: SQL text with `?`
//! placeholders plus the values for those placeholders, in order. User input never ends up in
//! the SQL text itself.

use super::CreateDestinationValues;
use super::Error;
use super::Result;
use super::UpdateDestinationValues;

/// A single value bound to a `?` placeholder
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
    /// Text value, also used for `LIKE` patterns
    Text(String),

    /// Signed integer, used for IDs
    Int(i64),

    /// Unsigned integer, used for pagination
    Unsigned(u64),
}

impl Param {
    /// Wrap text in `%` wildcards for a `LIKE` predicate
    pub fn like(value: &str) -> Self {
        Self::Text(format!("%{value}%"))
    }
}

/// SQL text with its ordered parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundQuery {
    /// SQL with `?` placeholders
    pub sql: String,

    /// Values for the placeholders, left to right
    pub params: Vec<Param>,
}

impl BoundQuery {
    /// Start a statement without parameters
    pub fn new<S>(sql: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter for the next placeholder
    #[must_use]
    pub fn bind(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Count the `?` placeholders in the SQL text
    ///
    /// Question marks inside quoted literals or identifiers are not placeholders. Doubled quotes
    /// (`'it''s'`) are handled. Backslash escapes (`'it\'s'`) and comments are not, a `?` in a
    /// comment or after an escaped quote is miscounted. Only statements built in this crate are
    /// counted and none of them contain either.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut quote: Option<char> = None;

        for ch in self.sql.chars() {
            match quote {
                Some(open) if ch == open => quote = None,
                Some(_) => {}
                None => match ch {
                    '\'' | '"' | '`' => quote = Some(ch),
                    '?' => count += 1,
                    _ => {}
                },
            }
        }

        count
    }

    /// Make sure every placeholder has exactly one parameter
    pub fn validate(&self) -> Result<()> {
        let placeholders = self.placeholder_count();
        let parameters = self.params.len();

        if placeholders == parameters {
            Ok(())
        } else {
            Err(Error::Binding {
                placeholders,
                parameters,
            })
        }
    }
}

/// Select a single destination by ID
pub fn find_destination(id: i64) -> BoundQuery {
    BoundQuery::new(
        r"SELECT id, name, description, countrycode, type, last_modif
FROM destinations
WHERE id = ?",
    )
    .bind(Param::Int(id))
}

/// Select all countries, sorted by name
pub fn list_countries() -> BoundQuery {
    BoundQuery::new(
        r"SELECT name AS country, countrycode AS country_code
FROM countries
ORDER BY name",
    )
}

/// Insert a destination, `last_modif` is set by the store
pub fn insert_destination(values: &CreateDestinationValues<'_>) -> BoundQuery {
    BoundQuery::new(
        r"INSERT INTO destinations (name, description, countrycode, type, last_modif)
VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)",
    )
    .bind(Param::Text(values.name.to_string()))
    .bind(Param::Text(values.description.to_string()))
    .bind(Param::Text(values.country_code.to_string()))
    .bind(Param::Text(values.kind.to_string()))
}

/// Overwrite all editable fields of a destination
pub fn update_destination(values: &UpdateDestinationValues<'_>) -> BoundQuery {
    BoundQuery::new(
        r"UPDATE destinations
SET name = ?, description = ?, countrycode = ?, type = ?, last_modif = CURRENT_TIMESTAMP
WHERE id = ?",
    )
    .bind(Param::Text(values.name.to_string()))
    .bind(Param::Text(values.description.to_string()))
    .bind(Param::Text(values.country_code.to_string()))
    .bind(Param::Text(values.kind.to_string()))
    .bind(Param::Int(values.id))
}

/// Physically remove a destination
pub fn delete_destination(id: i64) -> BoundQuery {
    BoundQuery::new("DELETE FROM destinations WHERE id = ?").bind(Param::Int(id))
}
