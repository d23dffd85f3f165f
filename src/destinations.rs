use chrono::naive::NaiveDateTime;
use serde::Serialize;

/// A destination as stored
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Destination {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub countrycode: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub last_modif: Option<NaiveDateTime>,
}

/// A destination in the listing, joined with its country name
///
/// `country` is `None` when the country code has no match in the countries table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DestinationRow {
    pub id: i64,
    pub name: String,
    pub countrycode: String,
    pub country: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}
