use serde::Serialize;

/// Country reference row, read-only
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Country {
    /// Human readable name
    pub country: String,

    /// Unique code
    pub country_code: String,
}
