//! All things related to the storage of destinations and countries

use async_trait::async_trait;
use thiserror::Error;

use crate::countries::Country;
use crate::destinations::Destination;
use crate::destinations::DestinationRow;

pub use listing::ListingQuery;
pub use listing::Pagination;
pub use listing::SidebarFilters;
pub use mysql::Database;
pub use mysql::Config as DatabaseConfig;
pub use retry::RetryPolicy;

pub mod listing;
#[cfg(test)]
pub mod memory;
mod mysql;
pub mod query;
mod retry;

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// The statement failed without being applied, worth retrying
    #[error("Connection error: {0}")]
    Connection(String),

    /// The connection broke while the statement was in flight, it may or may not have been applied
    #[error("Interrupted statement: {0}")]
    Interrupted(String),

    /// The store rejected or could not run the statement
    #[error("Query error: {0}")]
    Query(String),

    /// The statement and its parameters do not line up
    #[error("Binding error: {placeholders} placeholders, {parameters} parameters")]
    Binding {
        /// Number of `?` in the SQL text
        placeholders: usize,

        /// Number of bound values
        parameters: usize,
    },
}

impl Error {
    /// Is this failure likely to go away when tried again?
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Interrupted(_))
    }

    /// Could the failed statement have been applied anyway?
    pub fn may_have_applied(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a Destination
pub struct CreateDestinationValues<'a> {
    /// Name of the destination
    pub name: &'a str,

    /// Free text description
    pub description: &'a str,

    /// Country code, should exist in the countries table
    pub country_code: &'a str,

    /// Category of the destination
    pub kind: &'a str,
}

/// Values to update a Destination
///
/// All editable fields are overwritten
pub struct UpdateDestinationValues<'a> {
    /// The destination to update
    pub id: i64,

    /// New name
    pub name: &'a str,

    /// New description
    pub description: &'a str,

    /// New country code
    pub country_code: &'a str,

    /// New category
    pub kind: &'a str,
}

/// Storage with all supported operations
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find the destinations on the requested page
    async fn find_destinations(&self, listing: &ListingQuery) -> Result<Vec<DestinationRow>>;

    /// Count all destinations matching the listing filters
    async fn count_destinations(&self, listing: &ListingQuery) -> Result<i64>;

    /// Find a single destination by ID
    ///
    /// Returned as a list, empty when the destination does not exist
    async fn find_destination_by_id(&self, id: i64) -> Result<Vec<Destination>>;

    /// Find all countries
    async fn find_all_countries(&self) -> Result<Vec<Country>>;

    /// Create a destination, returns the generated ID
    async fn create_destination(&self, values: &CreateDestinationValues<'_>) -> Result<i64>;

    /// Update a destination
    async fn update_destination(&self, values: &UpdateDestinationValues<'_>) -> Result<()>;

    /// Delete a destination, for good
    async fn delete_destination(&self, id: i64) -> Result<()>;
}
